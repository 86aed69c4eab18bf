//! SessionGuard core - client-side session handling for a bearer-token API.
//!
//! This crate provides:
//! - `storage`: injected key/value stores for the token and cached user
//! - `session`: `SessionGuard`, the auth/role checks, logout and 401 handling
//! - `navigation`: redirect targets, the public path allow-list, `Navigator`
//! - `api`: `ApiClient` with interceptor registration
//! - `models`: user and auth payloads
//! - `config`: persisted configuration

pub mod api;
pub mod config;
pub mod models;
pub mod navigation;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError, Interceptor};
pub use config::{Config, StorageBackend};
pub use models::{roles, TokenResponse, User};
pub use navigation::{NavigationDecision, NavigationTarget, Navigator, PublicPaths, RecordingNavigator};
pub use session::SessionGuard;
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, SessionStorage, StorageError};
