//! Data models exchanged with the user-administration backend.
//!
//! - `User`: the account record cached under the `usuario` storage key
//! - `LoginRequest`, `TokenResponse`: the login exchange
//! - `RegistrationRequest`, `ProfileUpdate`: account writes, with the same
//!   field rules the backend enforces
//! - `ErrorResponse`: the backend's error body
//! - `Page`: one page of a paginated listing

pub mod auth;
pub mod page;
pub mod user;

pub use auth::{ErrorResponse, LoginRequest, ProfileUpdate, RegistrationRequest, TokenResponse};
pub use page::Page;
pub use user::{roles, User};
