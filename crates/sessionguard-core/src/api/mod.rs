//! REST client for the user-administration backend.
//!
//! `ApiClient` routes every request through the interceptors registered on
//! it. Registering a `SessionGuard` is what attaches the bearer token to
//! outgoing requests and turns any 401 into a logout.

pub mod client;
pub mod error;
pub mod interceptor;

pub use client::ApiClient;
pub use error::ApiError;
pub use interceptor::Interceptor;
