//! Session storage backends.
//!
//! The guard never touches a concrete store directly. It is handed a
//! `SessionStorage` and only ever calls `get`, `set` and `remove`, each of
//! which is atomic on its own. Backends:
//!
//! - `MemoryStorage`: process-local map, used in tests and embedders
//! - `FileStorage`: JSON file in the cache directory
//! - `KeyringStorage`: OS keychain, one entry per key

pub mod error;
pub mod file;
pub mod keychain;
pub mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Key the JSON-serialized current user is stored under.
pub const USER_KEY: &str = "usuario";

/// Minimal key/value contract the session guard is written against.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that is not present is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
