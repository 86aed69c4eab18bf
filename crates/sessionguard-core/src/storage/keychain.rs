use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use keyring::Entry;
use tracing::debug;

use super::{SessionStorage, StorageError};

const SERVICE_NAME: &str = "sessionguard";

/// Session storage backed by the OS keychain.
///
/// Each key becomes its own keychain entry under a shared service name, so
/// the token never touches the filesystem in plain text. Entries are opened
/// once per key and reused for the life of the storage.
#[derive(Debug)]
pub struct KeyringStorage {
    service: String,
    entries: Mutex<HashMap<String, Arc<Entry>>>,
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom service name (one per profile or environment)
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: &str) -> Result<Arc<Entry>, StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }
        let entry = Arc::new(Entry::new(&self.service, key)?);
        entries.insert(key.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        debug!(service = %self.service, key = key, "Stored keychain entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests run against keyring's in-memory mock so they never touch the
    // developer's real keychain.
    fn use_mock_keychain() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
    }

    #[test]
    fn test_keyring_missing_entry_is_none() {
        use_mock_keychain();
        let storage = KeyringStorage::with_service("sessionguard-test-missing");
        assert_eq!(storage.get("never-written").unwrap(), None);
    }

    #[test]
    fn test_keyring_remove_missing_entry_is_ok() {
        use_mock_keychain();
        let storage = KeyringStorage::with_service("sessionguard-test-missing");
        assert!(storage.remove("never-written").is_ok());
    }

    #[test]
    fn test_keyring_set_get_remove() {
        use_mock_keychain();
        let storage = KeyringStorage::with_service("sessionguard-test-roundtrip");

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

        storage.set("token", "def").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("def"));

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_keyring_backs_session_guard() {
        use crate::navigation::RecordingNavigator;
        use crate::session::SessionGuard;

        use_mock_keychain();
        let storage = Arc::new(KeyringStorage::with_service("sessionguard-test-guard"));
        let guard = SessionGuard::new(storage.clone(), Arc::new(RecordingNavigator::new()));

        storage.set("token", "abc").unwrap();
        assert!(guard.is_authenticated());

        guard.logout();
        assert!(!guard.is_authenticated());
    }
}
