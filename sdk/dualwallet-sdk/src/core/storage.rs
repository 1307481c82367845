use crate::core::constants::{
    CACHED_ADDRESS_KEY, CACHED_DISPLAY_NAME_KEY, DELEGATED_CONNECTIONS_KEY,
    DELEGATED_ID_TOKEN_KEY, DELEGATED_REFRESH_TOKEN_KEY, DELEGATED_TOKEN_KEY,
    WALLET_SELECTION_KEY,
};
use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Minimal key-value store (browser local/session storage, a file, memory).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every entry. Only called on stores that are scoped to a
    /// single session.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Persisted keys derived from, or owned by, a session.
///
/// This is the complete set removed from the persistent store on
/// disconnect; anything else in that store is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    CachedAddress,
    CachedDisplayName,
    WalletSelection,
    DelegatedToken,
    DelegatedRefreshToken,
    DelegatedIdToken,
    DelegatedConnections,
}

impl SessionKey {
    pub const ALL: [SessionKey; 7] = [
        SessionKey::CachedAddress,
        SessionKey::CachedDisplayName,
        SessionKey::WalletSelection,
        SessionKey::DelegatedToken,
        SessionKey::DelegatedRefreshToken,
        SessionKey::DelegatedIdToken,
        SessionKey::DelegatedConnections,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::CachedAddress => CACHED_ADDRESS_KEY,
            SessionKey::CachedDisplayName => CACHED_DISPLAY_NAME_KEY,
            SessionKey::WalletSelection => WALLET_SELECTION_KEY,
            SessionKey::DelegatedToken => DELEGATED_TOKEN_KEY,
            SessionKey::DelegatedRefreshToken => DELEGATED_REFRESH_TOKEN_KEY,
            SessionKey::DelegatedIdToken => DELEGATED_ID_TOKEN_KEY,
            SessionKey::DelegatedConnections => DELEGATED_CONNECTIONS_KEY,
        }
    }
}

/// In-memory store, used for tests and for processes without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock().clear();
        Ok(())
    }
}
