//! Typed access to the two persisted session entries.

use std::sync::Arc;

use log::{error, warn};

use crate::error_handling::types::StorageError;
use crate::session_management::session::User;
use crate::storage::storage_trait::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// View over a [`KeyValueStore`] restricted to the bearer token and the
/// serialized user record. Cheap to clone.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored token, `None` when absent or unreadable.
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).unwrap_or_else(|e| {
            error!("Unable to read stored token: {}", e);
            None
        })
    }

    /// Stored user record, `None` when absent, unreadable or unparsable.
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY).unwrap_or_else(|e| {
            error!("Unable to read stored user: {}", e);
            None
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| warn!("Discarding unparsable stored user: {}", e))
            .ok()
    }

    /// Token and user, only when both are present.
    pub fn load(&self) -> Option<(String, User)> {
        Some((self.token()?, self.user()?))
    }

    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| StorageError::Corrupted(e.to_string()))?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)
    }

    /// Removes both entries. Failures are logged, never returned.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                error!("Unable to remove stored {}: {}", key, e);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty().unwrap_or(false)
    }
}
