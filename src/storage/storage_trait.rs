//! Key-value storage trait
//!
//! Implementors behave like browser local storage: string keys, string
//! values, and every write is durable once the call returns.

use crate::error_handling::types::StorageError;

/// Persistent string key-value store.
///
/// All methods return a `Result` so that I/O failures can be logged by the
/// caller; removing a missing key is not an error.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Inserts or replaces a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a value if present.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Lists the keys currently stored.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.keys()?.is_empty())
    }
}
