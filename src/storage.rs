//! Persistent client-side storage
//!
//! The client persists exactly two entries across restarts: the bearer
//! token and the serialized user record. This module provides the key-value
//! abstraction they live in and the typed view over those two keys.
//!
//! Components:
//! - `storage_trait`: the `KeyValueStore` trait defining a uniform API.
//! - `file_storage`: JSON-file backed implementation used by the binary.
//! - `memory_storage`: in-process implementation for tests and embedders.
//! - `credentials`: typed access to the token and user entries.

pub mod credentials;
pub mod file_storage;
pub mod memory_storage;
pub mod storage_trait;

pub use credentials::{CredentialStore, TOKEN_KEY, USER_KEY};
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use storage_trait::KeyValueStore;
