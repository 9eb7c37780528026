//! Error taxonomy shared by every layer of the client.
//!
//! - `types`: one error enum per concern (configuration, storage, API, wiring).
//! - `messages`: extraction of user-facing messages from API error bodies.

pub mod messages;
pub mod types;

pub use messages::{user_message, GENERIC_FAILURE};
pub use types::{ApiError, ConfigError, ControllerError, StorageError};
