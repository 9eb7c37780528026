//! Session management core module.
//!
//! Holds the authentication state of the client and everything derived from
//! it: the user record, the role and its boolean flags, and the store that
//! drives the credential lifecycle against the API.

/// Role enumeration and the role flags derived from it.
pub mod role;
/// Session state and the shared handle to it.
pub mod session;
/// Login, registration, logout and restoration.
pub mod session_store;
/// Request and response bodies of the authentication endpoints.
pub mod types;

pub use role::{Role, RoleFlags, UserRole};
pub use session::{ProfessorProfile, Session, SharedSession, StudentProfile, User};
pub use session_store::SessionStore;
pub use types::{AuthOutcome, AuthResponse, ProfileUpdate, RegisterPayload};
