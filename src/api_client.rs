//! HTTP client for the tracker's REST API.
//!
//! - `client`: the `ApiClient` transport with token injection and the
//!   global 401 handler.
//! - `types`: endpoint paths, request bodies and response envelopes.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{endpoints, Payload, RequestBody};
