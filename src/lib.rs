pub mod api_client;
pub use api_client::ApiClient;

pub mod configuration;
pub use configuration::{ClientConfig, ConfigOverrides};

pub mod controller;
pub use controller::Controller;

pub mod error_handling;

pub mod resources;

pub mod routing;

pub mod session_management;

pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
