use crate::error_handling::types::ConfigError;
use log::{debug, info};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_STORAGE_PATH: &str = ".projtrack";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const SESSION_FILE_NAME: &str = "session.json";

/// Runtime parameters of the client.
///
/// Loaded from a TOML file with [`ClientConfig::from_file`], then patched with
/// whatever the command line provides through [`ConfigOverrides`]. Every field
/// has a default, so an empty file is a valid configuration.
///
/// ```toml
/// api_base_url = "https://tracker.example.edu/api"
/// storage_path = "/home/me/.projtrack"
/// request_timeout_secs = 15
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, e.g. `/auth/login`.
    pub api_base_url: String,

    /// Directory holding the persisted session (token and user record).
    pub storage_path: PathBuf,

    /// Per-request timeout. Must be strictly positive.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Command-line overrides for [`ClientConfig`].
///
/// Flattened into the binary's argument parser; each flag can also come from
/// the environment.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Base URL of the tracker API
    #[arg(long, env = "PROJTRACK_API_URL")]
    pub api_base_url: Option<String>,

    /// Directory where the session is persisted
    #[arg(long, env = "PROJTRACK_STORAGE_PATH")]
    pub storage_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides on top of this configuration and
    /// re-validates the result.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(ref url) = overrides.api_base_url {
            debug!("api_base_url overridden from command line");
            self.api_base_url = url.clone();
        }
        if let Some(ref path) = overrides.storage_path {
            self.storage_path = path.clone();
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api_base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::NotInRange(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for `base + "/path"`.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_file(&self) -> PathBuf {
        self.storage_path.join(SESSION_FILE_NAME)
    }
}
