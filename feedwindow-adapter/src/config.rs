//! Feed configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use feedwindow::{FeedOptions, RenderMode};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`FeedConfig::base_url`].
pub const BASE_URL_ENV: &str = "FEEDWINDOW_BASE_URL";

/// Driver configuration
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Root of the REST API serving `/posts`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    pub user_agent: String,
    /// Initial render mode
    pub mode: RenderMode,
    /// Geometry, paging and trigger settings
    pub options: FeedOptions,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            request_timeout_ms: 10_000,
            user_agent: concat!("feedwindow/", env!("CARGO_PKG_VERSION")).to_string(),
            mode: RenderMode::default(),
            options: FeedOptions::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0} must be greater than zero")]
    Zero(&'static str),
}

impl FeedConfig {
    /// Reads a JSON config file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let opts = &self.options;
        if opts.item_height == 0 {
            return Err(ConfigError::Zero("options.item_height"));
        }
        if opts.container_height == 0 {
            return Err(ConfigError::Zero("options.container_height"));
        }
        if opts.page_size == 0 {
            return Err(ConfigError::Zero("options.page_size"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Zero("request_timeout_ms"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
