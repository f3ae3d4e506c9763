//! REDCap API connection settings.
//!
//! Settings are an explicit value handed to the client. Environment variables
//! and TOML files are only read by the constructors below, once, at the
//! application boundary.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the REDCap API endpoint.
pub const ENV_API_URL: &str = "REDCAP_API_URL";
/// Environment variable holding the REDCap API token.
pub const ENV_API_TOKEN: &str = "REDCAP_API_TOKEN";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Deserialize)]
pub struct RedcapConfig {
    pub api_url: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RedcapConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            api_url: api_url.into().trim().to_string(),
            token: token.into().trim().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Reads `REDCAP_API_URL` and `REDCAP_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup (environment-like).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL).ok_or(ConfigError::MissingSetting(ENV_API_URL))?;
        let token = lookup(ENV_API_TOKEN).ok_or(ConfigError::MissingSetting(ENV_API_TOKEN))?;
        Self::new(api_url, token)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents)?;
        config.api_url = config.api_url.trim().to_string();
        config.token = config.token.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the URL scheme, token and timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lower = self.api_url.to_ascii_lowercase();
        if !(lower.starts_with("https://") || lower.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        if self.token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

impl fmt::Debug for RedcapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedcapConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
