use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
    #[error("API URL must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error("API token is empty")]
    EmptyToken,
    #[error("timeout must be at least one second")]
    InvalidTimeout,
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
