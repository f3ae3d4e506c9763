//! Error types for REDCap API access.

use ctr_ingest::IngestError;
use ctr_model::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RedcapError {
    /// Connection settings are unusable.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Http(String),

    /// REDCap answered with a non-success status.
    #[error("REDCap API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A JSON response did not have the expected shape.
    #[error("could not decode {content} response: {message}")]
    Decode {
        content: &'static str,
        message: String,
    },

    /// The record CSV could not be loaded into a frame.
    #[error("record payload: {0}")]
    Payload(#[from] IngestError),
}

impl RedcapError {
    /// Returns whether the same request may succeed when retried later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Decode { .. } | Self::Payload(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RedcapError>;
