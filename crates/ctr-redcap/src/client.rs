//! REDCap API client.
//!
//! Each export is a single POST round-trip. The client holds no state beyond
//! its configuration and transport, and never retries on its own.

use std::time::Duration;

use polars::prelude::DataFrame;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use ctr_ingest::frame_from_csv_str;
use ctr_model::{DataDictionary, RedcapConfig};

use crate::error::{RedcapError, Result};
use crate::log::LogEntry;
use crate::request::{FormParams, LogExportRequest, RecordExportRequest, param, push_list};
use crate::transport::{ReqwestTransport, Transport};

/// Client for one REDCap project (one API token).
pub struct RedcapClient<T = ReqwestTransport> {
    config: RedcapConfig,
    transport: T,
}

impl RedcapClient<ReqwestTransport> {
    /// Creates a client that talks HTTP with the configured timeout.
    pub fn new(config: RedcapConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> RedcapClient<T> {
    /// Creates a client over a caller-supplied transport.
    pub fn with_transport(config: RedcapConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &RedcapConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// REDCap version string of the server; doubles as a connectivity check.
    pub fn export_version(&self) -> Result<String> {
        let body = self.call("version", vec![param("format", "json")])?;
        Ok(body.trim().to_string())
    }

    /// Exports records as a flat, all-text frame of raw codes.
    pub fn export_records(&self, request: &RecordExportRequest) -> Result<DataFrame> {
        let body = self.call("record", request.form_params())?;
        let frame = frame_from_csv_str(&body)?;
        info!(
            rows = frame.height(),
            columns = frame.width(),
            "exported records"
        );
        Ok(frame)
    }

    /// Exports the data dictionary, optionally restricted to some forms.
    pub fn export_metadata(&self, forms: &[String]) -> Result<DataDictionary> {
        let mut params = vec![param("format", "json")];
        push_list(&mut params, "forms", forms);
        let body = self.call("metadata", params)?;
        let dictionary: DataDictionary = decode("metadata", &body)?;
        info!(fields = dictionary.len(), "exported data dictionary");
        Ok(dictionary)
    }

    /// Exports project logging entries.
    pub fn export_logging(&self, request: &LogExportRequest) -> Result<Vec<LogEntry>> {
        let body = self.call("log", request.form_params())?;
        let entries: Vec<LogEntry> = decode("log", &body)?;
        info!(entries = entries.len(), "exported project logging");
        Ok(entries)
    }

    fn call(&self, content: &'static str, params: FormParams) -> Result<String> {
        let mut form = Vec::with_capacity(params.len() + 2);
        form.push(param("token", &self.config.token));
        form.push(param("content", content));
        form.extend(params);

        debug!(content, url = %self.config.api_url, "REDCap API request");
        let reply = self.transport.post_form(&self.config.api_url, &form)?;
        if !reply.is_success() {
            return Err(RedcapError::Api {
                status: reply.status,
                message: api_error_message(&reply.body),
            });
        }
        Ok(reply.body)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// REDCap's `{"error": "..."}` message, or the raw body when it is not JSON.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn decode<D: DeserializeOwned>(content: &'static str, body: &str) -> Result<D> {
    serde_json::from_str(body).map_err(|error| RedcapError::Decode {
        content,
        message: error.to_string(),
    })
}
