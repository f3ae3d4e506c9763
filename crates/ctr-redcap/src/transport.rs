//! HTTP transport for the REDCap API.
//!
//! Every REDCap API call is a form-encoded POST to a single endpoint, so the
//! transport needs exactly one operation. Tests swap in an in-memory
//! implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

use crate::error::{RedcapError, Result};

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Sends a form-encoded POST and returns the full response.
    fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpReply>;
}

/// Transport backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| RedcapError::Http(error.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpReply> {
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, concat!("ctr/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json, text/csv")
            .form(form)
            .send()
            .map_err(|error| RedcapError::Http(error.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|error| RedcapError::Http(error.to_string()))?;
        debug!(status, bytes = body.len(), "REDCap response received");
        Ok(HttpReply { status, body })
    }
}
