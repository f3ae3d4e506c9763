//! Blocking client for the REDCap HTTP API.
//!
//! ```no_run
//! use ctr_model::RedcapConfig;
//! use ctr_redcap::{RecordExportRequest, RedcapClient};
//!
//! let config = RedcapConfig::from_env()?;
//! let client = RedcapClient::new(config)?;
//! let records = client.export_records(&RecordExportRequest::new().forms(["enrolment"]))?;
//! println!("{} records", records.height());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod error;
pub mod log;
pub mod request;
pub mod transport;

pub use client::RedcapClient;
pub use error::{RedcapError, Result};
pub use log::LogEntry;
pub use request::{LOG_TIME_FORMAT, LogExportRequest, LogType, RecordExportRequest};
pub use transport::{HttpReply, ReqwestTransport, Transport};
