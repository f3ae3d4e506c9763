pub mod config;
pub mod conventions;
pub mod dictionary;
pub mod error;

pub use config::RedcapConfig;
pub use dictionary::{Choice, DataDictionary, FieldMetadata, FieldType, parse_choices};
pub use error::ConfigError;
