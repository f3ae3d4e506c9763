use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("row identifier column `{0}` not found")]
    MissingRowIdColumn(String),
    #[error("timestamp field `{field}` has no archival column `{expected}`")]
    MissingArchivalColumn { field: String, expected: String },
    #[error("archival column `{0}` pairs with no primary timestamp field")]
    UnpairedArchivalColumn(String),
    #[error("polars: {0}")]
    Polars(#[from] PolarsError),
}

impl TransformError {
    /// True for errors caused by the shape of the export rather than by data.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Polars(_))
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
