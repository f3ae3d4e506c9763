use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    #[error("read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate column header: {0}")]
    DuplicateHeader(String),
    #[error("row {line} has {found} cells but the header has {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("export #{index} has no `{row_id}` column")]
    MissingRowId { index: usize, row_id: String },
    #[error("polars: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
    #[error("io {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
