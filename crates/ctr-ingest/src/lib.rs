//! Loading, merging and writing of REDCap flat exports.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod merge;

pub use csv_table::{
    frame_from_csv_reader, frame_from_csv_str, read_export_csv, write_frame_csv,
    write_frame_csv_to,
};
pub use discovery::{expand_inputs, list_csv_files};
pub use error::{IngestError, Result};
pub use merge::merge_exports;
