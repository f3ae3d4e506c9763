//! CSV loading and writing for REDCap flat exports.
//!
//! REDCap returns record exports as CSV text and offline exports are saved
//! the same way. Every column is loaded as text so codes such as `01` keep
//! their leading zeros; typing is left to the transforms.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use ctr_common::{any_to_string, datetimes_to_text, string_column};
use ctr_model::conventions::TIMESTAMP_FORMAT;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Parses CSV text (header row first) into an all-text frame.
pub fn frame_from_csv_str(text: &str) -> Result<DataFrame> {
    frame_from_csv_reader(text.as_bytes())
}

/// Parses CSV from any reader into an all-text frame.
///
/// Short rows are padded with empty cells; rows longer than the header are
/// rejected. Input without a header row yields an empty frame.
pub fn frame_from_csv_reader<R: Read>(reader: R) -> Result<DataFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(String::is_empty) {
        return Ok(DataFrame::empty());
    }
    let mut seen = BTreeSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateHeader(header.clone()));
        }
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(IngestError::RaggedRow {
                line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(Some(record.get(idx).unwrap_or("").to_string()));
        }
    }

    let columns = headers
        .iter()
        .zip(values)
        .map(|(name, cells)| string_column(name, cells))
        .collect();
    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), columns = df.width(), "parsed csv export");
    Ok(df)
}

/// Reads an offline REDCap CSV export.
pub fn read_export_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    frame_from_csv_reader(file)
}

/// Writes a frame as CSV; datetime columns use the REDCap timestamp format.
pub fn write_frame_csv_to<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let df = datetimes_to_text(df, TIMESTAMP_FORMAT)?;
    let mut writer = WriterBuilder::new().from_writer(writer);
    let headers: Vec<&str> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    writer.write_record(&headers)?;
    let columns = df.get_columns();
    for idx in 0..df.height() {
        let row: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes a frame to a CSV file, replacing any existing file.
pub fn write_frame_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_frame_csv_to(df, file)
}
