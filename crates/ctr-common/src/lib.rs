//! Shared utilities for CTR crates.
//!
//! This crate provides the Polars helpers used across the workspace to read
//! cells as REDCap text and to build text and datetime columns.

pub mod polars;

pub use self::polars::{
    any_to_string, column_names, column_optional_strings, column_strings, datetime_column,
    datetime_millis, datetimes_to_text, format_numeric, is_blank, string_column,
};
