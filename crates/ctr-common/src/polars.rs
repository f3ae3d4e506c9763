//! Polars value and column helpers.
//!
//! REDCap exports every cell as text, but frames handed in by callers may
//! carry numeric or boolean dtypes. These helpers give all crates the same
//! text view of a cell.

use chrono::DateTime;
use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, NamedFrom, PolarsResult, Series, TimeUnit,
};

/// Converts a Polars `AnyValue` to its REDCap text representation.
///
/// Returns an empty string for `Null`; floats are written without trailing
/// zeros and booleans as `1`/`0` so indicator columns compare as text.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use ctr_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
/// assert_eq!(any_to_string(AnyValue::Boolean(true)), "1");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "1" } else { "0" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use ctr_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(2.50), "2.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Returns true when a cell holds no usable text.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Text view of every cell of a column; `None` if the column is absent.
pub fn column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    Some(
        (0..df.height())
            .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
    )
}

/// Text view of a column that keeps nulls as `None`.
pub fn column_optional_strings(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    Some(
        (0..df.height())
            .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => None,
                value => Some(any_to_string(value)),
            })
            .collect(),
    )
}

/// Column names of a frame as owned strings, in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Builds a text column; `None` cells become nulls.
pub fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

/// Builds a millisecond datetime column from epoch-millisecond values.
pub fn datetime_column(name: &str, millis: Vec<Option<i64>>) -> PolarsResult<Column> {
    let series = Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(series.into())
}

/// Epoch-millisecond values of a datetime column of any time unit.
pub fn datetime_millis(column: &Column) -> PolarsResult<Vec<Option<i64>>> {
    let series = column
        .as_materialized_series()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

/// Returns a copy of the frame with every datetime column rendered as text.
///
/// Used before writing CSV so timestamps keep the given `chrono` format.
pub fn datetimes_to_text(df: &DataFrame, format: &str) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if !matches!(column.dtype(), DataType::Datetime(_, _)) {
            columns.push(column.clone());
            continue;
        }
        let millis = datetime_millis(column)?;
        let text: Vec<Option<String>> = millis
            .into_iter()
            .map(|value| {
                value
                    .and_then(DateTime::from_timestamp_millis)
                    .map(|dt| dt.naive_utc().format(format).to_string())
            })
            .collect();
        columns.push(string_column(column.name().as_str(), text));
    }
    DataFrame::new(columns)
}
