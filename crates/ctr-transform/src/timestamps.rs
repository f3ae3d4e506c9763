//! Reconciliation of primary and archival survey timestamps.
//!
//! REDCap keeps a copy of a survey timestamp in a `<field>_arch` column when
//! the live field is cleared or migrated. Each primary field is coerced to a
//! datetime column that prefers its own value and falls back to the archival
//! copy. A derived `date_survey` column carries the latest known timestamp of
//! the row.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, warn};

use ctr_common::{column_names, column_optional_strings, datetime_column, datetime_millis};
use ctr_model::conventions::{DATE_SURVEY_COLUMN, DEFAULT_ROW_ID_COLUMN};

use crate::datetime::{TimestampCell, parse_redcap_timestamp, to_millis};
use crate::error::{Result, TransformError};
use crate::families::discover_timestamp_families;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub row_id_column: String,
    /// Keep `_arch` columns in the output instead of dropping them.
    pub keep_archival_columns: bool,
    /// Columns never considered timestamp fields, such as grouped checkbox columns.
    pub excluded_columns: Vec<String>,
}

impl ReconcileOptions {
    pub fn new(row_id_column: impl Into<String>) -> Self {
        Self {
            row_id_column: row_id_column.into(),
            keep_archival_columns: false,
            excluded_columns: Vec::new(),
        }
    }

    pub fn keep_archival_columns(mut self, keep: bool) -> Self {
        self.keep_archival_columns = keep;
        self
    }

    pub fn exclude_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_columns.extend(columns.into_iter().map(Into::into));
        self
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_ID_COLUMN)
    }
}

/// A non-blank cell that could not be parsed as a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub column: String,
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Primary timestamp fields, in column order.
    pub timestamp_fields: Vec<String>,
    pub parse_warnings: Vec<ParseWarning>,
    /// Rows whose `date_survey` is missing.
    pub rows_without_timestamp: usize,
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub frame: DataFrame,
    pub report: ReconcileReport,
}

/// Reconciles timestamps with default options for the given row identifier.
pub fn reconcile_timestamps(df: DataFrame, row_id_column: &str) -> Result<DataFrame> {
    let outcome = reconcile_timestamps_with_options(df, &ReconcileOptions::new(row_id_column))?;
    Ok(outcome.frame)
}

/// Reconciles every timestamp family of the frame and derives `date_survey`.
///
/// The output keeps the input rows in order. The row identifier comes first,
/// `date_survey` second, and every other column keeps its relative order.
/// Archival columns are dropped unless `keep_archival_columns` is set, and a
/// pre-existing `date_survey` column is replaced.
///
/// # Errors
///
/// Returns a configuration error when the row identifier is absent or a
/// timestamp family is incomplete. Unparseable cells are never errors; they
/// are treated as missing and listed in the report.
pub fn reconcile_timestamps_with_options(
    df: DataFrame,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome> {
    let row_id = options.row_id_column.as_str();
    let names = column_names(&df);
    if !names.iter().any(|name| name == row_id) {
        return Err(TransformError::MissingRowIdColumn(row_id.to_string()));
    }
    let source_names: Vec<String> = names
        .into_iter()
        .filter(|name| name != DATE_SURVEY_COLUMN && !options.excluded_columns.contains(name))
        .collect();
    let families = discover_timestamp_families(&source_names, row_id)?;
    debug!(
        families = families.len(),
        fields = ?families.iter().map(|family| family.primary.as_str()).collect::<Vec<_>>(),
        "discovered timestamp families"
    );

    let mut report = ReconcileReport::default();
    let mut latest: Vec<Option<i64>> = vec![None; df.height()];
    let mut reconciled: HashMap<String, Column> = HashMap::new();
    let mut archival_columns = BTreeSet::new();

    for family in &families {
        let primary = read_timestamps(&df, &family.primary, &mut report.parse_warnings)?;
        let archival = read_timestamps(&df, &family.archival, &mut report.parse_warnings)?;
        let values: Vec<Option<i64>> = primary
            .iter()
            .zip(&archival)
            .map(|(primary, archival)| primary.or(*archival))
            .collect();
        for ((slot, value), archival) in latest.iter_mut().zip(&values).zip(&archival) {
            *slot = (*slot).max(*value).max(*archival);
        }
        reconciled.insert(
            family.primary.clone(),
            datetime_column(&family.primary, values)?,
        );
        archival_columns.insert(family.archival.as_str());
        report.timestamp_fields.push(family.primary.clone());
    }
    report.rows_without_timestamp = latest.iter().filter(|value| value.is_none()).count();

    let mut columns = Vec::with_capacity(df.width() + 1);
    columns.push(df.column(row_id)?.clone());
    columns.push(datetime_column(DATE_SURVEY_COLUMN, latest)?);
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == row_id || name == DATE_SURVEY_COLUMN {
            continue;
        }
        if !options.keep_archival_columns && archival_columns.contains(name) {
            continue;
        }
        match reconciled.remove(name) {
            Some(replacement) => columns.push(replacement),
            None => columns.push(column.clone()),
        }
    }

    let frame = DataFrame::new(columns)?;
    Ok(ReconcileOutcome { frame, report })
}

/// Epoch milliseconds of every cell of a timestamp column.
fn read_timestamps(
    df: &DataFrame,
    name: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?;
    if matches!(column.dtype(), DataType::Datetime(_, _)) {
        return Ok(datetime_millis(column)?);
    }

    let cells = column_optional_strings(df, name).unwrap_or_default();
    let mut invalid = 0usize;
    let values: Vec<Option<i64>> = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            let parsed = cell
                .as_deref()
                .map_or(TimestampCell::Blank, parse_redcap_timestamp);
            if parsed.is_invalid() {
                invalid += 1;
                warnings.push(ParseWarning {
                    column: name.to_string(),
                    row,
                });
            }
            parsed.value().map(to_millis)
        })
        .collect();
    if invalid > 0 {
        warn!(
            column = name,
            count = invalid,
            "unparseable timestamps treated as missing"
        );
    }
    Ok(values)
}
