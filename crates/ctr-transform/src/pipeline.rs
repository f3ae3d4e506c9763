//! The standard preparation of an export: regroup, reconcile, relabel.

use polars::prelude::DataFrame;
use tracing::info;

use ctr_model::DataDictionary;
use ctr_model::conventions::DEFAULT_ROW_ID_COLUMN;

use crate::checkbox::{RegroupOptions, regroup_checkboxes_with_options};
use crate::error::Result;
use crate::relabel::relabel;
use crate::timestamps::{ParseWarning, ReconcileOptions, reconcile_timestamps_with_options};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub row_id_column: String,
    pub keep_archival_columns: bool,
    pub drop_checkbox_dummies: bool,
    /// Relabel coded values when a dictionary is given.
    pub dictionary: Option<DataDictionary>,
}

impl PipelineOptions {
    pub fn new(row_id_column: impl Into<String>) -> Self {
        Self {
            row_id_column: row_id_column.into(),
            keep_archival_columns: false,
            drop_checkbox_dummies: false,
            dictionary: None,
        }
    }

    pub fn with_dictionary(mut self, dictionary: DataDictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_ID_COLUMN)
    }
}

/// What the pipeline did to an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub rows: usize,
    pub checkbox_fields: Vec<String>,
    pub timestamp_fields: Vec<String>,
    pub parse_warnings: Vec<ParseWarning>,
    pub rows_without_timestamp: usize,
    pub relabeled_columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PreparedExport {
    pub frame: DataFrame,
    pub report: PipelineReport,
}

/// Runs the regrouper, then the reconciler, then optional relabeling.
pub fn prepare_export(df: DataFrame, options: &PipelineOptions) -> Result<PreparedExport> {
    let regrouped = regroup_checkboxes_with_options(
        df,
        RegroupOptions {
            drop_dummies: options.drop_checkbox_dummies,
        },
    )?;
    let reconcile_options = ReconcileOptions::new(options.row_id_column.clone())
        .keep_archival_columns(options.keep_archival_columns)
        .exclude_columns(regrouped.families.iter().map(|family| family.base.clone()));
    let reconciled = reconcile_timestamps_with_options(regrouped.frame, &reconcile_options)?;

    let mut report = PipelineReport {
        rows: reconciled.frame.height(),
        checkbox_fields: regrouped
            .families
            .into_iter()
            .map(|family| family.base)
            .collect(),
        timestamp_fields: reconciled.report.timestamp_fields,
        parse_warnings: reconciled.report.parse_warnings,
        rows_without_timestamp: reconciled.report.rows_without_timestamp,
        relabeled_columns: Vec::new(),
    };

    let frame = match &options.dictionary {
        Some(dictionary) => {
            let outcome = relabel(reconciled.frame, dictionary)?;
            report.relabeled_columns = outcome.relabeled;
            outcome.frame
        }
        None => reconciled.frame,
    };

    info!(
        rows = report.rows,
        checkbox_fields = report.checkbox_fields.len(),
        timestamp_fields = report.timestamp_fields.len(),
        parse_warnings = report.parse_warnings.len(),
        "prepared export"
    );
    Ok(PreparedExport { frame, report })
}
