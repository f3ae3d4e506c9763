//! Export preparation runs behind the `fetch` and `normalize` commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use tracing::{debug, info};

use ctr_ingest::{expand_inputs, merge_exports, read_export_csv, write_frame_csv};
use ctr_model::DataDictionary;
use ctr_redcap::{RecordExportRequest, RedcapClient, Transport};
use ctr_transform::{PipelineOptions, PipelineReport, prepare_export};

/// Result of one preparation run.
#[derive(Debug)]
pub struct RunSummary {
    /// Source files, or the API URL for fetched exports.
    pub sources: Vec<String>,
    pub output: PathBuf,
    pub columns: usize,
    pub report: PipelineReport,
}

/// Loads a data dictionary saved from the REDCap metadata export (JSON).
pub fn load_dictionary(path: &Path) -> Result<DataDictionary> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read data dictionary {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse data dictionary {}", path.display()))
}

/// Merges offline exports, prepares them and writes one CSV.
pub fn normalize_exports(
    inputs: &[PathBuf],
    options: &PipelineOptions,
    output: &Path,
) -> Result<RunSummary> {
    let files = expand_inputs(inputs).context("collect input files")?;
    if files.is_empty() {
        bail!("no CSV exports found in the given inputs");
    }
    let mut frames = Vec::with_capacity(files.len());
    for file in &files {
        debug!(file = %file.display(), "loading export");
        let frame =
            read_export_csv(file).with_context(|| format!("load export {}", file.display()))?;
        frames.push(frame);
    }
    let merged = merge_exports(&frames, &options.row_id_column).context("merge exports")?;
    info!(files = files.len(), rows = merged.height(), "merged offline exports");

    let sources = files.iter().map(|file| file.display().to_string()).collect();
    prepare_and_write(merged, options, output, sources)
}

/// Exports records through the API, prepares them and writes one CSV.
///
/// With `relabel`, the data dictionary of the requested forms is exported
/// first and used to replace choice codes with labels.
pub fn fetch_export<T: Transport>(
    client: &RedcapClient<T>,
    request: &RecordExportRequest,
    relabel: bool,
    options: &PipelineOptions,
    output: &Path,
) -> Result<RunSummary> {
    let mut options = options.clone();
    if relabel {
        let dictionary = client
            .export_metadata(&request.forms)
            .context("export data dictionary")?;
        options.dictionary = Some(dictionary);
    }
    let records = client.export_records(request).context("export records")?;
    if records.width() == 0 {
        bail!("REDCap returned no records for this request");
    }
    let sources = vec![client.config().api_url.clone()];
    prepare_and_write(records, &options, output, sources)
}

fn prepare_and_write(
    df: DataFrame,
    options: &PipelineOptions,
    output: &Path,
    sources: Vec<String>,
) -> Result<RunSummary> {
    let prepared = prepare_export(df, options).context("prepare export")?;
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    write_frame_csv(&prepared.frame, output)
        .with_context(|| format!("write {}", output.display()))?;
    info!(output = %output.display(), rows = prepared.report.rows, "wrote prepared export");
    Ok(RunSummary {
        sources,
        output: output.to_path_buf(),
        columns: prepared.frame.width(),
        report: prepared.report,
    })
}
