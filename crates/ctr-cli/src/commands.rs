use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use ctr_cli::pipeline::{RunSummary, fetch_export, load_dictionary, normalize_exports};
use ctr_model::{DataDictionary, RedcapConfig};
use ctr_redcap::{RecordExportRequest, RedcapClient};
use ctr_transform::PipelineOptions;

use crate::cli::{DictionaryArgs, FetchArgs, NormalizeArgs, TransformArgs};

pub fn run_fetch(args: &FetchArgs, row_id: &str) -> Result<RunSummary> {
    let client = connect(args.config.as_deref())?;
    let mut request = RecordExportRequest::new()
        .fields(args.fields.iter().cloned())
        .forms(args.forms.iter().cloned())
        .events(args.events.iter().cloned())
        .export_survey_fields(args.survey_fields);
    if let Some(filter) = &args.filter {
        request = request.filter_logic(filter.clone());
    }
    let options = pipeline_options(row_id, args.transform);
    fetch_export(&client, &request, args.relabel, &options, &args.output)
}

pub fn run_normalize(args: &NormalizeArgs, row_id: &str) -> Result<RunSummary> {
    let mut options = pipeline_options(row_id, args.transform);
    if let Some(path) = &args.relabel_with {
        options.dictionary = Some(load_dictionary(path)?);
    }
    normalize_exports(&args.inputs, &options, &args.output)
}

pub fn run_dictionary(args: &DictionaryArgs) -> Result<DataDictionary> {
    let client = connect(args.config.as_deref())?;
    client
        .export_metadata(&args.forms)
        .context("export data dictionary")
}

fn connect(config_path: Option<&Path>) -> Result<RedcapClient> {
    let config = match config_path {
        Some(path) => RedcapConfig::from_toml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => RedcapConfig::from_env().context("read API settings from the environment")?,
    };
    info!(url = %config.api_url, "connecting to REDCap");
    RedcapClient::new(config).context("create API client")
}

fn pipeline_options(row_id: &str, transform: TransformArgs) -> PipelineOptions {
    let mut options = PipelineOptions::new(row_id);
    options.keep_archival_columns = transform.keep_archival;
    options.drop_checkbox_dummies = transform.drop_dummies;
    options
}
