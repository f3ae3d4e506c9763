//! CLI argument definitions.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ctr_cli::logging::{LogConfig, LogFormat};
use ctr_model::conventions::DEFAULT_ROW_ID_COLUMN;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "ctr",
    version,
    about = "Export, reconcile and relabel REDCap registry data",
    long_about = "Export clinical-trial registry data from REDCap or load offline CSV exports,\n\
                  reconcile survey timestamps, regroup checkbox fields and write one clean CSV.\n\n\
                  API settings come from --config or the REDCAP_API_URL and REDCAP_API_TOKEN\n\
                  environment variables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Record identifier column.
    #[arg(long = "row-id", value_name = "COLUMN", default_value = DEFAULT_ROW_ID_COLUMN, global = true)]
    pub row_id: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export records through the API, prepare them and write a CSV.
    Fetch(FetchArgs),

    /// Merge and prepare offline CSV exports.
    Normalize(NormalizeArgs),

    /// Print the project data dictionary.
    Dictionary(DictionaryArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// TOML file with `api_url`, `token` and optional `timeout_secs`.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fields to export (comma separated).
    #[arg(long = "fields", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Instruments to export (comma separated).
    #[arg(long = "forms", value_delimiter = ',')]
    pub forms: Vec<String>,

    /// Events to export (comma separated, longitudinal projects).
    #[arg(long = "events", value_delimiter = ',')]
    pub events: Vec<String>,

    /// REDCap filter logic, e.g. "[age] >= 18".
    #[arg(long = "filter", value_name = "LOGIC")]
    pub filter: Option<String>,

    /// Include survey identifier and timestamp fields.
    #[arg(long = "survey-fields")]
    pub survey_fields: bool,

    /// Replace choice codes with labels from the project data dictionary.
    #[arg(long = "relabel")]
    pub relabel: bool,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Output CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// CSV exports or folders of CSV exports.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Data dictionary JSON (REDCap metadata export) used to relabel codes.
    #[arg(long = "relabel-with", value_name = "DICT.json")]
    pub relabel_with: Option<PathBuf>,

    #[command(flatten)]
    pub transform: TransformArgs,

    /// Output CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct DictionaryArgs {
    /// TOML file with `api_url`, `token` and optional `timeout_secs`.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only these instruments (comma separated).
    #[arg(long = "forms", value_delimiter = ',')]
    pub forms: Vec<String>,

    /// Tab-separated output instead of a table.
    #[arg(long = "plain")]
    pub plain: bool,
}

#[derive(Args, Clone, Copy)]
pub struct TransformArgs {
    /// Keep `_arch` timestamp columns in the output.
    #[arg(long = "keep-archival")]
    pub keep_archival: bool,

    /// Drop checkbox dummy columns once they are regrouped.
    #[arg(long = "drop-dummies")]
    pub drop_dummies: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    /// `--log-level` wins over `-v`/`-q`; `RUST_LOG` applies only when neither is given.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter: explicit.unwrap_or_else(|| self.verbosity.tracing_level_filter()),
            use_env_filter: explicit.is_none() && !self.verbosity.is_present(),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}
