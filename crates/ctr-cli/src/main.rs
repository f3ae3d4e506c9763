//! `ctr`: REDCap registry export tool.

use std::process::ExitCode;

use clap::Parser;
use ctr_cli::logging::init_logging;
use ctr_cli::summary::{print_dictionary, print_run_summary};

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_dictionary, run_fetch, run_normalize};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Fetch(args) => run_fetch(args, &cli.row_id).map(|summary| print_run_summary(&summary)),
        Command::Normalize(args) => {
            run_normalize(args, &cli.row_id).map(|summary| print_run_summary(&summary))
        }
        Command::Dictionary(args) => {
            run_dictionary(args).map(|dictionary| print_dictionary(&dictionary, args.plain))
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
