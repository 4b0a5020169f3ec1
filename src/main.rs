//! Command-line entry point for `pmerge`.

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use pmerge::PmergeError;
use pmerge::cli_args::{Cli, Commands};
use pmerge::commands::{run_compare, run_merge};
use pmerge::config::{load_global_args, resolve_merge_args};

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), PmergeError> {
    let global = load_global_args(cli.global)?;
    init_logging(global.log_level());
    match cli.command {
        Commands::Merge(merge_cli) => {
            let args = resolve_merge_args(&merge_cli, &global)?;
            run_merge(&args, &global).map(drop)
        }
        Commands::Compare(args) => run_compare(&args).map(drop),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pmerge: {e}");
            ExitCode::FAILURE
        }
    }
}
