#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod probe;
mod telemetry;

use std::process;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "folio_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "folio_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "folio_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "folio_cli::command";
pub const TRACING_TARGET_PROBE: &str = "folio_cli::probe";

fn main() {
    let Err(error) = run() else {
        process::exit(0);
    };

    if tracing::enabled!(target: TRACING_TARGET_SHUTDOWN, tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.verbose)?;
    cli.validate()?;
    cli.log();

    commands::run(cli)
}
