//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── dispatch: DispatchOptions  # CHM / ebook engine flags
//! ├── verbose                    # debug logging without RUST_LOG
//! └── command: Command           # detect, open, annotations
//! ```
//!
//! All global options can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! folio --enable-ebooks detect book.mobi
//!
//! # Or via environment variables
//! FOLIO_ENABLE_EBOOKS=true folio detect book.mobi
//! ```

pub(crate) mod command;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use command::{AnnotationsArgs, Command, DetectArgs, OpenArgs, OutputFormat};
use folio_core::DispatchOptions;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio")]
#[command(about = "Detect document types and the engines that open them")]
#[command(version)]
pub struct Cli {
    /// Engine family feature flags.
    #[clap(flatten)]
    pub dispatch: DispatchOptions,

    /// Log at debug level when `RUST_LOG` is not set.
    #[arg(short, long, global = true, env = "FOLIO_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as it ensures
    /// .env files are loaded before clap parses arguments, allowing environment
    /// variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.command
            .validate()
            .context("invalid command arguments")?;
        Ok(())
    }

    /// Logs configuration at debug level (no passwords).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            enable_chm = self.dispatch.enable_chm,
            enable_ebooks = self.dispatch.enable_ebooks,
            epub_with_pdf_engine = self.dispatch.epub_with_pdf_engine,
            command = self.command.name(),
            "Dispatch configuration"
        );

        if !self.dispatch.enable_ebooks && !self.dispatch.epub_with_pdf_engine {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                "EPUB and FB2 files cannot be opened with both ebook flags disabled"
            );
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
