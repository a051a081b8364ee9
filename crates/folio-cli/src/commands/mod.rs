//! Subcommand implementations.
//!
//! Each command builds a serializable report per input and hands it to
//! [`emit`], which renders either one text line per report or a JSON array.

mod annotations;
mod detect;
mod open;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use folio_core::{BoxedEngine, DispatchOptions, EngineDispatcher, PasswordProvider};
use serde::Serialize;

use crate::config::{Cli, Command, OutputFormat};
use crate::probe::ProbeEngineFactory;

/// Runs the parsed command.
pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Detect(args) => detect::run(&args, &cli.dispatch, &mut stdout),
        Command::Open(args) => open::run(&args, &cli.dispatch, &mut stdout),
        Command::Annotations(args) => annotations::run(&args, &cli.dispatch, &mut stdout),
    }
}

/// Opens `path` through the name-then-content dispatch.
fn open_engine(
    path: &Path,
    password: Option<&str>,
    options: &DispatchOptions,
) -> anyhow::Result<BoxedEngine> {
    let dispatcher = EngineDispatcher::with_default_sniffer(ProbeEngineFactory).with_options(*options);
    let password = password.map(str::to_owned);
    let provider = move |_: &Path| password.clone();

    dispatcher
        .create_engine(path, Some(&provider as &dyn PasswordProvider))
        .with_context(|| format!("no engine could open {}", path.display()))
}

/// Writes `reports` in the requested format.
fn emit<T, W>(format: OutputFormat, reports: &[T], out: &mut W) -> anyhow::Result<()>
where
    T: Serialize + Display,
    W: Write,
{
    match format {
        OutputFormat::Text => {
            for report in reports {
                writeln!(out, "{report}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports).context("failed to encode report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Serialize)]
    struct Line {
        name: &'static str,
    }

    impl fmt::Display for Line {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "line {}", self.name)
        }
    }

    #[test]
    fn test_emit_formats() {
        let reports = [Line { name: "a" }, Line { name: "b" }];

        let mut text = Vec::new();
        emit(OutputFormat::Text, &reports, &mut text).unwrap();
        assert_eq!(String::from_utf8(text).unwrap(), "line a\nline b\n");

        let mut json = Vec::new();
        emit(OutputFormat::Json, &reports, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value, serde_json::json!([{ "name": "a" }, { "name": "b" }]));
    }

    #[test]
    fn test_open_engine_reports_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        let error = open_engine(&path, None, &DispatchOptions::default()).unwrap_err();
        assert!(error.to_string().contains("no engine could open"));
    }
}
