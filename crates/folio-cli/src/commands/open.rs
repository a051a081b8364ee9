use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use folio_core::{DispatchOptions, Engine, EngineKind, engine_supports_annotations};
use serde::Serialize;

use super::{emit, open_engine};
use crate::TRACING_TARGET_COMMAND;
use crate::config::OpenArgs;

/// The engine that accepted a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OpenReport {
    pub path: PathBuf,
    pub engine: EngineKind,
    pub page_count: usize,
    pub annotations: bool,
}

impl OpenReport {
    pub fn new(engine: &dyn Engine) -> Self {
        Self {
            path: engine.path().to_path_buf(),
            engine: engine.kind(),
            page_count: engine.page_count(),
            annotations: engine_supports_annotations(engine),
        }
    }
}

impl fmt::Display for OpenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: opened with {} engine, {} page(s)",
            self.path.display(),
            self.engine.display_name(),
            self.page_count
        )?;
        if self.annotations {
            write!(f, ", annotations editable")?;
        }
        Ok(())
    }
}

pub(super) fn run<W: Write>(
    args: &OpenArgs,
    options: &DispatchOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let engine = open_engine(&args.path, args.password.as_deref(), options)?;
    let report = OpenReport::new(engine.as_ref());

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        path = %report.path.display(),
        engine = %report.engine,
        page_count = report.page_count,
        "opened document"
    );

    emit(args.format, &[report], out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_core::mock::{MockAnnotations, MockEngine};
    use tempfile::TempDir;

    use super::*;
    use crate::config::OutputFormat;

    fn args(path: PathBuf, password: Option<&str>) -> OpenArgs {
        OpenArgs {
            path,
            password: password.map(str::to_owned),
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_report_from_engine() {
        let engine = MockEngine::new(EngineKind::Mupdf, "a.pdf")
            .with_page_count(3)
            .with_annotations(MockAnnotations::new(Vec::new()));
        let report = OpenReport::new(&engine);
        assert_eq!(report.engine, EngineKind::Mupdf);
        assert_eq!(report.page_count, 3);
        assert!(report.annotations);
        assert_eq!(
            report.to_string(),
            "a.pdf: opened with MuPDF engine, 3 page(s), annotations editable"
        );

        let report = OpenReport::new(&MockEngine::new(EngineKind::Djvu, "b.djvu"));
        assert!(!report.annotations);
    }

    #[test]
    fn test_run_encrypted_pdf() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("locked.pdf");
        fs::write(
            &path,
            b"%PDF-1.4\n1 0 obj << /Type /Page >> endobj\ntrailer << /Encrypt 2 0 R >>\n",
        )
        .unwrap();

        let options = DispatchOptions::default();
        let mut out = Vec::new();
        assert!(run(&args(path.clone(), None), &options, &mut out).is_err());
        assert!(out.is_empty());

        run(&args(path, Some("secret")), &options, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["engine"], "mupdf");
        assert_eq!(value[0]["page_count"], 1);
        assert_eq!(value[0]["annotations"], false);
    }
}
