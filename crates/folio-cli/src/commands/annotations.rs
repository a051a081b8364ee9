use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use folio_core::{
    Annotation, DispatchOptions, Engine, EngineKind, engine_get_annotation_at_pos,
    engine_get_annotations, engine_has_unsaved_annotations, engine_supports_annotations,
};
use serde::Serialize;

use super::{emit, open_engine};
use crate::TRACING_TARGET_COMMAND;
use crate::config::AnnotationsArgs;

/// Annotations found in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AnnotationsReport {
    pub path: PathBuf,
    pub engine: EngineKind,
    /// False when the engine cannot edit annotations; the list is then empty.
    pub supported: bool,
    pub unsaved: bool,
    pub annotations: Vec<Annotation>,
}

impl AnnotationsReport {
    /// Queries `engine` through the annotation gate.
    pub fn collect(engine: &dyn Engine, args: &AnnotationsArgs) -> Self {
        let supported = engine_supports_annotations(engine);
        let mut annotations = Vec::new();

        match (args.page, args.at) {
            (Some(page_no), Some(at)) => {
                annotations.extend(engine_get_annotation_at_pos(
                    engine,
                    page_no,
                    at.0,
                    args.allowed_kinds(),
                ));
            }
            (page, _) => {
                engine_get_annotations(engine, &mut annotations);
                annotations.retain(|annot| {
                    page.is_none_or(|page_no| annot.page_no == page_no)
                        && annot.is_allowed(args.allowed_kinds())
                });
            }
        }

        Self {
            path: engine.path().to_path_buf(),
            engine: engine.kind(),
            supported,
            unsaved: engine_has_unsaved_annotations(engine),
            annotations,
        }
    }
}

impl fmt::Display for AnnotationsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.supported {
            return write!(
                f,
                "{}: the {} engine does not support annotations",
                self.path.display(),
                self.engine.display_name()
            );
        }

        write!(f, "{}: {} annotation(s)", self.path.display(), self.annotations.len())?;
        if self.unsaved {
            write!(f, " (unsaved changes)")?;
        }
        for annot in &self.annotations {
            write!(
                f,
                "\n  page {} {} at ({}, {}, {}, {})",
                annot.page_no, annot.kind, annot.rect.x, annot.rect.y, annot.rect.dx, annot.rect.dy
            )?;
            if !annot.contents.is_empty() {
                write!(f, ": {}", annot.contents)?;
            }
        }
        Ok(())
    }
}

pub(super) fn run<W: Write>(
    args: &AnnotationsArgs,
    options: &DispatchOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let engine = open_engine(&args.open.path, args.open.password.as_deref(), options)?;
    let report = AnnotationsReport::collect(engine.as_ref(), args);

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        path = %report.path.display(),
        supported = report.supported,
        count = report.annotations.len(),
        "collected annotations"
    );

    emit(args.open.format, &[report], out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use folio_core::mock::{MockAnnotations, MockEngine};
    use folio_core::{AnnotationKind, PointF, RectF};
    use tempfile::TempDir;

    use super::*;
    use crate::config::command::Position;
    use crate::config::{OpenArgs, OutputFormat};

    fn args(page: Option<usize>, at: Option<(f32, f32)>, kinds: Vec<AnnotationKind>) -> AnnotationsArgs {
        AnnotationsArgs {
            open: OpenArgs {
                path: PathBuf::from("a.pdf"),
                password: None,
                format: OutputFormat::Text,
            },
            page,
            at: at.map(|(x, y)| Position(PointF::new(x, y))),
            kinds,
        }
    }

    fn engine(kind: EngineKind) -> MockEngine {
        MockEngine::new(kind, "a.pdf").with_annotations(
            MockAnnotations::new(vec![
                Annotation::new(AnnotationKind::Highlight, 1, RectF::new(0.0, 0.0, 50.0, 50.0))
                    .with_contents("first"),
                Annotation::new(AnnotationKind::Text, 1, RectF::new(10.0, 10.0, 10.0, 10.0)),
                Annotation::new(AnnotationKind::Ink, 2, RectF::new(0.0, 0.0, 5.0, 5.0)),
            ])
            .with_unsaved(true),
        )
    }

    #[test]
    fn test_list_all_and_by_page() {
        let engine = engine(EngineKind::Mupdf);

        let report = AnnotationsReport::collect(&engine, &args(None, None, Vec::new()));
        assert!(report.supported);
        assert!(report.unsaved);
        assert_eq!(report.annotations.len(), 3);

        let report = AnnotationsReport::collect(&engine, &args(Some(2), None, Vec::new()));
        assert_eq!(report.annotations.len(), 1);
        assert_eq!(report.annotations[0].kind, AnnotationKind::Ink);
    }

    #[test]
    fn test_lookup_at_position() {
        let engine = engine(EngineKind::Mupdf);

        let report = AnnotationsReport::collect(&engine, &args(Some(1), Some((15.0, 15.0)), Vec::new()));
        assert_eq!(report.annotations.len(), 1);
        assert_eq!(report.annotations[0].kind, AnnotationKind::Text);

        let report = AnnotationsReport::collect(
            &engine,
            &args(Some(1), Some((15.0, 15.0)), vec![AnnotationKind::Highlight]),
        );
        assert_eq!(report.annotations[0].kind, AnnotationKind::Highlight);
    }

    #[test]
    fn test_unsupported_engine_is_gated() {
        let engine = engine(EngineKind::Xps);

        let report = AnnotationsReport::collect(&engine, &args(None, None, Vec::new()));
        assert!(!report.supported);
        assert!(!report.unsaved);
        assert!(report.annotations.is_empty());
        assert_eq!(
            report.to_string(),
            "a.pdf: the XPS engine does not support annotations"
        );
    }

    #[test]
    fn test_text_listing() {
        let engine = engine(EngineKind::Mupdf);
        let report = AnnotationsReport::collect(&engine, &args(Some(2), None, Vec::new()));
        assert_eq!(
            report.to_string(),
            "a.pdf: 1 annotation(s) (unsaved changes)\n  page 2 ink at (0, 0, 5, 5)"
        );
    }

    #[test]
    fn test_run_with_image_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.png");
        fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

        let mut args = args(None, None, Vec::new());
        args.open.path = path;
        let mut out = Vec::new();
        run(&args, &DispatchOptions::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("the Image engine does not support annotations\n"));
    }
}
