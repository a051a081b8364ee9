//! Annotation records and the capability-gated pass-through queries.
//!
//! Only the MuPDF engine edits annotations in place. The functions here check
//! the engine's [`EngineKind`] and return the "unsupported" answer for every
//! other engine, so callers never need to know which engine they hold.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::TRACING_TARGET_ANNOTATION;
use crate::engine::{AnnotationEngine, Engine, EngineKind};

/// A point in page coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self { x, y, dx, dy }
    }

    /// Returns true if `pt` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, pt: PointF) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.dx && pt.y >= self.y && pt.y <= self.y + self.dy
    }
}

/// PDF annotation subtype.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Text,
    Link,
    FreeText,
    Line,
    Square,
    Circle,
    Polygon,
    PolyLine,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    Redact,
    Stamp,
    Caret,
    Ink,
    Popup,
    FileAttachment,
    Sound,
    Movie,
    Widget,
    Screen,
    PrinterMark,
    TrapNet,
    Watermark,
    #[strum(serialize = "3d")]
    #[serde(rename = "3d")]
    ThreeD,
    #[default]
    Unknown,
}

/// A document annotation, owned by whoever received it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation subtype.
    pub kind: AnnotationKind,
    /// 1-based page number.
    pub page_no: usize,
    /// Bounds in page coordinates.
    pub rect: RectF,
    /// Text contents, empty for annotations without text.
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub author: Option<String>,
    /// RGBA color.
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub modified_at: Option<Timestamp>,
}

impl Annotation {
    /// Creates an annotation with empty contents and no metadata.
    pub fn new(kind: AnnotationKind, page_no: usize, rect: RectF) -> Self {
        Self {
            kind,
            page_no,
            rect,
            contents: String::new(),
            author: None,
            color: None,
            modified_at: None,
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_modified_at(mut self, modified_at: Timestamp) -> Self {
        self.modified_at = Some(modified_at);
        self
    }

    /// Returns true if `allowed` is absent or lists this annotation's kind.
    #[must_use]
    pub fn is_allowed(&self, allowed: Option<&[AnnotationKind]>) -> bool {
        allowed.is_none_or(|kinds| kinds.contains(&self.kind))
    }
}

/// Returns the annotation capability of `engine` if it is a MuPDF engine.
fn annotation_engine(engine: &dyn Engine) -> Option<&dyn AnnotationEngine> {
    if engine.kind() != EngineKind::Mupdf {
        return None;
    }

    let capability = engine.as_annotation_engine();
    if capability.is_none() {
        tracing::warn!(
            target: TRACING_TARGET_ANNOTATION,
            path = %engine.path().display(),
            "mupdf engine exposes no annotation capability"
        );
    }
    capability
}

/// Returns true if `engine` supports in-place annotation editing.
pub fn engine_supports_annotations(engine: &dyn Engine) -> bool {
    annotation_engine(engine).is_some()
}

/// Appends all annotations of `engine` to `out`.
///
/// Returns false, leaving `out` untouched, for engines without annotation support.
pub fn engine_get_annotations(engine: &dyn Engine, out: &mut Vec<Annotation>) -> bool {
    let Some(annots) = annotation_engine(engine) else {
        return false;
    };

    let found = annots.annotations();
    tracing::trace!(
        target: TRACING_TARGET_ANNOTATION,
        path = %engine.path().display(),
        count = found.len(),
        "collected annotations"
    );
    out.extend(found);
    true
}

/// Returns true if `engine` holds annotation edits that were not saved yet.
pub fn engine_has_unsaved_annotations(engine: &dyn Engine) -> bool {
    annotation_engine(engine).is_some_and(|annots| annots.has_unsaved_annotations())
}

/// Finds the annotation at `pos` on page `page_no`.
///
/// The returned annotation is owned by the caller. Engines without annotation
/// support always return `None`.
pub fn engine_get_annotation_at_pos(
    engine: &dyn Engine,
    page_no: usize,
    pos: PointF,
    allowed: Option<&[AnnotationKind]>,
) -> Option<Annotation> {
    annotation_engine(engine)?.annotation_at_pos(page_no, pos, allowed)
}
