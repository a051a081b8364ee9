#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Folio Core
//!
//! Detects the type of a document on disk and hands it to the engine family
//! that can open it. Engines themselves are external; this crate defines the
//! traits they implement and the lookup table that picks between them.

/// Tracing target for file type sniffing.
pub const TRACING_TARGET_SNIFF: &str = "folio_core::sniff";

/// Tracing target for engine dispatch.
pub const TRACING_TARGET_DISPATCH: &str = "folio_core::dispatch";

/// Tracing target for annotation queries.
pub const TRACING_TARGET_ANNOTATION: &str = "folio_core::annotation";

mod error;
mod kind;

pub mod annotation;
pub mod dispatch;
pub mod engine;
pub mod prelude;
pub mod sniff;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

// Re-export key types for convenience
pub use annotation::{
    Annotation, AnnotationKind, PointF, RectF, engine_get_annotation_at_pos,
    engine_get_annotations, engine_has_unsaved_annotations, engine_supports_annotations,
};
pub use dispatch::{DispatchOptions, EngineDispatcher, Route, is_supported_file_type, route};
pub use engine::{AnnotationEngine, BoxedEngine, Engine, EngineFactory, EngineKind, PasswordProvider};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use kind::Kind;
