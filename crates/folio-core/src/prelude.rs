//! Convenient re-exports for common use.

pub use crate::annotation::{Annotation, AnnotationKind, PointF, RectF};
pub use crate::dispatch::{DispatchOptions, EngineDispatcher};
pub use crate::engine::{BoxedEngine, Engine, EngineFactory, EngineKind, PasswordProvider};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::kind::Kind;
pub use crate::sniff::{DefaultSniffer, FileTypeSniffer};
