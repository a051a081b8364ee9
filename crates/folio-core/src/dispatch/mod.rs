//! Kind-to-engine dispatch.
//!
//! [`route`] is the lookup table: it decides, without touching the disk,
//! which engine family a detected [`Kind`] goes to. [`EngineDispatcher`]
//! executes that decision against an [`EngineFactory`] and adds the
//! name-then-content fallback.

mod options;

use std::path::Path;

pub use options::{DispatchOptions, is_supported_file_type};

use crate::engine::{BoxedEngine, EngineFactory, EngineKind, PasswordProvider};
use crate::sniff::{DefaultSniffer, FileTypeSniffer};
use crate::{Kind, TRACING_TARGET_DISPATCH};

/// Where a kind is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// A single engine family.
    Engine(EngineKind),
    /// A folder: unpacked XPS if the factory recognizes one, else an image folder.
    Directory,
}

/// Picks the engine family for `kind`, in priority order.
///
/// Returns `None` for kinds no enabled family handles.
pub fn route(kind: Kind, options: &DispatchOptions) -> Option<Route> {
    use EngineKind as E;

    if kind.is_unknown() {
        return None;
    }

    let family = if kind == Kind::Pdf {
        E::Mupdf
    } else if E::Xps.supports(kind) {
        E::Xps
    } else if E::Djvu.supports(kind) {
        E::Djvu
    } else if E::Image.supports(kind) {
        E::Image
    } else if kind == Kind::Directory {
        return Some(Route::Directory);
    } else if E::Cbx.supports(kind) {
        E::Cbx
    } else if E::Ps.supports(kind) {
        E::Ps
    } else if options.enable_chm && kind == Kind::Chm {
        E::Chm
    } else if kind == Kind::Txt {
        E::Txt
    } else if options.epub_with_pdf_engine && E::Mupdf.supports(kind) {
        E::Mupdf
    } else if !options.enable_ebooks {
        return None;
    } else {
        match kind {
            Kind::Epub => E::Epub,
            Kind::Fb2 | Kind::Fb2z => E::Fb2,
            Kind::Mobi => E::Mobi,
            Kind::PalmDoc | Kind::Html => E::Pdb,
            _ => return None,
        }
    };

    Some(Route::Engine(family))
}

/// Creates engines for files on disk.
///
/// Holds the engine constructors, the type sniffer and the feature flags.
/// Every method reports failure as `None`; constructor errors are logged.
#[derive(Debug)]
pub struct EngineDispatcher<F, S = DefaultSniffer> {
    factory: F,
    sniffer: S,
    options: DispatchOptions,
}

impl<F: EngineFactory> EngineDispatcher<F> {
    /// Creates a dispatcher using the built-in sniffer and default options.
    pub fn with_default_sniffer(factory: F) -> Self {
        Self::new(factory, DefaultSniffer)
    }
}

impl<F, S> EngineDispatcher<F, S>
where
    F: EngineFactory,
    S: FileTypeSniffer,
{
    /// Creates a dispatcher with default options.
    pub fn new(factory: F, sniffer: S) -> Self {
        Self {
            factory,
            sniffer,
            options: DispatchOptions::default(),
        }
    }

    /// Replaces the dispatch options.
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn sniffer(&self) -> &S {
        &self.sniffer
    }

    /// Opens `path` with the engine matching its detected kind.
    ///
    /// The kind is first guessed from the file name. If no engine can be
    /// built for it, the kind is guessed again from the file contents and,
    /// if that guess differs, dispatch is retried once.
    pub fn create_engine(
        &self,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Option<BoxedEngine> {
        if path.as_os_str().is_empty() {
            tracing::warn!(
                target: TRACING_TARGET_DISPATCH,
                "refusing to create an engine for an empty path"
            );
            return None;
        }

        let kind = self.sniffer.guess_from_name(path);
        if let Some(engine) = self.create_engine_for_kind(kind, path, password) {
            return Some(engine);
        }

        let content_kind = self.sniffer.guess_from_content(path);
        if content_kind == kind {
            tracing::debug!(
                target: TRACING_TARGET_DISPATCH,
                path = %path.display(),
                kind = %kind,
                "no engine could open file"
            );
            return None;
        }

        tracing::debug!(
            target: TRACING_TARGET_DISPATCH,
            path = %path.display(),
            name_kind = %kind,
            content_kind = %content_kind,
            "retrying with kind guessed from content"
        );
        self.create_engine_for_kind(content_kind, path, password)
    }

    /// Opens `path` with the engine for an already known `kind`.
    pub fn create_engine_for_kind(
        &self,
        kind: Kind,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Option<BoxedEngine> {
        match route(kind, &self.options)? {
            Route::Engine(family) => self.try_create(family, kind, path, password),
            Route::Directory => {
                if self.factory.is_xps_directory(path)
                    && let Some(engine) = self.try_create(EngineKind::Xps, kind, path, None)
                {
                    return Some(engine);
                }
                self.try_create(EngineKind::ImageDir, kind, path, None)
            }
        }
    }

    fn try_create(
        &self,
        family: EngineKind,
        kind: Kind,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Option<BoxedEngine> {
        match self.factory.create(family, path, password) {
            Ok(engine) => {
                tracing::debug!(
                    target: TRACING_TARGET_DISPATCH,
                    path = %path.display(),
                    kind = %kind,
                    engine = %family,
                    page_count = engine.page_count(),
                    "created engine"
                );
                Some(engine)
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_DISPATCH,
                    path = %path.display(),
                    kind = %kind,
                    engine = %family,
                    error = %error,
                    "engine construction failed"
                );
                None
            }
        }
    }
}
