//! Rendering engine abstractions.
//!
//! Engines are the format-specific backends that parse and render documents.
//! They live outside this crate; folio only sees them through the traits
//! defined here:
//!
//! - [`Engine`]: a constructed, caller-owned engine handle
//! - [`AnnotationEngine`]: the in-place annotation capability
//! - [`EngineFactory`]: one constructor per engine family
//! - [`PasswordProvider`]: credential callback for encrypted documents

mod family;

use std::fmt;
use std::path::Path;

pub use family::EngineKind;

use crate::annotation::{Annotation, AnnotationKind, PointF};
use crate::{Error, Result, sniff};

/// Type alias for an owned engine handle.
pub type BoxedEngine = Box<dyn Engine>;

/// A fully constructed document engine.
pub trait Engine: Send + Sync {
    /// The family that built this engine.
    fn kind(&self) -> EngineKind;

    /// Path of the opened document.
    fn path(&self) -> &Path;

    /// Number of pages, 0 for documents that are not yet laid out.
    fn page_count(&self) -> usize;

    /// Returns the annotation capability, if the engine has one.
    ///
    /// Callers should go through the gated functions in
    /// [`annotation`](crate::annotation) instead of calling this directly.
    fn as_annotation_engine(&self) -> Option<&dyn AnnotationEngine> {
        None
    }
}

impl fmt::Debug for dyn Engine + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("kind", &self.kind())
            .field("path", &self.path())
            .field("page_count", &self.page_count())
            .finish()
    }
}

/// In-place annotation access for engines that support editing.
pub trait AnnotationEngine {
    /// All annotations of the document, in page order.
    fn annotations(&self) -> Vec<Annotation>;

    /// Returns true if annotations were modified since the last save.
    fn has_unsaved_annotations(&self) -> bool;

    /// Finds the topmost annotation at `pos` on the 1-based page `page_no`.
    ///
    /// When `allowed` is given, only annotations of those kinds are considered.
    fn annotation_at_pos(
        &self,
        page_no: usize,
        pos: PointF,
        allowed: Option<&[AnnotationKind]>,
    ) -> Option<Annotation>;
}

/// Supplies passwords for encrypted documents.
pub trait PasswordProvider {
    /// Asks for the password of the document at `path`.
    ///
    /// Returning `None` cancels opening the document.
    fn password_for(&self, path: &Path) -> Option<String>;
}

impl<F> PasswordProvider for F
where
    F: Fn(&Path) -> Option<String>,
{
    fn password_for(&self, path: &Path) -> Option<String> {
        self(path)
    }
}

/// Constructors for every engine family.
///
/// Each method either returns a fully constructed engine or an error. Families
/// a host application does not ship keep the default implementation, which
/// reports [`ErrorKind::UnsupportedFormat`](crate::ErrorKind::UnsupportedFormat).
pub trait EngineFactory: Send + Sync {
    /// Opens a PDF (or EPUB/FB2) document with MuPDF.
    fn create_mupdf(
        &self,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Result<BoxedEngine> {
        let _ = password;
        Err(unsupported(EngineKind::Mupdf, path))
    }

    fn create_xps(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Xps, path))
    }

    fn create_djvu(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Djvu, path))
    }

    fn create_image(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Image, path))
    }

    fn create_image_dir(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::ImageDir, path))
    }

    fn create_cbx(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Cbx, path))
    }

    fn create_ps(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Ps, path))
    }

    fn create_chm(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Chm, path))
    }

    fn create_txt(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Txt, path))
    }

    fn create_epub(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Epub, path))
    }

    fn create_fb2(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Fb2, path))
    }

    fn create_mobi(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Mobi, path))
    }

    /// Opens PalmDoc databases and plain HTML files.
    fn create_pdb(&self, path: &Path) -> Result<BoxedEngine> {
        Err(unsupported(EngineKind::Pdb, path))
    }

    /// Returns true if `path` is an unpacked XPS document.
    fn is_xps_directory(&self, path: &Path) -> bool {
        sniff::is_xps_directory(path)
    }

    /// Calls the constructor for `family`.
    ///
    /// The password provider is only forwarded to [`EngineKind::Mupdf`].
    fn create(
        &self,
        family: EngineKind,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Result<BoxedEngine> {
        match family {
            EngineKind::Mupdf => self.create_mupdf(path, password),
            EngineKind::Xps => self.create_xps(path),
            EngineKind::Djvu => self.create_djvu(path),
            EngineKind::Image => self.create_image(path),
            EngineKind::ImageDir => self.create_image_dir(path),
            EngineKind::Cbx => self.create_cbx(path),
            EngineKind::Ps => self.create_ps(path),
            EngineKind::Chm => self.create_chm(path),
            EngineKind::Txt => self.create_txt(path),
            EngineKind::Epub => self.create_epub(path),
            EngineKind::Fb2 => self.create_fb2(path),
            EngineKind::Mobi => self.create_mobi(path),
            EngineKind::Pdb => self.create_pdb(path),
        }
    }
}

fn unsupported(family: EngineKind, path: &Path) -> Error {
    Error::unsupported_format()
        .with_message(format!("no {} engine available", family.display_name()))
        .with_context(format!("path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ErrorKind;

    struct TxtOnly;

    struct TxtEngine(PathBuf);

    impl Engine for TxtEngine {
        fn kind(&self) -> EngineKind {
            EngineKind::Txt
        }

        fn path(&self) -> &Path {
            &self.0
        }

        fn page_count(&self) -> usize {
            1
        }
    }

    impl EngineFactory for TxtOnly {
        fn create_txt(&self, path: &Path) -> Result<BoxedEngine> {
            Ok(Box::new(TxtEngine(path.to_path_buf())))
        }
    }

    #[test]
    fn test_default_constructors_report_unsupported() {
        let factory = TxtOnly;
        let error = factory
            .create(EngineKind::Djvu, Path::new("a.djvu"), None)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedFormat);
        assert!(error.to_string().contains("DjVu"));
    }

    #[test]
    fn test_create_routes_to_family_constructor() {
        let factory = TxtOnly;
        let engine = factory
            .create(EngineKind::Txt, Path::new("notes.txt"), None)
            .unwrap();
        assert_eq!(engine.kind(), EngineKind::Txt);
        assert_eq!(engine.path(), Path::new("notes.txt"));
        assert!(engine.as_annotation_engine().is_none());
    }

    #[test]
    fn test_closure_password_provider() {
        let provider = |path: &Path| Some(format!("secret-for-{}", path.display()));
        assert_eq!(
            provider.password_for(Path::new("a.pdf")).as_deref(),
            Some("secret-for-a.pdf")
        );
    }

    #[test]
    fn test_debug_for_dyn_engine() {
        let engine: BoxedEngine = Box::new(TxtEngine(PathBuf::from("a.txt")));
        let debug = format!("{engine:?}");
        assert!(debug.contains("Txt"));
        assert!(debug.contains("a.txt"));
    }
}
