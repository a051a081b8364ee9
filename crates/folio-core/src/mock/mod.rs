//! Mock sniffers, factories and engines for testing.
//!
//! These mocks record how they were called so tests can assert on the
//! dispatcher's control flow (which constructors ran, whether content
//! sniffing happened) without touching real engines.
//!
//! # Feature Flag
//!
//! This module is only available in this crate's tests or when the
//! `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! folio-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_core::mock::{MockEngineFactory, MockSniffer};
//! use folio_core::{EngineDispatcher, EngineKind, Kind};
//!
//! let factory = MockEngineFactory::new([EngineKind::Image]);
//! let sniffer = MockSniffer::new(Kind::Pdf, Kind::Png);
//! let dispatcher = EngineDispatcher::new(factory, sniffer);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::annotation::{Annotation, AnnotationKind, PointF};
use crate::engine::{AnnotationEngine, BoxedEngine, Engine, EngineFactory, EngineKind, PasswordProvider};
use crate::sniff::FileTypeSniffer;
use crate::{Error, Kind, Result};

/// In-memory annotation store.
#[derive(Debug, Clone, Default)]
pub struct MockAnnotations {
    annotations: Vec<Annotation>,
    unsaved: bool,
}

impl MockAnnotations {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            unsaved: false,
        }
    }

    pub fn with_unsaved(mut self, unsaved: bool) -> Self {
        self.unsaved = unsaved;
        self
    }
}

impl AnnotationEngine for MockAnnotations {
    fn annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    fn has_unsaved_annotations(&self) -> bool {
        self.unsaved
    }

    fn annotation_at_pos(
        &self,
        page_no: usize,
        pos: PointF,
        allowed: Option<&[AnnotationKind]>,
    ) -> Option<Annotation> {
        // Later annotations are drawn on top.
        self.annotations
            .iter()
            .rev()
            .find(|a| a.page_no == page_no && a.rect.contains(pos) && a.is_allowed(allowed))
            .cloned()
    }
}

/// Engine that only reports its tag and path.
#[derive(Debug, Clone)]
pub struct MockEngine {
    kind: EngineKind,
    path: PathBuf,
    page_count: usize,
    annotations: Option<MockAnnotations>,
    password: Option<String>,
}

impl MockEngine {
    pub fn new(kind: EngineKind, path: impl AsRef<Path>) -> Self {
        Self {
            kind,
            path: path.as_ref().to_path_buf(),
            page_count: 1,
            annotations: None,
            password: None,
        }
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }

    /// Attaches an annotation store, exposed through
    /// [`Engine::as_annotation_engine`] regardless of the engine kind.
    pub fn with_annotations(mut self, annotations: MockAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// The password the factory obtained while constructing this engine.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl Engine for MockEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn page_count(&self) -> usize {
        self.page_count
    }

    fn as_annotation_engine(&self) -> Option<&dyn AnnotationEngine> {
        self.annotations
            .as_ref()
            .map(|annots| annots as &dyn AnnotationEngine)
    }
}

/// Factory that succeeds for a configured set of engine families.
///
/// Every constructor call is recorded, successful or not.
#[derive(Debug, Default)]
pub struct MockEngineFactory {
    constructible: HashSet<EngineKind>,
    xps_directories: bool,
    calls: Mutex<Vec<EngineKind>>,
    passwords: Mutex<Vec<Option<String>>>,
}

impl MockEngineFactory {
    /// Creates a factory whose constructors succeed for `families`.
    pub fn new(families: impl IntoIterator<Item = EngineKind>) -> Self {
        Self {
            constructible: families.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Makes [`EngineFactory::is_xps_directory`] report every folder as XPS.
    pub fn with_xps_directories(mut self, xps_directories: bool) -> Self {
        self.xps_directories = xps_directories;
        self
    }

    /// Engine families whose constructors were called, in order.
    pub fn calls(&self) -> Vec<EngineKind> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Passwords obtained from providers handed to the MuPDF constructor.
    pub fn passwords(&self) -> Vec<Option<String>> {
        self.passwords.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn build(&self, family: EngineKind, path: &Path, password: Option<String>) -> Result<BoxedEngine> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(family);
        }

        if !self.constructible.contains(&family) {
            return Err(Error::corrupt()
                .with_message(format!("mock {family} engine refused file"))
                .with_context(format!("path: {}", path.display())));
        }

        let mut engine = MockEngine::new(family, path);
        engine.password = password;
        Ok(Box::new(engine))
    }
}

impl EngineFactory for MockEngineFactory {
    fn create_mupdf(
        &self,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Result<BoxedEngine> {
        let password = password.and_then(|provider| provider.password_for(path));
        if let Ok(mut passwords) = self.passwords.lock() {
            passwords.push(password.clone());
        }
        self.build(EngineKind::Mupdf, path, password)
    }

    fn create_xps(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Xps, path, None)
    }

    fn create_djvu(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Djvu, path, None)
    }

    fn create_image(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Image, path, None)
    }

    fn create_image_dir(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::ImageDir, path, None)
    }

    fn create_cbx(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Cbx, path, None)
    }

    fn create_ps(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Ps, path, None)
    }

    fn create_chm(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Chm, path, None)
    }

    fn create_txt(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Txt, path, None)
    }

    fn create_epub(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Epub, path, None)
    }

    fn create_fb2(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Fb2, path, None)
    }

    fn create_mobi(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Mobi, path, None)
    }

    fn create_pdb(&self, path: &Path) -> Result<BoxedEngine> {
        self.build(EngineKind::Pdb, path, None)
    }

    fn is_xps_directory(&self, _path: &Path) -> bool {
        self.xps_directories
    }
}

/// Sniffer returning fixed kinds and counting its calls.
#[derive(Debug, Default)]
pub struct MockSniffer {
    name_kind: Kind,
    content_kind: Kind,
    name_calls: AtomicUsize,
    content_calls: AtomicUsize,
}

impl MockSniffer {
    pub fn new(name_kind: Kind, content_kind: Kind) -> Self {
        Self {
            name_kind,
            content_kind,
            ..Default::default()
        }
    }

    pub fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }
}

impl FileTypeSniffer for MockSniffer {
    fn guess_from_name(&self, _path: &Path) -> Kind {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        self.name_kind
    }

    fn guess_from_content(&self, _path: &Path) -> Kind {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.content_kind
    }
}
