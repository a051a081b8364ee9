//! Header-probing engine factory.
//!
//! The CLI ships no rendering backends. [`ProbeEngineFactory`] stands in for
//! them: a family "opens" a file only when the file's content signature is a
//! kind that family handles, so a misnamed file fails the name pass and is
//! picked up by the content pass exactly as it would with real engines.

use std::fs;
use std::path::{Path, PathBuf};

use folio_core::sniff::{guess_from_name, sniff_file};
use folio_core::{BoxedEngine, Engine, EngineFactory, EngineKind, Error, Kind, PasswordProvider, Result};

use crate::TRACING_TARGET_PROBE;

/// Marker of an encrypted PDF's trailer entry.
const PDF_ENCRYPT: &[u8] = b"/Encrypt";

/// Engine handle produced by [`ProbeEngineFactory`].
#[derive(Debug, Clone)]
pub struct ProbeEngine {
    family: EngineKind,
    path: PathBuf,
    content_kind: Kind,
    page_count: usize,
}

impl Engine for ProbeEngine {
    fn kind(&self) -> EngineKind {
        self.family
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Factory that validates files by their headers instead of parsing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbeEngineFactory;

impl ProbeEngineFactory {
    /// Accepts `path` for `family` if its content kind is one the family opens.
    fn probe(&self, family: EngineKind, path: &Path) -> Result<ProbeEngine> {
        let content_kind = sniff_file(path)?;
        if !family.supports(content_kind) {
            return Err(Error::unsupported_format()
                .with_message(format!(
                    "{} content cannot be opened by the {} engine",
                    content_kind,
                    family.display_name()
                ))
                .with_context(format!("path: {}", path.display())));
        }

        tracing::trace!(
            target: TRACING_TARGET_PROBE,
            path = %path.display(),
            engine = %family,
            content_kind = %content_kind,
            "content signature accepted"
        );

        let page_count = if content_kind.is_image() { 1 } else { 0 };
        Ok(ProbeEngine {
            family,
            path: path.to_path_buf(),
            content_kind,
            page_count,
        })
    }
}

impl EngineFactory for ProbeEngineFactory {
    fn create_mupdf(
        &self,
        path: &Path,
        password: Option<&dyn PasswordProvider>,
    ) -> Result<BoxedEngine> {
        let mut engine = self.probe(EngineKind::Mupdf, path)?;
        if engine.content_kind != Kind::Pdf {
            return Ok(Box::new(engine));
        }

        let data = fs::read(path)?;
        engine.page_count = count_pdf_pages(&data);

        if contains(&data, PDF_ENCRYPT) {
            let supplied = password.and_then(|provider| provider.password_for(path));
            if supplied.is_none() {
                return Err(Error::password_required()
                    .with_message("document is encrypted")
                    .with_context(format!("path: {}", path.display())));
            }
        }

        Ok(Box::new(engine))
    }

    fn create_xps(&self, path: &Path) -> Result<BoxedEngine> {
        if self.is_xps_directory(path) {
            return Ok(Box::new(ProbeEngine {
                family: EngineKind::Xps,
                path: path.to_path_buf(),
                content_kind: Kind::Directory,
                page_count: 0,
            }));
        }
        Ok(Box::new(self.probe(EngineKind::Xps, path)?))
    }

    fn create_djvu(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Djvu, path)?))
    }

    fn create_image(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Image, path)?))
    }

    fn create_image_dir(&self, path: &Path) -> Result<BoxedEngine> {
        let mut images = 0;
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && guess_from_name(&entry_path).is_image() {
                images += 1;
            }
        }

        if images == 0 {
            return Err(Error::unsupported_format()
                .with_message("folder contains no images")
                .with_context(format!("path: {}", path.display())));
        }

        Ok(Box::new(ProbeEngine {
            family: EngineKind::ImageDir,
            path: path.to_path_buf(),
            content_kind: Kind::Directory,
            page_count: images,
        }))
    }

    fn create_cbx(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Cbx, path)?))
    }

    fn create_ps(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Ps, path)?))
    }

    fn create_chm(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Chm, path)?))
    }

    /// Plain text has no signature; any UTF-8 without NUL bytes is accepted.
    fn create_txt(&self, path: &Path) -> Result<BoxedEngine> {
        let data = fs::read(path)?;
        let text = std::str::from_utf8(&data).map_err(|error| {
            Error::from_source(folio_core::ErrorKind::UnsupportedFormat, error)
                .with_message("text is not valid UTF-8")
                .with_context(format!("path: {}", path.display()))
        })?;
        if text.contains('\0') {
            return Err(Error::unsupported_format()
                .with_message("text contains NUL bytes")
                .with_context(format!("path: {}", path.display())));
        }

        Ok(Box::new(ProbeEngine {
            family: EngineKind::Txt,
            path: path.to_path_buf(),
            content_kind: Kind::Txt,
            page_count: 0,
        }))
    }

    fn create_epub(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Epub, path)?))
    }

    fn create_fb2(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Fb2, path)?))
    }

    fn create_mobi(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Mobi, path)?))
    }

    fn create_pdb(&self, path: &Path) -> Result<BoxedEngine> {
        Ok(Box::new(self.probe(EngineKind::Pdb, path)?))
    }
}

/// Counts `/Type /Page` objects, skipping `/Type /Pages` tree nodes.
fn count_pdf_pages(data: &[u8]) -> usize {
    let mut count = 0;
    for needle in [&b"/Type /Page"[..], &b"/Type/Page"[..]] {
        count += data
            .windows(needle.len() + 1)
            .filter(|window| window.starts_with(needle) && window[needle.len()] != b's')
            .count();
    }
    count
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
