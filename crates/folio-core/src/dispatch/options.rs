//! Dispatch configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::Kind;
use crate::engine::EngineKind;

/// Families whose predicates make a kind supported regardless of the flags.
const CORE_FAMILIES: &[EngineKind] = &[
    EngineKind::Xps,
    EngineKind::Djvu,
    EngineKind::Image,
    EngineKind::Cbx,
    EngineKind::Ps,
];

/// Feature flags that gate optional engine families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct DispatchOptions {
    /// Open CHM help files with the CHM engine.
    #[cfg_attr(
        feature = "config",
        arg(long = "enable-chm", env = "FOLIO_ENABLE_CHM", default_value_t = false, global = true)
    )]
    #[serde(default)]
    pub enable_chm: bool,

    /// Open EPUB, FB2, MOBI, PalmDoc and HTML files with the ebook engines.
    ///
    /// Text files always open; this only marks them as supported.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "enable-ebooks",
            env = "FOLIO_ENABLE_EBOOKS",
            default_value_t = false,
            global = true
        )
    )]
    #[serde(default)]
    pub enable_ebooks: bool,

    /// Route EPUB and FB2 to the MuPDF engine ahead of the ebook engines.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "epub-with-pdf-engine",
            env = "FOLIO_EPUB_WITH_PDF_ENGINE",
            default_value_t = true,
            action = clap::ArgAction::Set,
            global = true
        )
    )]
    #[serde(default = "default_epub_with_pdf_engine")]
    pub epub_with_pdf_engine: bool,
}

fn default_epub_with_pdf_engine() -> bool {
    true
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            enable_chm: false,
            enable_ebooks: false,
            epub_with_pdf_engine: default_epub_with_pdf_engine(),
        }
    }
}

impl DispatchOptions {
    pub fn with_chm(mut self, enable: bool) -> Self {
        self.enable_chm = enable;
        self
    }

    pub fn with_ebooks(mut self, enable: bool) -> Self {
        self.enable_ebooks = enable;
        self
    }

    pub fn with_epub_with_pdf_engine(mut self, enable: bool) -> Self {
        self.epub_with_pdf_engine = enable;
        self
    }

    /// Returns whether `kind` is a file type the viewer advertises as openable.
    ///
    /// Directories and CHM files are not advertised even though they can be
    /// dispatched.
    #[must_use]
    pub fn is_supported(&self, kind: Kind) -> bool {
        let mupdf = if self.epub_with_pdf_engine {
            EngineKind::Mupdf.supports(kind)
        } else {
            kind == Kind::Pdf
        };

        if mupdf || CORE_FAMILIES.iter().any(|family| family.supports(kind)) {
            return true;
        }

        self.enable_ebooks && kind.is_ebook()
    }
}

/// Returns whether `kind` is a supported file type with default options.
pub fn is_supported_file_type(kind: Kind, enable_ebooks: bool) -> bool {
    DispatchOptions::default()
        .with_ebooks(enable_ebooks)
        .is_supported(kind)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_supported_matches_family_predicates() {
        for kind in Kind::iter() {
            let by_family = [
                EngineKind::Mupdf,
                EngineKind::Xps,
                EngineKind::Djvu,
                EngineKind::Image,
                EngineKind::Cbx,
                EngineKind::Ps,
            ]
            .iter()
            .any(|family| family.supports(kind));

            assert_eq!(is_supported_file_type(kind, false), by_family, "{kind}");
            assert_eq!(
                is_supported_file_type(kind, true),
                by_family || kind.is_ebook(),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_examples() {
        assert!(is_supported_file_type(Kind::Pdf, false));
        assert!(is_supported_file_type(Kind::Cbz, false));
        assert!(is_supported_file_type(Kind::Epub, false));
        assert!(!is_supported_file_type(Kind::Mobi, false));
        assert!(is_supported_file_type(Kind::Mobi, true));
        assert!(is_supported_file_type(Kind::Txt, true));
        assert!(!is_supported_file_type(Kind::Directory, true));
        assert!(!is_supported_file_type(Kind::Chm, true));
        assert!(!is_supported_file_type(Kind::Unknown, true));
    }

    #[test]
    fn test_epub_without_pdf_engine() {
        let options = DispatchOptions::default().with_epub_with_pdf_engine(false);
        assert!(options.is_supported(Kind::Pdf));
        assert!(!options.is_supported(Kind::Epub));
        assert!(options.with_ebooks(true).is_supported(Kind::Epub));
    }

    #[test]
    fn test_deserialize_defaults() {
        let options: DispatchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DispatchOptions::default());
        assert!(options.epub_with_pdf_engine);

        let options: DispatchOptions = serde_json::from_str(r#"{"enable_chm":true}"#).unwrap();
        assert!(options.enable_chm);
        assert!(!options.enable_ebooks);
    }
}
