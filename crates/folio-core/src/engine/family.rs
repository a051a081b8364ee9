//! Engine families and the kinds each one opens.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::Kind;

/// Tag identifying the engine implementation behind a handle.
///
/// Every engine reports its family through [`Engine::kind`](super::Engine::kind);
/// the annotation gate keys off this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// MuPDF-backed engine for PDF and, optionally, EPUB/FB2.
    Mupdf,
    Xps,
    Djvu,
    /// Single raster images.
    Image,
    /// A folder of images shown as one document.
    ImageDir,
    /// Comic book archives.
    Cbx,
    /// PostScript via Ghostscript conversion.
    Ps,
    Chm,
    Txt,
    Epub,
    Fb2,
    Mobi,
    /// PalmDoc and plain HTML.
    Pdb,
}

impl EngineKind {
    /// Returns whether engines of this family can open the given kind.
    #[must_use]
    pub fn supports(&self, kind: Kind) -> bool {
        match self {
            Self::Mupdf => matches!(kind, Kind::Pdf | Kind::Epub | Kind::Fb2 | Kind::Fb2z),
            Self::Xps => matches!(kind, Kind::Xps | Kind::Oxps),
            Self::Djvu => matches!(kind, Kind::Djvu),
            Self::Image => kind.is_image(),
            Self::ImageDir => matches!(kind, Kind::Directory),
            Self::Cbx => kind.is_archive(),
            Self::Ps => matches!(kind, Kind::Ps | Kind::Eps),
            Self::Chm => matches!(kind, Kind::Chm),
            Self::Txt => matches!(kind, Kind::Txt),
            Self::Epub => matches!(kind, Kind::Epub),
            Self::Fb2 => matches!(kind, Kind::Fb2 | Kind::Fb2z),
            Self::Mobi => matches!(kind, Kind::Mobi),
            Self::Pdb => matches!(kind, Kind::PalmDoc | Kind::Html),
        }
    }

    /// Returns whether this family edits annotations in place.
    #[must_use]
    pub const fn supports_annotations(&self) -> bool {
        matches!(self, Self::Mupdf)
    }

    /// Human readable name for logs and CLI output.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Mupdf => "MuPDF",
            Self::Xps => "XPS",
            Self::Djvu => "DjVu",
            Self::Image => "Image",
            Self::ImageDir => "Image folder",
            Self::Cbx => "Comic book",
            Self::Ps => "PostScript",
            Self::Chm => "CHM",
            Self::Txt => "Text",
            Self::Epub => "EPUB",
            Self::Fb2 => "FictionBook",
            Self::Mobi => "Mobi",
            Self::Pdb => "PalmDoc",
        }
    }
}
