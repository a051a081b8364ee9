//! Detected file type tags.
//!
//! This module provides the [`Kind`] enum, the token every sniffer produces
//! and every routing decision consumes. Kinds are compared by identity; the
//! mapping from a kind to the engine family that opens it lives in
//! [`EngineKind`](crate::engine::EngineKind).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Detected file or content type.
///
/// [`Kind::Unknown`] is the "nothing detected" tag: routing it never yields an
/// engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Portable Document Format
    Pdf,
    /// PostScript
    Ps,
    /// Encapsulated PostScript
    Eps,
    /// XML Paper Specification
    Xps,
    /// OpenXPS
    Oxps,
    /// DjVu
    Djvu,
    /// Compiled HTML Help
    Chm,
    Png,
    Jpeg,
    Gif,
    Tiff,
    Bmp,
    Tga,
    /// JPEG XR (also HD Photo)
    Jxr,
    Webp,
    /// JPEG 2000
    Jp2,
    Avif,
    Heic,
    /// Comic book ZIP archive
    Cbz,
    /// Comic book RAR archive
    Cbr,
    /// Comic book 7-Zip archive
    Cb7,
    /// Comic book tar archive
    Cbt,
    Zip,
    Rar,
    #[strum(serialize = "7z")]
    #[serde(rename = "7z")]
    SevenZip,
    Tar,
    Epub,
    /// FictionBook
    Fb2,
    /// Zipped FictionBook
    Fb2z,
    /// Mobipocket
    Mobi,
    /// PalmDoc database
    PalmDoc,
    Html,
    /// Plain text
    Txt,
    /// A folder on disk
    Directory,
    /// Unknown or unsupported content type
    #[default]
    Unknown,
}

impl Kind {
    /// File extensions (lowercase, without dot) that name this kind.
    ///
    /// The first entry is the canonical extension.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Ps => &["ps"],
            Self::Eps => &["eps"],
            Self::Xps => &["xps"],
            Self::Oxps => &["oxps"],
            Self::Djvu => &["djvu", "djv"],
            Self::Chm => &["chm"],
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            Self::Gif => &["gif"],
            Self::Tiff => &["tif", "tiff"],
            Self::Bmp => &["bmp", "dib"],
            Self::Tga => &["tga"],
            Self::Jxr => &["jxr", "hdp", "wdp"],
            Self::Webp => &["webp"],
            Self::Jp2 => &["jp2", "jpx", "j2k"],
            Self::Avif => &["avif"],
            Self::Heic => &["heic", "heif"],
            Self::Cbz => &["cbz"],
            Self::Cbr => &["cbr"],
            Self::Cb7 => &["cb7"],
            Self::Cbt => &["cbt"],
            Self::Zip => &["zip"],
            Self::Rar => &["rar"],
            Self::SevenZip => &["7z"],
            Self::Tar => &["tar"],
            Self::Epub => &["epub"],
            Self::Fb2 => &["fb2"],
            Self::Fb2z => &["fb2z", "zfb2"],
            Self::Mobi => &["mobi", "azw", "azw3", "prc"],
            Self::PalmDoc => &["pdb"],
            Self::Html => &["html", "htm", "xhtml", "xht"],
            Self::Txt => &["txt", "log", "nfo", "diz"],
            Self::Directory | Self::Unknown => &[],
        }
    }

    /// Looks up a kind by file extension, ignoring case and a leading dot.
    ///
    /// Returns [`Kind::Unknown`] for unrecognized extensions.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if ext.is_empty() {
            return Self::Unknown;
        }

        Self::iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
            .unwrap_or_default()
    }

    /// Check if this kind is a raster image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Png
                | Self::Jpeg
                | Self::Gif
                | Self::Tiff
                | Self::Bmp
                | Self::Tga
                | Self::Jxr
                | Self::Webp
                | Self::Jp2
                | Self::Avif
                | Self::Heic
        )
    }

    /// Check if this kind is an archive container, comic or generic.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        matches!(
            self,
            Self::Cbz
                | Self::Cbr
                | Self::Cb7
                | Self::Cbt
                | Self::Zip
                | Self::Rar
                | Self::SevenZip
                | Self::Tar
        )
    }

    /// Check if this kind is one of the reflowable ebook formats.
    #[must_use]
    pub fn is_ebook(&self) -> bool {
        matches!(
            self,
            Self::Epub | Self::Fb2 | Self::Fb2z | Self::Mobi | Self::PalmDoc | Self::Html | Self::Txt
        )
    }

    /// Check if this is the "nothing detected" tag.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}
