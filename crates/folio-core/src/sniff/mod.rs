//! File type sniffing.
//!
//! Two heuristics identify a document:
//!
//! - [`guess_from_name`]: cheap, looks only at the file name (and whether the
//!   path is a directory)
//! - [`guess_from_content`]: reads the file header, used as the fallback when
//!   the name lied
//!
//! The dispatcher consumes them through the [`FileTypeSniffer`] trait so hosts
//! can plug in their own detection. [`DefaultSniffer`] wires up the built-in
//! heuristics.

mod content;
mod name;

use std::path::Path;

pub use content::{HEADER_LEN, classify_zip, guess_from_bytes, guess_from_content, sniff_file};
pub use name::guess_from_name;

use crate::{Kind, TRACING_TARGET_SNIFF};

/// Heuristic file type detection.
pub trait FileTypeSniffer: Send + Sync {
    /// Guesses the kind from the file name.
    fn guess_from_name(&self, path: &Path) -> Kind;

    /// Guesses the kind from the file contents.
    fn guess_from_content(&self, path: &Path) -> Kind;
}

/// Sniffer backed by the built-in name and content heuristics.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSniffer;

impl FileTypeSniffer for DefaultSniffer {
    fn guess_from_name(&self, path: &Path) -> Kind {
        let kind = guess_from_name(path);
        tracing::trace!(
            target: TRACING_TARGET_SNIFF,
            path = %path.display(),
            kind = %kind,
            "guessed kind from name"
        );
        kind
    }

    fn guess_from_content(&self, path: &Path) -> Kind {
        let kind = guess_from_content(path);
        tracing::trace!(
            target: TRACING_TARGET_SNIFF,
            path = %path.display(),
            kind = %kind,
            "guessed kind from content"
        );
        kind
    }
}

/// Returns true if `path` is a folder holding an unpacked XPS document.
///
/// `[Content_Types].xml` may be split into pieces, in which case it is a
/// folder itself.
pub fn is_xps_directory(path: &Path) -> bool {
    path.is_dir()
        && path.join("_rels").join(".rels").exists()
        && path.join("[Content_Types].xml").exists()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_default_sniffer() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("scan.pdf");
        fs::write(&path, b"GIF89a\x01\0\x01\0").unwrap();

        let sniffer = DefaultSniffer;
        assert_eq!(sniffer.guess_from_name(&path), Kind::Pdf);
        assert_eq!(sniffer.guess_from_content(&path), Kind::Gif);
    }

    #[test]
    fn test_is_xps_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path();
        assert!(!is_xps_directory(dir));

        fs::create_dir(dir.join("_rels")).unwrap();
        fs::write(dir.join("_rels").join(".rels"), b"<Relationships/>").unwrap();
        assert!(!is_xps_directory(dir));

        fs::create_dir(dir.join("[Content_Types].xml")).unwrap();
        assert!(is_xps_directory(dir));
        assert!(!is_xps_directory(&dir.join("_rels").join(".rels")));
    }
}
