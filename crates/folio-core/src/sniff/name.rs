//! File name based type guessing.

use std::path::Path;

use crate::Kind;

/// Double extensions checked before the plain extension lookup.
const COMPOUND_EXTENSIONS: &[(&str, Kind)] = &[(".fb2.zip", Kind::Fb2z)];

/// Guesses the kind of `path` from its name.
///
/// Existing directories are reported as [`Kind::Directory`] without looking at
/// the name.
pub fn guess_from_name(path: &Path) -> Kind {
    if path.is_dir() {
        return Kind::Directory;
    }

    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return Kind::Unknown;
    };

    let lower = name.to_ascii_lowercase();
    if let Some((_, kind)) = COMPOUND_EXTENSIONS
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
    {
        return *kind;
    }

    Path::new(&lower)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(Kind::from_extension)
        .unwrap_or_default()
}
