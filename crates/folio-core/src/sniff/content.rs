//! Content based type guessing.
//!
//! Only the first [`HEADER_LEN`] bytes are inspected, except for ZIP
//! containers whose central directory is read to tell EPUB, XPS, zipped
//! FictionBook and comic archives apart.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use zip::ZipArchive;

use crate::{Kind, Result, TRACING_TARGET_SNIFF};

/// Number of leading bytes read for signature checks.
pub const HEADER_LEN: usize = 1024;

const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Guesses the kind of the file at `path` from its contents.
///
/// Unreadable files are reported as [`Kind::Unknown`].
pub fn guess_from_content(path: &Path) -> Kind {
    match sniff_file(path) {
        Ok(kind) => kind,
        Err(error) => {
            tracing::debug!(
                target: TRACING_TARGET_SNIFF,
                path = %path.display(),
                error = %error,
                "content sniffing failed"
            );
            Kind::Unknown
        }
    }
}

/// Like [`guess_from_content`], but reports I/O failures.
pub fn sniff_file(path: &Path) -> Result<Kind> {
    if path.is_dir() {
        return Ok(Kind::Directory);
    }

    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.by_ref().take(HEADER_LEN as u64).read_to_end(&mut header)?;

    let kind = guess_from_bytes(&header);
    if kind != Kind::Zip {
        return Ok(kind);
    }

    file.seek(SeekFrom::Start(0))?;
    Ok(classify_zip(file))
}

/// Guesses a kind from the leading bytes of a file.
///
/// ZIP containers are reported as [`Kind::Zip`] (or [`Kind::Epub`] when the
/// `mimetype` entry comes first); use [`sniff_file`] to classify them further.
pub fn guess_from_bytes(data: &[u8]) -> Kind {
    if data.is_empty() {
        return Kind::Unknown;
    }

    // Some PDF producers put junk before the header.
    if contains(data, b"%PDF-") {
        return Kind::Pdf;
    }
    if data.starts_with(b"%!PS-Adobe-") && first_line(data).ends_with(b"EPSF-3.0") {
        return Kind::Eps;
    }
    if data.starts_with(b"%!") {
        return Kind::Ps;
    }
    if data.starts_with(&[0xC5, 0xD0, 0xD3, 0xC6]) {
        return Kind::Eps;
    }
    if data.starts_with(b"AT&TFORM") {
        return Kind::Djvu;
    }
    if data.starts_with(b"ITSF") {
        return Kind::Chm;
    }
    match data.get(60..68) {
        Some(b"BOOKMOBI") => return Kind::Mobi,
        Some(b"TEXtREAd") => return Kind::PalmDoc,
        _ => {}
    }

    if let Some(kind) = infer::get(data).and_then(|t| kind_from_infer(t.extension())) {
        return kind;
    }

    let text = String::from_utf8_lossy(data).to_ascii_lowercase();
    if text.contains("<fictionbook") {
        return Kind::Fb2;
    }
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("<!doctype html") || trimmed.starts_with("<html") {
        return Kind::Html;
    }
    // XHTML opens with an XML declaration before the root element.
    if trimmed.starts_with("<?xml") && (text.contains("<!doctype html") || text.contains("<html")) {
        return Kind::Html;
    }

    Kind::Unknown
}

fn kind_from_infer(ext: &str) -> Option<Kind> {
    let kind = match ext {
        "png" => Kind::Png,
        "jpg" => Kind::Jpeg,
        "gif" => Kind::Gif,
        "tif" => Kind::Tiff,
        "bmp" => Kind::Bmp,
        "webp" => Kind::Webp,
        "jxr" => Kind::Jxr,
        "jp2" => Kind::Jp2,
        "avif" => Kind::Avif,
        "heif" => Kind::Heic,
        "djvu" => Kind::Djvu,
        "epub" => Kind::Epub,
        "mobi" => Kind::Mobi,
        "zip" => Kind::Zip,
        "rar" => Kind::Rar,
        "7z" => Kind::SevenZip,
        "tar" => Kind::Tar,
        "html" => Kind::Html,
        _ => return None,
    };
    Some(kind)
}

/// Tells ZIP based formats apart by their entries.
pub fn classify_zip<R: Read + Seek>(reader: R) -> Kind {
    let Ok(mut archive) = ZipArchive::new(reader) else {
        return Kind::Zip;
    };

    let names: Vec<String> = archive.file_names().map(str::to_ascii_lowercase).collect();

    if names.iter().any(|name| name == "mimetype") && has_epub_mimetype(&mut archive) {
        return Kind::Epub;
    }
    if names.iter().any(|name| name.ends_with(".fdseq")) {
        return Kind::Xps;
    }

    let files: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !name.ends_with('/'))
        .collect();

    if let [only] = files.as_slice()
        && only.ends_with(".fb2")
    {
        return Kind::Fb2z;
    }

    let is_image = |name: &str| {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| Kind::from_extension(ext).is_image())
    };
    let is_comic_metadata = |name: &str| name.ends_with("comicinfo.xml");

    let has_images = files.iter().any(|name| is_image(name));
    if has_images && files.iter().all(|name| is_image(name) || is_comic_metadata(name)) {
        return Kind::Cbz;
    }

    Kind::Zip
}

fn has_epub_mimetype<R: Read + Seek>(archive: &mut ZipArchive<R>) -> bool {
    let Ok(entry) = archive.by_name("mimetype") else {
        return false;
    };

    let mut contents = String::new();
    if entry.take(64).read_to_string(&mut contents).is_err() {
        return false;
    }
    contents.trim() == EPUB_MIMETYPE
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn first_line(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .position(|b| *b == b'\n' || *b == b'\r')
        .unwrap_or(data.len());
    &data[..end]
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::{SimpleFileOptions, ZipWriter};

    use super::*;

    fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_document_signatures() {
        assert_eq!(guess_from_bytes(b"%PDF-1.7\n%\xe2\xe3"), Kind::Pdf);
        assert_eq!(guess_from_bytes(b"\r\ngarbage%PDF-1.4"), Kind::Pdf);
        assert_eq!(guess_from_bytes(b"%!PS-Adobe-3.0\n"), Kind::Ps);
        assert_eq!(guess_from_bytes(b"%!PS-Adobe-3.0 EPSF-3.0\n"), Kind::Eps);
        assert_eq!(guess_from_bytes(&[0xC5, 0xD0, 0xD3, 0xC6, 0, 0]), Kind::Eps);
        assert_eq!(guess_from_bytes(b"AT&TFORM\0\0\0\0DJVU"), Kind::Djvu);
        assert_eq!(guess_from_bytes(b"ITSF\x03\0\0\0"), Kind::Chm);
    }

    #[test]
    fn test_palm_database_signatures() {
        let mut mobi = vec![0u8; 78];
        mobi[60..68].copy_from_slice(b"BOOKMOBI");
        assert_eq!(guess_from_bytes(&mobi), Kind::Mobi);

        let mut pdb = vec![0u8; 78];
        pdb[60..68].copy_from_slice(b"TEXtREAd");
        assert_eq!(guess_from_bytes(&pdb), Kind::PalmDoc);
    }

    #[test]
    fn test_binary_signatures() {
        assert_eq!(guess_from_bytes(PNG), Kind::Png);
        assert_eq!(guess_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), Kind::Jpeg);
        assert_eq!(guess_from_bytes(b"GIF89a\x01\0\x01\0"), Kind::Gif);
        assert_eq!(guess_from_bytes(b"Rar!\x1a\x07\x00\x00"), Kind::Rar);
        assert_eq!(guess_from_bytes(b"7z\xbc\xaf\x27\x1c\0\x04"), Kind::SevenZip);
        assert_eq!(guess_from_bytes(b"II*\0\x08\0\0\0"), Kind::Tiff);
        assert_eq!(guess_from_bytes(b"RIFF\x24\0\0\0WEBPVP8 "), Kind::Webp);
    }

    #[test]
    fn test_tar_signature() {
        let mut tar = vec![0u8; 512];
        tar[..9].copy_from_slice(b"page1.png");
        tar[257..263].copy_from_slice(b"ustar\0");
        tar[263..265].copy_from_slice(b"00");
        assert_eq!(guess_from_bytes(&tar), Kind::Tar);
    }

    #[test]
    fn test_markup_signatures() {
        let fb2 = br#"<?xml version="1.0" encoding="utf-8"?><FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">"#;
        assert_eq!(guess_from_bytes(fb2), Kind::Fb2);
        assert_eq!(guess_from_bytes(b"  <!DOCTYPE html><html>"), Kind::Html);
        assert_eq!(guess_from_bytes(b"<html><body>hi</body></html>"), Kind::Html);
    }

    #[test]
    fn test_xhtml_with_xml_declaration() {
        let xhtml = br#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml"><body/></html>"#;
        assert_eq!(guess_from_bytes(xhtml), Kind::Html);

        let bare = br#"<?xml version="1.0"?><html xmlns="http://www.w3.org/1999/xhtml"/>"#;
        assert_eq!(guess_from_bytes(bare), Kind::Html);

        assert_eq!(guess_from_bytes(br#"<?xml version="1.0"?><note/>"#), Kind::Unknown);
    }

    #[test]
    fn test_misnamed_xhtml_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("chapter.dat");
        std::fs::write(
            &path,
            "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<html xmlns=\"http://www.w3.org/1999/xhtml\"></html>",
        )
        .unwrap();
        assert_eq!(sniff_file(&path).unwrap(), Kind::Html);
    }

    #[test]
    fn test_unknown_content() {
        assert_eq!(guess_from_bytes(b""), Kind::Unknown);
        assert_eq!(guess_from_bytes(b"just some notes"), Kind::Unknown);
    }

    #[test]
    fn test_classify_zip_containers() {
        let epub = zip_with(&[("mimetype", EPUB_MIMETYPE.as_bytes()), ("OEBPS/content.opf", b"<package/>")]);
        assert_eq!(classify_zip(Cursor::new(epub)), Kind::Epub);

        let xps = zip_with(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("_rels/.rels", b"<Relationships/>"),
            ("FixedDocSeq.fdseq", b"<FixedDocumentSequence/>"),
        ]);
        assert_eq!(classify_zip(Cursor::new(xps)), Kind::Xps);

        let fb2z = zip_with(&[("book.fb2", b"<FictionBook/>")]);
        assert_eq!(classify_zip(Cursor::new(fb2z)), Kind::Fb2z);

        let cbz = zip_with(&[("01.png", PNG), ("02.JPG", b"..."), ("ComicInfo.xml", b"<ComicInfo/>")]);
        assert_eq!(classify_zip(Cursor::new(cbz)), Kind::Cbz);

        let plain = zip_with(&[("readme.txt", b"hello"), ("01.png", PNG)]);
        assert_eq!(classify_zip(Cursor::new(plain)), Kind::Zip);

        assert_eq!(classify_zip(Cursor::new(b"PK\x03\x04broken".to_vec())), Kind::Zip);
    }

    #[test]
    fn test_sniff_file() {
        let temp = tempfile::TempDir::new().unwrap();

        let pdf = temp.path().join("disguised.png");
        std::fs::write(&pdf, b"%PDF-1.5\n").unwrap();
        assert_eq!(sniff_file(&pdf).unwrap(), Kind::Pdf);

        let cbz = temp.path().join("pages.zip");
        std::fs::write(&cbz, zip_with(&[("001.png", PNG)])).unwrap();
        assert_eq!(sniff_file(&cbz).unwrap(), Kind::Cbz);

        assert_eq!(sniff_file(temp.path()).unwrap(), Kind::Directory);
        assert_eq!(
            sniff_file(&temp.path().join("missing")).unwrap_err().kind(),
            crate::ErrorKind::NotFound
        );
        assert_eq!(guess_from_content(&temp.path().join("missing")), Kind::Unknown);
    }
}
