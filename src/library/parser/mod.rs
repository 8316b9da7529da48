//! Document parser trait and format detection.
//!
//! Each supported format (PDF, EPUB, XML) implements `ContentParser`.
//! `ingest_file()` dispatches on the file extension and returns the
//! extracted text as a [`Document`].

pub mod epub;
pub mod pdf;
pub mod xml;

use std::path::Path;

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::{ContentFormat, Document};

/// Trait for format-specific text extractors.
pub trait ContentParser {
    /// Extract plain text from raw file bytes.
    fn extract_text(&self, data: &[u8]) -> LibraryResult<String>;

    /// The format this parser handles.
    fn format(&self) -> ContentFormat;
}

/// Get the appropriate parser for a content format.
pub fn parser_for(format: ContentFormat) -> Box<dyn ContentParser + Send + Sync> {
    match format {
        ContentFormat::Pdf => Box::new(pdf::PdfParser),
        ContentFormat::Epub => Box::new(epub::EpubParser),
        ContentFormat::Xml => Box::new(xml::XmlParser),
    }
}

/// Detect the content format from a file extension (case-insensitive).
pub fn detect_format(path: &Path) -> Option<ContentFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some(ContentFormat::Pdf),
        "epub" => Some(ContentFormat::Epub),
        "xml" => Some(ContentFormat::Xml),
        _ => None,
    }
}

/// Read a file from disk and extract its text.
///
/// Fails with [`LibraryError::UnsupportedFormat`] before touching the file
/// when the extension is not one of the supported formats.
pub fn ingest_file(path: &Path) -> LibraryResult<Document> {
    let format = detect_format(path).ok_or_else(|| LibraryError::UnsupportedFormat {
        path: path.display().to_string(),
        extension: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    })?;

    let data = std::fs::read(path).map_err(|source| LibraryError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parser = parser_for(format);
    let text = parser.extract_text(&data)?;
    tracing::debug!(path = %path.display(), format = %parser.format(), bytes = text.len(), "extracted text");

    Ok(Document::new(path, parser.format(), text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_pdf() {
        assert_eq!(detect_format(Path::new("book.pdf")), Some(ContentFormat::Pdf));
        assert_eq!(detect_format(Path::new("BOOK.PDF")), Some(ContentFormat::Pdf));
    }

    #[test]
    fn detect_epub() {
        assert_eq!(
            detect_format(Path::new("novel.epub")),
            Some(ContentFormat::Epub)
        );
    }

    #[test]
    fn detect_xml() {
        assert_eq!(
            detect_format(Path::new("data/books/tei.xml")),
            Some(ContentFormat::Xml)
        );
    }

    #[test]
    fn detect_unknown() {
        assert_eq!(detect_format(Path::new("notes.txt")), None);
        assert_eq!(detect_format(Path::new("README")), None);
    }

    #[test]
    fn unsupported_extension_is_rejected_without_reading() {
        let err = ingest_file(Path::new("/nonexistent/notes.txt")).unwrap_err();
        match err {
            LibraryError::UnsupportedFormat { extension, .. } => assert_eq!(extension, ".txt"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_supported_file_is_io_error() {
        let err = ingest_file(Path::new("/nonexistent/book.xml")).unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }

    #[test]
    fn ingest_xml_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("book.xml");
        std::fs::write(&path, "<book><p>Call me Ishmael.</p></book>").unwrap();

        let doc = ingest_file(&path).unwrap();
        assert_eq!(doc.format(), ContentFormat::Xml);
        assert_eq!(doc.source(), path.as_path());
        assert_eq!(doc.text(), "Call me Ishmael.");
    }
}
