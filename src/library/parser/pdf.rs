//! PDF text extraction using the `pdf-extract` crate.
//!
//! `pdf-extract` returns all pages as one string with form feeds between
//! pages. Pages are trimmed and re-joined with single newlines.

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::ContentFormat;
use crate::library::parser::ContentParser;

/// PDF parser backed by `pdf-extract`.
pub struct PdfParser;

impl ContentParser for PdfParser {
    fn format(&self) -> ContentFormat {
        ContentFormat::Pdf
    }

    fn extract_text(&self, data: &[u8]) -> LibraryResult<String> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| LibraryError::ParseError {
                format: "pdf".into(),
                message: e.to_string(),
            })?;

        Ok(join_pages(&text))
    }
}

/// Split on the form feeds `pdf-extract` emits between pages and join the
/// trimmed pages with newlines.
fn join_pages(text: &str) -> String {
    text.split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        // pdf-extract needs real PDF bytes, so only the error path is testable
        // without a fixture.
        let result = PdfParser.extract_text(b"This is not a PDF");
        assert!(matches!(result, Err(LibraryError::ParseError { .. })));
    }

    #[test]
    fn pages_joined_with_newlines() {
        let raw = "  Page one.\n\x0C\nPage two.  \x0C\x0C";
        assert_eq!(join_pages(raw), "Page one.\nPage two.");
    }
}
