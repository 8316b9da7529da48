//! EPUB text extraction using the `epub` crate.
//!
//! Each spine item is XHTML; its `<body>` is parsed with `scraper` and the
//! markup stripped, keeping only text nodes.

use std::io::Cursor;

use scraper::{Html, Selector};

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::ContentFormat;
use crate::library::parser::ContentParser;

/// EPUB parser backed by the `epub` crate + `scraper` for XHTML content.
pub struct EpubParser;

impl ContentParser for EpubParser {
    fn format(&self) -> ContentFormat {
        ContentFormat::Epub
    }

    fn extract_text(&self, data: &[u8]) -> LibraryResult<String> {
        let cursor = Cursor::new(data.to_vec());
        let mut doc =
            epub::doc::EpubDoc::from_reader(cursor).map_err(|e| LibraryError::ParseError {
                format: "epub".into(),
                message: e.to_string(),
            })?;

        let mut sections = Vec::new();

        for chapter_idx in 0..doc.get_num_chapters() {
            doc.set_current_chapter(chapter_idx);

            let Some((content, _mime)) = doc.get_current_str() else {
                continue;
            };

            let text = strip_markup(&content);
            if !text.trim().is_empty() {
                sections.push(text);
            }
        }

        Ok(sections.join("\n"))
    }
}

/// Text content of an XHTML item's `<body>`, or of the whole fragment when
/// there is no body element.
fn strip_markup(xhtml: &str) -> String {
    let html = Html::parse_document(xhtml);

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| html.select(&sel).next().map(|el| el.text().collect::<String>()));

    body.unwrap_or_else(|| html.root_element().text().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_invalid_epub_returns_error() {
        let result = EpubParser.extract_text(b"This is not an EPUB");
        assert!(result.is_err());
    }

    #[test]
    fn strip_markup_keeps_body_text_only() {
        let xhtml = r#"<html><head><title>Ignored</title></head>
            <body><h1>Chapter 1</h1><p>It was a <em>dark</em> night.</p></body></html>"#;
        let text = strip_markup(xhtml);
        assert!(text.contains("Chapter 1"));
        assert!(text.contains("It was a dark night."));
        assert!(!text.contains("Ignored"));
        assert!(!text.contains('<'));
    }
}
