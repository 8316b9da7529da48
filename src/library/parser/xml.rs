//! XML text extraction using `roxmltree`.
//!
//! Walks the element tree depth-first, collecting each element's leading
//! text, its children, then its tail text. Pieces are trimmed and joined
//! with newlines.

use roxmltree::{Node, ParsingOptions};

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::model::ContentFormat;
use crate::library::parser::ContentParser;

/// XML parser backed by `roxmltree`.
pub struct XmlParser;

impl ContentParser for XmlParser {
    fn format(&self) -> ContentFormat {
        ContentFormat::Xml
    }

    fn extract_text(&self, data: &[u8]) -> LibraryResult<String> {
        let source = std::str::from_utf8(data).map_err(|e| LibraryError::ParseError {
            format: "xml".into(),
            message: format!("only UTF-8 encoded XML is supported: {e}"),
        })?;

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(source, options).map_err(|e| {
            LibraryError::ParseError {
                format: "xml".into(),
                message: e.to_string(),
            }
        })?;

        let mut pieces = Vec::new();
        collect_text(doc.root_element(), &mut pieces);

        Ok(pieces.join("\n"))
    }
}

fn collect_text<'a>(element: Node<'a, '_>, pieces: &mut Vec<&'a str>) {
    push_trimmed(element.text(), pieces);
    for child in element.children().filter(Node::is_element) {
        collect_text(child, pieces);
    }
    push_trimmed(element.tail(), pieces);
}

fn push_trimmed<'a>(text: Option<&'a str>, pieces: &mut Vec<&'a str>) {
    if let Some(t) = text.map(str::trim).filter(|t| !t.is_empty()) {
        pieces.push(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_text_and_tails_in_document_order() {
        let xml = br#"<?xml version="1.0"?>
            <book>
              <title>Notes from Underground</title>
              <chapter>I am a sick man. <em>I am</em> a spiteful man.</chapter>
            </book>"#;
        let text = XmlParser.extract_text(xml).unwrap();
        assert_eq!(
            text,
            "Notes from Underground\nI am a sick man.\nI am\na spiteful man."
        );
    }

    #[test]
    fn empty_root_yields_empty_text() {
        assert_eq!(XmlParser.extract_text(b"<book/>").unwrap(), "");
    }

    #[test]
    fn malformed_xml_is_parse_error() {
        let result = XmlParser.extract_text(b"<book><unclosed></book>");
        assert!(matches!(result, Err(LibraryError::ParseError { .. })));
    }

    #[test]
    fn non_utf8_xml_names_the_encoding() {
        let utf16: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("<book>text</book>".encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        match XmlParser.extract_text(&utf16) {
            Err(LibraryError::ParseError { format, message }) => {
                assert_eq!(format, "xml");
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn doctype_is_accepted() {
        let xml = b"<?xml version=\"1.0\"?><!DOCTYPE book><book>text</book>";
        assert_eq!(XmlParser.extract_text(xml).unwrap(), "text");
    }
}
