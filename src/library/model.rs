//! Core data types for ingested documents.

use std::path::{Path, PathBuf};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Pdf,
    Epub,
    Xml,
}

impl ContentFormat {
    /// Human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Epub => "epub",
            Self::Xml => "xml",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw decoded text of one input file.
///
/// Immutable once produced; the pipeline drops it after the book summary
/// for this source has been written.
#[derive(Debug, Clone)]
pub struct Document {
    source: PathBuf,
    format: ContentFormat,
    text: String,
}

impl Document {
    pub fn new(source: impl Into<PathBuf>, format: ContentFormat, text: String) -> Self {
        Self {
            source: source.into(),
            format,
            text,
        }
    }

    /// Path the text was extracted from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn format(&self) -> ContentFormat {
        self.format
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
