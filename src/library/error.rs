//! Rich diagnostic error types for document ingestion.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from reading and parsing input documents.
#[derive(Debug, Error, Diagnostic)]
pub enum LibraryError {
    #[error("unsupported file type: \"{extension}\" ({path})")]
    #[diagnostic(
        code(booksum::library::unsupported_format),
        help(
            "Supported formats are: pdf, epub, and xml. \
             Convert the file or move it out of the input directory."
        )
    )]
    UnsupportedFormat { path: String, extension: String },

    #[error("parse error in {format} document: {message}")]
    #[diagnostic(
        code(booksum::library::parse_error),
        help(
            "The document could not be parsed. Verify the file is valid {format} \
             and not corrupted. XML input must be UTF-8 encoded; re-save UTF-16 \
             or Latin-1 files as UTF-8."
        )
    )]
    ParseError { format: String, message: String },

    #[error("I/O error reading \"{path}\": {source}")]
    #[diagnostic(
        code(booksum::library::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for ingestion results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
