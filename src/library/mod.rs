//! Input document ingestion.
//!
//! Turns a file on disk into plain text. Format is chosen by extension;
//! anything other than PDF, EPUB, or XML is rejected up front.

pub mod error;
pub mod model;
pub mod parser;

pub use error::{LibraryError, LibraryResult};
pub use model::{ContentFormat, Document};
pub use parser::{detect_format, ingest_file};
