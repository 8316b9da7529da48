//! Errors that end the processing of one document or one output artifact.

use miette::Diagnostic;
use thiserror::Error;

use crate::chunking::ChunkError;
use crate::library::LibraryError;
use crate::llm::LlmError;

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] LibraryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Chunking(#[from] ChunkError),

    #[error("no text to summarize in \"{path}\"")]
    #[diagnostic(
        code(booksum::pipeline::empty_document),
        help("The file yielded zero tokens. Scanned PDFs need OCR before summarization.")
    )]
    EmptyDocument { path: String },

    #[error("failed to generate {artifact}: {source}")]
    #[diagnostic(
        code(booksum::pipeline::aggregation),
        help("The reduction call failed and is not retried. Re-run to regenerate it.")
    )]
    Aggregation {
        artifact: String,
        #[source]
        source: LlmError,
    },

    #[error("failed to write \"{path}\": {source}")]
    #[diagnostic(
        code(booksum::pipeline::output),
        help("Check that the output directory exists and is writable.")
    )]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list input directory \"{path}\": {source}")]
    #[diagnostic(
        code(booksum::pipeline::input_dir),
        help("Pass an existing directory with --input-dir or set input_dir in the config.")
    )]
    InputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
