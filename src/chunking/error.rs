//! Error types for tokenization and chunking.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ChunkError {
    #[error("no tokenizer available for model \"{model}\": {message}")]
    #[diagnostic(
        code(booksum::chunking::tokenizer_load),
        help(
            "The tokenizer is selected by model name. Use a model id known to the \
             BPE tables (e.g. gpt-4o-mini, gpt-4o, gpt-4) in [chunking].tokenizer_model."
        )
    )]
    TokenizerLoad { model: String, message: String },

    #[error("error tokenizing the book: {message}")]
    #[diagnostic(
        code(booksum::chunking::tokenization),
        help("The text could not be encoded or decoded by the tokenizer.")
    )]
    Tokenization { message: String },

    #[error("chunk size must be at least one token")]
    #[diagnostic(
        code(booksum::chunking::invalid_chunk_size),
        help("Set [chunking].chunk_size to a positive number of tokens.")
    )]
    InvalidChunkSize,
}

pub type ChunkResult<T> = std::result::Result<T, ChunkError>;
