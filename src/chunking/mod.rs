//! Token-bounded chunking.
//!
//! A document is encoded once; if it fits the model's context window with
//! room for the response it is returned whole, otherwise the token stream is
//! cut into consecutive `chunk_size` windows that are decoded independently.
//! The windows partition the token stream: no gaps, no overlaps.

pub mod error;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub use error::{ChunkError, ChunkResult};
pub use tokenizer::{BpeTokenizer, Tokenizer};

/// Token budgets for chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Model whose vocabulary is used for counting tokens.
    pub tokenizer_model: String,
    /// Tokens reserved for the model's response.
    pub max_response_tokens: usize,
    /// Combined input + output budget of the model.
    pub context_window: usize,
    /// Window length when splitting.
    pub chunk_size: usize,
    /// Split even when the whole text would fit.
    pub force_chunking: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            tokenizer_model: "gpt-4o-mini".into(),
            max_response_tokens: 2_000,
            context_window: 128_000,
            chunk_size: 10_000,
            force_chunking: false,
        }
    }
}

/// A contiguous slice of a document's token stream, decoded back to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position within the document (0-based).
    pub index: usize,
    pub text: String,
    /// Number of tokens in the source window.
    pub token_count: usize,
}

/// Split `text` into token-bounded chunks.
///
/// Empty text encodes to zero tokens and yields no chunks in either mode;
/// callers must not issue a summarization call for it.
pub fn chunk_text(
    tokenizer: &dyn Tokenizer,
    text: &str,
    config: &ChunkConfig,
) -> ChunkResult<Vec<TextChunk>> {
    if config.chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    let tokens = tokenizer.encode(text)?;
    let token_count = tokens.len();
    if token_count == 0 {
        return Ok(Vec::new());
    }

    let fits = token_count.saturating_add(config.max_response_tokens) <= config.context_window;
    if fits && !config.force_chunking {
        return Ok(vec![TextChunk {
            index: 0,
            text: tokenizer.decode(&tokens)?,
            token_count,
        }]);
    }

    tokens
        .chunks(config.chunk_size)
        .enumerate()
        .map(|(index, window)| {
            Ok(TextChunk {
                index,
                text: tokenizer.decode(window)?,
                token_count: window.len(),
            })
        })
        .collect()
}
