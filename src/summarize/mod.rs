//! Summarization stages: per-chunk calls with retry, concurrent fan-out, and
//! the two reductions (book summary, comparative report).
//!
//! ```text
//! chunks ──▶ Coordinator ──▶ [ChunkSummary; N] ──▶ Aggregator ──▶ BookSummary
//!              (pool of ChunkSummarizer calls)
//! [BookSummary; M] ──▶ Aggregator ──▶ comparative report
//! ```

pub mod aggregate;
pub mod client;
pub mod coordinator;
pub mod prompts;

use std::path::PathBuf;

use crate::llm::{ChatMessage, CompletionRequest};

pub use aggregate::{Aggregator, DEFAULT_THEME};
pub use client::{ChunkFailure, ChunkSummarizer, DEFAULT_MAX_RETRIES};
pub use coordinator::{ChunkSummary, Coordinator};

/// Model parameters for one kind of call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSettings {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: f64,
}

impl CallSettings {
    pub fn new(model: impl Into<String>, max_tokens: Option<u32>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    pub(crate) fn request(&self, messages: Vec<ChatMessage>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Whole-book summary for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub source: PathBuf,
    pub text: String,
}
