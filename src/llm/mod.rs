//! Remote text-completion service.
//!
//! [`CompletionBackend`] is the seam between the summarization stages and
//! the network. [`OpenAiClient`] talks to an OpenAI-compatible chat
//! completions endpoint; tests substitute an in-process fake.

pub mod error;
pub mod openai;

use serde::{Deserialize, Serialize};

pub use error::{LlmError, LlmResult};
pub use openai::{OpenAiClient, OpenAiConfig};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Output token cap; `None` leaves it to the service.
    pub max_tokens: Option<u32>,
    pub temperature: f64,
}

/// A text-completion service.
///
/// Implementations are shared by every worker thread, so a single instance
/// must handle concurrent independent calls.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;
}
