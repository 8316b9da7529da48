//! Errors from the remote completion service.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    #[error("missing credentials: environment variable {var} is not set")]
    #[diagnostic(
        code(booksum::llm::missing_credentials),
        help("Export {var} with a valid API key before starting a run.")
    )]
    MissingCredentials { var: String },

    #[error("rate limited: {message}")]
    #[diagnostic(
        code(booksum::llm::rate_limited),
        help(
            "The service rejected the request for exceeding a quota. Lower \
             [concurrency].chunk_workers to reduce pressure on the rate limit."
        )
    )]
    RateLimited {
        /// Wait advertised by the server, if it sent one.
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("authentication failed ({status}): {message}")]
    #[diagnostic(
        code(booksum::llm::auth),
        help("Check that the API key is valid and has access to the configured models.")
    )]
    Auth { status: u16, message: String },

    #[error("completion request failed ({status}): {message}")]
    #[diagnostic(
        code(booksum::llm::api),
        help("The service returned an error response. Check the model id and request size.")
    )]
    Api { status: u16, message: String },

    #[error("transport error: {message}")]
    #[diagnostic(
        code(booksum::llm::transport),
        help("The service could not be reached. Check network access and the base URL.")
    )]
    Transport { message: String },

    #[error("failed to parse completion response: {message}")]
    #[diagnostic(
        code(booksum::llm::parse_error),
        help("The service returned an unexpected response format.")
    )]
    ParseError { message: String },

    #[error("completion response contained no text")]
    #[diagnostic(code(booksum::llm::empty_completion))]
    EmptyCompletion,
}

impl LlmError {
    /// Server-advertised wait before retrying. Only rate-limit errors carry one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

pub type LlmResult<T> = std::result::Result<T, LlmError>;
