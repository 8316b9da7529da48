//! Single-chunk summarization with bounded retry on rate limits.
//!
//! The retry policy trusts the server: a rate-limit error that advertises a
//! wait is retried after sleeping exactly that long, up to `max_retries`
//! extra attempts. Errors without a retry directive are not retried.

use std::sync::Arc;

use thiserror::Error;

use super::CallSettings;
use super::prompts;
use crate::llm::{ChatMessage, CompletionBackend, LlmError};

/// Default number of additional attempts after a rate-limited call.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Why a chunk produced no summary.
#[derive(Debug, Error)]
pub enum ChunkFailure {
    #[error("rate limited after {retries} retries: {last}")]
    RetriesExhausted { retries: u32, last: LlmError },

    #[error(transparent)]
    NotRetryable(LlmError),
}

impl ChunkFailure {
    /// Text that stands in for the missing summary.
    pub fn placeholder(&self) -> String {
        match self {
            Self::RetriesExhausted { retries, .. } => {
                format!("Error summarizing chunk after {retries} retries.")
            }
            Self::NotRetryable(e) => format!("Error summarizing chunk: {e}"),
        }
    }
}

/// Summarizes one chunk of text per call.
pub struct ChunkSummarizer {
    backend: Arc<dyn CompletionBackend>,
    settings: CallSettings,
    max_retries: u32,
}

impl ChunkSummarizer {
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: CallSettings) -> Self {
        Self {
            backend,
            settings,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Summarize `text`, degrading to a placeholder string on failure.
    pub fn summarize_chunk(&self, text: &str) -> String {
        self.try_summarize(text).unwrap_or_else(|e| e.placeholder())
    }

    /// Summarize `text`, reporting why it failed.
    ///
    /// Sleeping for a retry blocks only the calling thread.
    pub fn try_summarize(&self, text: &str) -> Result<String, ChunkFailure> {
        let request = self.settings.request(vec![
            ChatMessage::system(prompts::CHUNK_SYSTEM),
            ChatMessage::user(prompts::chunk_user(text)),
        ]);

        let mut retries = 0u32;
        loop {
            tracing::debug!(attempt = retries + 1, "summarizing chunk");
            let err = match self.backend.complete(&request) {
                Ok(summary) => return Ok(summary),
                Err(e) => e,
            };

            match err.retry_after() {
                Some(wait) if retries < self.max_retries => {
                    retries += 1;
                    tracing::warn!(
                        retry = retries,
                        max_retries = self.max_retries,
                        retry_after_ms = wait.as_millis() as u64,
                        "rate limited, retrying chunk"
                    );
                    std::thread::sleep(wait);
                }
                Some(_) => {
                    tracing::error!(error = %err, retries, "giving up on chunk");
                    return Err(ChunkFailure::RetriesExhausted {
                        retries: self.max_retries,
                        last: err,
                    });
                }
                None => {
                    tracing::error!(error = %err, "error summarizing chunk");
                    return Err(ChunkFailure::NotRetryable(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::testing::ScriptedBackend;
    use std::time::{Duration, Instant};

    fn rate_limited(ms: u64) -> LlmError {
        LlmError::RateLimited {
            retry_after: Some(Duration::from_millis(ms)),
            message: "slow down".into(),
        }
    }

    fn summarizer(backend: Arc<ScriptedBackend>) -> ChunkSummarizer {
        ChunkSummarizer::new(backend, CallSettings::new("test-model", Some(100), 0.7))
    }

    #[test]
    fn success_on_first_attempt() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("summary".into())]));
        let s = summarizer(backend.clone());
        assert_eq!(s.summarize_chunk("text"), "summary");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn rate_limit_then_success_waits_advertised_delay() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(rate_limited(50)),
            Ok("second time lucky".into()),
        ]));
        let s = summarizer(backend.clone());

        let start = Instant::now();
        let out = s.summarize_chunk("text");
        let elapsed = start.elapsed();

        assert_eq!(out, "second time lucky");
        assert_eq!(backend.calls(), 2);
        assert!(elapsed >= Duration::from_millis(50), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[test]
    fn retries_exhausted_yields_fixed_placeholder() {
        let backend = Arc::new(ScriptedBackend::repeating(|| Err(rate_limited(1))));
        let s = summarizer(backend.clone());

        assert_eq!(
            s.summarize_chunk("text"),
            "Error summarizing chunk after 3 retries."
        );
        // One initial attempt plus three retries.
        assert_eq!(backend.calls(), 4);
    }

    #[test]
    fn custom_retry_budget() {
        let backend = Arc::new(ScriptedBackend::repeating(|| Err(rate_limited(1))));
        let s = summarizer(backend.clone()).with_max_retries(1);
        assert_eq!(
            s.summarize_chunk("text"),
            "Error summarizing chunk after 1 retries."
        );
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn non_rate_limit_error_not_retried() {
        let backend = Arc::new(ScriptedBackend::repeating(|| {
            Err(LlmError::Auth {
                status: 401,
                message: "bad key".into(),
            })
        }));
        let s = summarizer(backend.clone());

        let err = s.try_summarize("text").unwrap_err();
        assert!(matches!(err, ChunkFailure::NotRetryable(LlmError::Auth { .. })));
        assert!(err.placeholder().starts_with("Error summarizing chunk:"));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn rate_limit_without_directive_not_retried() {
        let backend = Arc::new(ScriptedBackend::repeating(|| {
            Err(LlmError::RateLimited {
                retry_after: None,
                message: "quota exhausted".into(),
            })
        }));
        let s = summarizer(backend.clone());
        assert!(matches!(
            s.try_summarize("text"),
            Err(ChunkFailure::NotRetryable(_))
        ));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn request_carries_prompts_and_settings() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("ok".into())]));
        let s = summarizer(backend.clone());
        s.summarize_chunk("THE CHUNK");

        let req = backend.requests().pop().unwrap();
        assert_eq!(req.model, "test-model");
        assert_eq!(req.max_tokens, Some(100));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].content, prompts::CHUNK_SYSTEM);
        assert!(req.messages[1].content.ends_with("THE CHUNK"));
    }
}
