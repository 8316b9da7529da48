//! Reductions: chunk summaries into a book summary, book summaries into a
//! comparative essay. Each is a single remote call with no retry.

use std::sync::Arc;
use std::time::Instant;

use super::CallSettings;
use super::prompts;
use crate::llm::{ChatMessage, CompletionBackend, LlmResult};

/// Default thematic lens for both reductions.
pub const DEFAULT_THEME: &str = "social isolation";

pub struct Aggregator {
    backend: Arc<dyn CompletionBackend>,
    book: CallSettings,
    report: CallSettings,
    theme: String,
}

impl Aggregator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        book: CallSettings,
        report: CallSettings,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            book,
            report,
            theme: theme.into(),
        }
    }

    /// Merge one book's chunk summaries into a single narrative summary.
    pub fn reduce_to_book_summary(&self, chunk_summaries: &[String]) -> LlmResult<String> {
        let combined = prompts::combine_chunk_summaries(chunk_summaries);
        let request = self.book.request(vec![
            ChatMessage::system(prompts::book_system(&self.theme)),
            ChatMessage::user(prompts::book_user(&self.theme, &combined)),
        ]);

        tracing::info!(parts = chunk_summaries.len(), "generating book-wide summary");
        let start = Instant::now();
        let result = self.backend.complete(&request);
        match &result {
            Ok(_) => tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "summarized full book"
            ),
            Err(e) => tracing::error!(error = %e, "error generating book-wide summary"),
        }
        result
    }

    /// Write a five-paragraph comparative essay across all book summaries.
    pub fn reduce_to_comparative_report(&self, book_summaries: &[String]) -> LlmResult<String> {
        let combined = prompts::combine_book_summaries(book_summaries);
        let request = self.report.request(vec![
            ChatMessage::system(prompts::REPORT_SYSTEM),
            ChatMessage::user(prompts::report_user(&self.theme, &combined)),
        ]);

        tracing::info!(books = book_summaries.len(), "generating comparative book report");
        let start = Instant::now();
        let result = self.backend.complete(&request);
        match &result {
            Ok(_) => tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "generated comparative report"
            ),
            Err(e) => tracing::error!(error = %e, "error generating comparative report"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::summarize::testing::ScriptedBackend;
    use std::time::Duration;

    fn aggregator(backend: Arc<ScriptedBackend>) -> Aggregator {
        Aggregator::new(
            backend,
            CallSettings::new("book-model", Some(2000), 0.7),
            CallSettings::new("report-model", None, 0.7),
            "solitude",
        )
    }

    #[test]
    fn book_summary_joins_parts_with_blank_lines() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("the book".into())]));
        let agg = aggregator(backend.clone());

        let out = agg
            .reduce_to_book_summary(&["part one".into(), "part two".into()])
            .unwrap();
        assert_eq!(out, "the book");

        let req = backend.requests().pop().unwrap();
        assert_eq!(req.model, "book-model");
        assert_eq!(req.max_tokens, Some(2000));
        assert!(req.messages[0].content.contains("theme of solitude"));
        assert!(req.messages[1].content.ends_with("part one\n\npart two"));
    }

    #[test]
    fn report_labels_each_book_and_uses_report_model() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("essay".into())]));
        let agg = aggregator(backend.clone());

        let out = agg
            .reduce_to_comparative_report(&["A".into(), "B".into()])
            .unwrap();
        assert_eq!(out, "essay");

        let req = backend.requests().pop().unwrap();
        assert_eq!(req.model, "report-model");
        assert_eq!(req.max_tokens, None);
        assert!(
            req.messages[1]
                .content
                .ends_with("Book Summary:\nA\n\nBook Summary:\nB")
        );
    }

    #[test]
    fn failure_is_returned_without_retry() {
        let backend = Arc::new(ScriptedBackend::repeating(|| {
            Err(LlmError::RateLimited {
                retry_after: Some(Duration::from_millis(1)),
                message: "busy".into(),
            })
        }));
        let agg = aggregator(backend.clone());

        assert!(agg.reduce_to_book_summary(&["x".into()]).is_err());
        assert!(agg.reduce_to_comparative_report(&["x".into()]).is_err());
        assert_eq!(backend.calls(), 2);
    }
}
