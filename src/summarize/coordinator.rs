//! Concurrent fan-out of chunk summarization.

use crate::chunking::TextChunk;
use crate::pool::WorkerPool;

use super::client::ChunkSummarizer;

/// Summary of one chunk, or the placeholder that replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Index of the chunk this summarizes.
    pub index: usize,
    pub text: String,
    /// True when `text` is an error placeholder.
    pub degraded: bool,
}

/// Dispatches chunks to a bounded worker pool and gathers one summary per chunk.
pub struct Coordinator {
    summarizer: ChunkSummarizer,
    pool: WorkerPool,
}

impl Coordinator {
    pub fn new(summarizer: ChunkSummarizer, pool: WorkerPool) -> Self {
        Self { summarizer, pool }
    }

    /// Summarize every chunk concurrently.
    ///
    /// Returns exactly one [`ChunkSummary`] per input chunk, in input order,
    /// even when every task fails. A failing task never aborts its siblings.
    pub fn summarize_all(&self, chunks: Vec<TextChunk>) -> Vec<ChunkSummary> {
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();

        let outcomes = self.pool.run_all(chunks, |_, chunk| {
            let text = chunk.text;
            match self.summarizer.try_summarize(&text) {
                Ok(summary) => ChunkSummary {
                    index: chunk.index,
                    text: summary,
                    degraded: false,
                },
                Err(e) => ChunkSummary {
                    index: chunk.index,
                    text: e.placeholder(),
                    degraded: true,
                },
            }
        });

        outcomes
            .into_iter()
            .zip(indices)
            .map(|(outcome, index)| {
                outcome.unwrap_or_else(|failure| {
                    tracing::error!(chunk = index, error = %failure.message, "error processing chunk");
                    ChunkSummary {
                        index,
                        text: format!("Error processing chunk: {}", failure.message),
                        degraded: true,
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionRequest, LlmError};
    use crate::summarize::CallSettings;
    use crate::summarize::testing::ScriptedBackend;
    use std::sync::Arc;

    fn chunks(n: usize) -> Vec<TextChunk> {
        (0..n)
            .map(|i| TextChunk {
                index: i,
                text: format!("chunk-{i}"),
                token_count: 1,
            })
            .collect()
    }

    fn coordinator(backend: Arc<ScriptedBackend>, workers: usize) -> Coordinator {
        let summarizer = ChunkSummarizer::new(backend, CallSettings::new("m", None, 0.0));
        Coordinator::new(summarizer, WorkerPool::new("chunks-test", workers).unwrap())
    }

    /// Echo the chunk text back so results can be matched to inputs.
    fn echo(req: &CompletionRequest) -> Result<String, LlmError> {
        let user = &req.messages[1].content;
        let chunk = user.rsplit("\n\n").next().unwrap_or_default();
        Ok(format!("summary of {chunk}"))
    }

    #[test]
    fn one_summary_per_chunk_in_index_order() {
        let backend = Arc::new(ScriptedBackend::responding(echo));
        let out = coordinator(backend.clone(), 4).summarize_all(chunks(12));

        assert_eq!(out.len(), 12);
        for (i, s) in out.iter().enumerate() {
            assert_eq!(s.index, i);
            assert_eq!(s.text, format!("summary of chunk-{i}"));
            assert!(!s.degraded);
        }
        assert_eq!(backend.calls(), 12);
    }

    #[test]
    fn every_task_failing_still_yields_full_count() {
        let backend = Arc::new(ScriptedBackend::repeating(|| {
            Err(LlmError::Api {
                status: 500,
                message: "down".into(),
            })
        }));
        let out = coordinator(backend, 3).summarize_all(chunks(7));

        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|s| s.degraded));
        assert!(out.iter().all(|s| s.text.starts_with("Error summarizing chunk")));
    }

    #[test]
    fn panicking_backend_is_contained_per_chunk() {
        let backend = Arc::new(ScriptedBackend::responding(|req| {
            if req.messages[1].content.ends_with("chunk-2") {
                panic!("transport exploded");
            }
            echo(req)
        }));
        let out = coordinator(backend, 2).summarize_all(chunks(4));

        assert_eq!(out.len(), 4);
        assert_eq!(out[2].index, 2);
        assert!(out[2].degraded);
        assert_eq!(out[2].text, "Error processing chunk: transport exploded");
        assert!(!out[0].degraded && !out[1].degraded && !out[3].degraded);
    }

    #[test]
    fn no_chunks_no_calls() {
        let backend = Arc::new(ScriptedBackend::responding(echo));
        let out = coordinator(backend.clone(), 2).summarize_all(Vec::new());
        assert!(out.is_empty());
        assert_eq!(backend.calls(), 0);
    }
}
