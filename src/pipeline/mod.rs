//! Pipeline driver.
//!
//! Per document: ingest → chunk → summarize chunks (skipped for a single
//! chunk) → reduce to a book summary → append to the summary log. Documents
//! run concurrently on their own pool; a document that fails at any stage is
//! recorded and skipped. Once all documents finish, the surviving book
//! summaries are reduced into one comparative report.

pub mod error;
pub mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::chunking::{ChunkConfig, Tokenizer, chunk_text};
use crate::config::SummarizerConfig;
use crate::error::BookSumResult;
use crate::library;
use crate::llm::CompletionBackend;
use crate::pool::WorkerPool;
use crate::summarize::{Aggregator, BookSummary, CallSettings, ChunkSummarizer, Coordinator};

pub use error::{PipelineError, PipelineResult};
pub use output::{SummaryLog, write_report};

/// A document that produced no book summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub source: PathBuf,
    pub message: String,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Book summaries in input order, failures omitted.
    pub book_summaries: Vec<BookSummary>,
    pub failures: Vec<DocumentFailure>,
    /// The comparative report, when one was generated and written.
    pub report: Option<String>,
    /// Why the report is missing even though book summaries exist.
    pub report_error: Option<String>,
}

pub struct Pipeline {
    tokenizer: Arc<dyn Tokenizer>,
    chunk_config: ChunkConfig,
    coordinator: Coordinator,
    aggregator: Aggregator,
    documents: WorkerPool,
    summary_log: SummaryLog,
    report_path: PathBuf,
}

impl Pipeline {
    /// Assemble the stages described by `config` around one shared backend.
    pub fn from_config(
        config: &SummarizerConfig,
        backend: Arc<dyn CompletionBackend>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> BookSumResult<Self> {
        let llm = &config.llm;
        let max_tokens = Some(llm.max_output_tokens);

        let summarizer = ChunkSummarizer::new(
            Arc::clone(&backend),
            CallSettings::new(&llm.chunk_model, max_tokens, llm.temperature),
        )
        .with_max_retries(config.retry.max_retries);

        let chunk_pool = WorkerPool::new("chunk", config.concurrency.chunk_workers)?;
        let documents = WorkerPool::new("document", config.concurrency.document_workers)?;

        let aggregator = Aggregator::new(
            backend,
            CallSettings::new(&llm.book_model, max_tokens, llm.temperature),
            CallSettings::new(&llm.report_model, None, llm.temperature),
            config.theme.clone(),
        );

        Ok(Self {
            tokenizer,
            chunk_config: config.chunking.clone(),
            coordinator: Coordinator::new(summarizer, chunk_pool),
            aggregator,
            documents,
            summary_log: SummaryLog::new(&config.summary_log),
            report_path: config.report_path.clone(),
        })
    }

    /// Summarize one file and append its summary to the log.
    pub fn process_document(&self, path: &Path) -> PipelineResult<BookSummary> {
        tracing::info!(path = %path.display(), "processing file");

        let document = library::ingest_file(path)?;
        let chunks = chunk_text(self.tokenizer.as_ref(), document.text(), &self.chunk_config)?;
        drop(document);

        let summaries: Vec<String> = match chunks.len() {
            0 => {
                return Err(PipelineError::EmptyDocument {
                    path: path.display().to_string(),
                });
            }
            // A single chunk goes straight to the book reduction.
            1 => chunks.into_iter().map(|c| c.text).collect(),
            count => {
                let start = Instant::now();
                let summaries = self.coordinator.summarize_all(chunks);
                let degraded = summaries.iter().filter(|s| s.degraded).count();
                tracing::info!(
                    path = %path.display(),
                    chunks = count,
                    degraded,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "summarized chunks"
                );
                summaries.into_iter().map(|s| s.text).collect()
            }
        };

        let text = self
            .aggregator
            .reduce_to_book_summary(&summaries)
            .map_err(|source| PipelineError::Aggregation {
                artifact: format!("book summary for {}", path.display()),
                source,
            })?;

        self.summary_log.append(path, &text)?;

        Ok(BookSummary {
            source: path.to_path_buf(),
            text,
        })
    }

    /// Process every path concurrently, then write the comparative report.
    ///
    /// Never fails as a whole: per-document and report failures are logged
    /// and recorded in the returned [`RunReport`].
    pub fn run(&self, paths: &[PathBuf]) -> RunReport {
        let start = Instant::now();
        let mut run = RunReport::default();

        let outcomes = self
            .documents
            .run_all(paths.to_vec(), |_, path| self.process_document(&path));

        for (path, outcome) in paths.iter().zip(outcomes) {
            let message = match outcome {
                Ok(Ok(summary)) => {
                    run.book_summaries.push(summary);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(failure) => failure.message,
            };
            tracing::error!(path = %path.display(), error = %message, "error processing file");
            run.failures.push(DocumentFailure {
                source: path.clone(),
                message,
            });
        }

        if !run.book_summaries.is_empty() {
            match self.write_comparative_report(&run.book_summaries) {
                Ok(report) => run.report = Some(report),
                Err(e) => {
                    tracing::error!(error = %e, "no comparative report written");
                    run.report_error = Some(e.to_string());
                }
            }
        }

        tracing::info!(
            documents = paths.len(),
            summarized = run.book_summaries.len(),
            failed = run.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "total process completed"
        );
        run
    }

    /// Discover the files in `dir` and run them.
    pub fn run_dir(&self, dir: &Path) -> PipelineResult<RunReport> {
        let paths = discover_inputs(dir)?;
        Ok(self.run(&paths))
    }

    fn write_comparative_report(&self, books: &[BookSummary]) -> PipelineResult<String> {
        let texts: Vec<String> = books.iter().map(|b| b.text.clone()).collect();
        let report = self
            .aggregator
            .reduce_to_comparative_report(&texts)
            .map_err(|source| PipelineError::Aggregation {
                artifact: "comparative report".into(),
                source,
            })?;
        write_report(&self.report_path, &report)?;
        Ok(report)
    }

    pub fn summary_log(&self) -> &SummaryLog {
        &self.summary_log
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }
}

/// Regular files directly inside `dir`, sorted by path.
pub fn discover_inputs(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let input_dir_error = |source| PipelineError::InputDir {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(input_dir_error)? {
        let path = entry.map_err(input_dir_error)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
