//! Output files: the append-only summary log and the comparative report.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::{PipelineError, PipelineResult};

/// Append-only log of book summaries, one block per document.
///
/// Blocks are written whole under a lock so concurrent documents never
/// interleave.
#[derive(Debug)]
pub struct SummaryLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SummaryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `Summary of <source>` followed by the summary and a blank line.
    pub fn append(&self, source: &Path, summary: &str) -> PipelineResult<()> {
        let block = format!("Summary of {}\n{summary}\n\n", source.display());

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.output_error(source))?;
        file.write_all(block.as_bytes())
            .map_err(|source| self.output_error(source))
    }

    fn output_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Output {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Write the comparative report, replacing any previous one.
pub fn write_report(path: &Path, report: &str) -> PipelineResult<()> {
    std::fs::write(path, report).map_err(|source| PipelineError::Output {
        path: path.display().to_string(),
        source,
    })
}
