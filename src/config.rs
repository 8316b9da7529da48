//! Run configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration. CLI flags override individual fields after loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunking::ChunkConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::summarize::{DEFAULT_MAX_RETRIES, DEFAULT_THEME};

/// Top-level configuration for a summarization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Directory whose files are summarized (not recursive).
    pub input_dir: PathBuf,
    /// Append-only log receiving one block per book summary.
    pub summary_log: PathBuf,
    /// Comparative report, overwritten on each run.
    pub report_path: PathBuf,
    /// Thematic lens for book summaries and the report.
    pub theme: String,
    pub chunking: ChunkConfig,
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub concurrency: ConcurrencyConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/books"),
            summary_log: PathBuf::from("book_summaries.txt"),
            report_path: PathBuf::from("comparative_report.txt"),
            theme: DEFAULT_THEME.into(),
            chunking: ChunkConfig {
                force_chunking: true,
                ..ChunkConfig::default()
            },
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}

/// Remote model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Root of the OpenAI-compatible API. `OPENAI_BASE_URL` overrides it.
    pub base_url: String,
    pub timeout_secs: u64,
    pub chunk_model: String,
    pub book_model: String,
    pub report_model: String,
    /// Output cap for chunk and book calls. The report call is uncapped.
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            timeout_secs: 120,
            chunk_model: "gpt-4o-mini".into(),
            book_model: "gpt-4o-mini".into(),
            report_model: "chatgpt-4o-latest".into(),
            max_output_tokens: 2_000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts per chunk after a rate-limit rejection.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Documents processed at once.
    pub document_workers: usize,
    /// Chunk summaries in flight at once, shared by all documents.
    pub chunk_workers: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            document_workers: 4,
            chunk_workers: 8,
        }
    }
}

impl SummarizerConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml().map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, message: &str| {
            Err(ConfigError::Invalid {
                field: field.into(),
                message: message.into(),
            })
        };

        if self.chunking.chunk_size == 0 {
            return invalid("chunking.chunk_size", "must be at least 1");
        }
        if self.chunking.max_response_tokens >= self.chunking.context_window {
            return invalid(
                "chunking.max_response_tokens",
                "must be smaller than chunking.context_window",
            );
        }
        if self.concurrency.document_workers == 0 {
            return invalid("concurrency.document_workers", "must be at least 1");
        }
        if self.concurrency.chunk_workers == 0 {
            return invalid("concurrency.chunk_workers", "must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return invalid("llm.temperature", "must be between 0.0 and 2.0");
        }
        if self.theme.trim().is_empty() {
            return invalid("theme", "must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SummarizerConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("data/books"));
        assert_eq!(config.summary_log, PathBuf::from("book_summaries.txt"));
        assert_eq!(config.report_path, PathBuf::from("comparative_report.txt"));
        assert_eq!(config.theme, "social isolation");
        assert!(config.chunking.force_chunking);
        assert_eq!(config.chunking.chunk_size, 10_000);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.llm.report_model, "chatgpt-4o-latest");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("booksum.toml");
        std::fs::write(
            &path,
            "theme = \"grief\"\n[concurrency]\nchunk_workers = 2\n",
        )
        .unwrap();

        let config = SummarizerConfig::load(&path).unwrap();
        assert_eq!(config.theme, "grief");
        assert_eq!(config.concurrency.chunk_workers, 2);
        assert_eq!(config.concurrency.document_workers, 4);
        assert_eq!(config.llm.chunk_model, "gpt-4o-mini");
        // Missing [chunking] falls back to the run default, which forces splitting.
        assert!(config.chunking.force_chunking);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("booksum.toml");
        let mut config = SummarizerConfig::default();
        config.retry.max_retries = 5;
        config.llm.temperature = 0.2;

        config.save(&path).unwrap();
        assert_eq!(SummarizerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn zero_workers_rejected() {
        let mut config = SummarizerConfig::default();
        config.concurrency.chunk_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "concurrency.chunk_workers"));
    }

    #[test]
    fn response_reserve_must_fit_window() {
        let mut config = SummarizerConfig::default();
        config.chunking.max_response_tokens = config.chunking.context_window;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "theme = [").unwrap();
        let err = SummarizerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = SummarizerConfig::load(Path::new("/nonexistent/booksum.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
