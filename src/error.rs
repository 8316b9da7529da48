//! Rich diagnostic error types for booksum.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Subsystems that live in a single file
//! (configuration, worker pools) keep their errors here.

use miette::Diagnostic;
use thiserror::Error;

use crate::chunking::ChunkError;
use crate::library::LibraryError;
use crate::llm::LlmError;
use crate::pipeline::PipelineError;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BookSumError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pool(#[from] PoolError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file \"{path}\": {source}")]
    #[diagnostic(
        code(booksum::config::read),
        help("Check that the file exists and is readable, or omit --config to use defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file \"{path}\": {message}")]
    #[diagnostic(
        code(booksum::config::parse),
        help("The file must be valid TOML. Run `booksum config` to print a template.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config file \"{path}\": {source}")]
    #[diagnostic(
        code(booksum::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {field}: {message}")]
    #[diagnostic(code(booksum::config::invalid))]
    Invalid { field: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Worker pool errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PoolError {
    #[error("worker pool \"{name}\" needs at least one thread")]
    #[diagnostic(
        code(booksum::pool::zero_workers),
        help("Set the [concurrency] worker counts to 1 or more.")
    )]
    ZeroWorkers { name: String },

    #[error("failed to start worker pool \"{name}\": {message}")]
    #[diagnostic(
        code(booksum::pool::build),
        help("The OS refused to spawn worker threads. Lower the worker counts.")
    )]
    Build { name: String, message: String },
}

pub type PoolResult<T> = std::result::Result<T, PoolError>;

/// Convenience alias for top-level results.
pub type BookSumResult<T> = std::result::Result<T, BookSumError>;
