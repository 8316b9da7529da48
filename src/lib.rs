// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # booksum
//!
//! Map-reduce summarization of long books with a remote language model.
//!
//! ## Architecture
//!
//! - **Library** (`library`): PDF, EPUB and XML text extraction behind one parser trait
//! - **Chunking** (`chunking`): BPE token counting and fixed-size token windows
//! - **LLM** (`llm`): OpenAI-compatible chat completions over a blocking HTTP agent
//! - **Summarize** (`summarize`): per-chunk calls with rate-limit retry, concurrent fan-out,
//!   book and comparative reductions
//! - **Pipeline** (`pipeline`): per-document driver, summary log, comparative report
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use booksum::chunking::BpeTokenizer;
//! use booksum::config::SummarizerConfig;
//! use booksum::llm::{OpenAiClient, OpenAiConfig};
//! use booksum::pipeline::Pipeline;
//!
//! let config = SummarizerConfig::default();
//! let client = OpenAiClient::new(
//!     OpenAiConfig::from_env(&config.llm.base_url, config.llm.timeout_secs).unwrap(),
//! );
//! let tokenizer = BpeTokenizer::for_model(&config.chunking.tokenizer_model).unwrap();
//! let pipeline = Pipeline::from_config(&config, Arc::new(client), Arc::new(tokenizer)).unwrap();
//! let run = pipeline.run_dir(Path::new("data/books")).unwrap();
//! println!("{} books summarized", run.book_summaries.len());
//! ```

pub mod chunking;
pub mod config;
pub mod error;
pub mod library;
pub mod llm;
pub mod pipeline;
pub mod pool;
pub mod summarize;
