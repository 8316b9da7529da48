//! booksum CLI: summarize a directory of books and compare them.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use booksum::chunking::{BpeTokenizer, chunk_text};
use booksum::config::SummarizerConfig;
use booksum::library;
use booksum::llm::{OpenAiClient, OpenAiConfig};
use booksum::pipeline::{Pipeline, discover_inputs};

#[derive(Parser)]
#[command(name = "booksum", version, about = "Summarize books with a language model")]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every file in the input directory and write the comparative report.
    Run {
        /// Directory of PDF, EPUB and XML files.
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// File that book summaries are appended to.
        #[arg(long)]
        summary_log: Option<PathBuf>,

        /// File the comparative report is written to.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Theme used by the book summaries and the report.
        #[arg(long)]
        theme: Option<String>,

        /// Documents processed concurrently.
        #[arg(long)]
        document_workers: Option<usize>,

        /// Chunk summaries in flight at once, shared by all documents.
        #[arg(long)]
        chunk_workers: Option<usize>,

        /// Retries per chunk after a rate-limit rejection.
        #[arg(long)]
        max_retries: Option<u32>,

        /// Send documents that fit the context window as a single chunk.
        #[arg(long)]
        no_force_chunking: bool,
    },

    /// Show how a file would be chunked, without calling the model.
    Chunks {
        /// Book file to extract and chunk.
        file: PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Also write it to this path.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SummarizerConfig::load(path)?,
        None => SummarizerConfig::default(),
    };

    match cli.command {
        Commands::Run {
            input_dir,
            summary_log,
            report,
            theme,
            document_workers,
            chunk_workers,
            max_retries,
            no_force_chunking,
        } => {
            if let Some(dir) = input_dir {
                config.input_dir = dir;
            }
            if let Some(path) = summary_log {
                config.summary_log = path;
            }
            if let Some(path) = report {
                config.report_path = path;
            }
            if let Some(theme) = theme {
                config.theme = theme;
            }
            if let Some(n) = document_workers {
                config.concurrency.document_workers = n;
            }
            if let Some(n) = chunk_workers {
                config.concurrency.chunk_workers = n;
            }
            if let Some(n) = max_retries {
                config.retry.max_retries = n;
            }
            if no_force_chunking {
                config.chunking.force_chunking = false;
            }
            config.validate()?;

            let credentials = OpenAiConfig::from_env(&config.llm.base_url, config.llm.timeout_secs)?;
            let tokenizer = BpeTokenizer::for_model(&config.chunking.tokenizer_model)?;
            let pipeline = Pipeline::from_config(
                &config,
                Arc::new(OpenAiClient::new(credentials)),
                Arc::new(tokenizer),
            )?;

            let paths = discover_inputs(&config.input_dir)?;
            println!("Found {} file(s) in {}", paths.len(), config.input_dir.display());

            let run = pipeline.run(&paths);

            for book in &run.book_summaries {
                println!("  ok      {}", book.source.display());
            }
            for failure in &run.failures {
                println!("  failed  {}: {}", failure.source.display(), failure.message);
            }
            println!(
                "Summaries appended to {}",
                pipeline.summary_log().path().display()
            );
            match (&run.report, &run.report_error) {
                (Some(_), _) => println!(
                    "Comparative report written to {}",
                    pipeline.report_path().display()
                ),
                (None, Some(e)) => println!("No comparative report: {e}"),
                (None, None) => println!("No comparative report: no book was summarized"),
            }
        }

        Commands::Chunks { file } => {
            let document = library::ingest_file(&file)?;
            let tokenizer = BpeTokenizer::for_model(&config.chunking.tokenizer_model)?;
            let chunks = chunk_text(&tokenizer, document.text(), &config.chunking)?;

            println!(
                "{} ({}): {} chars, {} chunk(s)",
                file.display(),
                document.format(),
                document.text().chars().count(),
                chunks.len()
            );
            for chunk in &chunks {
                let preview: String = chunk.text.chars().take(60).collect();
                println!(
                    "  [{}] {} tokens  {}",
                    chunk.index,
                    chunk.token_count,
                    preview.replace('\n', " ")
                );
            }
        }

        Commands::Config { save } => {
            let rendered = config.to_toml().into_diagnostic()?;
            print!("{rendered}");
            if let Some(path) = save {
                config.save(&path)?;
                println!("# saved to {}", path.display());
            }
        }
    }

    Ok(())
}
