use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use docsum::ai::create_summarizer;
use docsum::core::config::{AppConfig, BackendKind};
use docsum::core::models::Document;
use docsum::errors::SummarizerError;
use docsum::features::deliver::{DEFAULT_SUMMARY_FILENAME, render_outcome, save_outcome};
use docsum::features::{resolve_input, summarize_task};

/// Summarize text or a PDF/DOCX document with an LLM backend.
#[derive(Debug, Parser)]
#[command(name = "docsum", version)]
struct Cli {
    /// Document to summarize (.pdf or .docx). Takes precedence over --text.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Text to summarize. Read from stdin when neither --file nor --text is given.
    #[arg(short, long)]
    text: Option<String>,

    /// Backend to call: local or cloud. Overrides SUMMARIZER_BACKEND.
    #[arg(short, long)]
    backend: Option<String>,

    /// Model name. Overrides OLLAMA_MODEL / GROQ_MODEL for the chosen backend.
    #[arg(short, long)]
    model: Option<String>,

    /// Also save the summary to this file.
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_SUMMARY_FILENAME)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    docsum::setup_logging();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::from_env()?;
    if let Some(backend) = &cli.backend {
        config.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(model) = cli.model.clone() {
        config.set_active_model(model);
    }

    let document = match &cli.file {
        Some(path) => Some(load_document(path)?),
        None => None,
    };

    let text = match (&cli.text, &document) {
        (Some(text), _) => Some(text.clone()),
        (None, None) => read_stdin()?,
        (None, Some(_)) => None,
    };

    let input = match resolve_input(document.as_ref(), text.as_deref()) {
        Ok(input) => input,
        Err(e @ SummarizerError::EmptyInput) => {
            eprintln!("Warning: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let summarizer = create_summarizer(&config);

    let outcome = match summarize_task(summarizer.as_ref(), input).await {
        Ok(outcome) => outcome,
        Err(e @ SummarizerError::EmptyInput) => {
            eprintln!("Warning: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    render_outcome(&mut io::stdout().lock(), &outcome)?;
    if let Some(hint) = outcome.failure_hint() {
        eprintln!("Hint: {hint}");
    }

    if let Some(path) = &cli.output {
        let saved = save_outcome(path, &outcome)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if !saved {
            eprintln!(
                "Warning: no summary was generated; {} was not written",
                path.display()
            );
        }
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_document(path: &Path) -> Result<Document> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(filename, data))
}

fn read_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(Some(buf))
}
