/// docsum - summarize typed text or PDF/DOCX documents with an LLM backend.
///
/// The crate has two halves:
/// 1. Text extraction: PDF pages or DOCX body paragraphs flattened into plain text
/// 2. Summarization: one HTTP round trip to either a local generate endpoint or
///    an OpenAI-compatible chat completions API
///
/// # Architecture
///
/// - `extract` parses documents (pdf-extract, zip + quick-xml)
/// - `ai` holds the `Summarizer` trait with `LocalBackend` and `CloudBackend`
/// - `features` is the glue the front end calls: input resolution, the
///   summarize action and delivery of the result
/// - `core::config::AppConfig` is built once at startup and handed to
///   `ai::create_summarizer`
///
/// # Example
///
/// ```no_run
/// use docsum::ai::create_summarizer;
/// use docsum::core::config::AppConfig;
/// use docsum::features::{InputSource, summarize_task};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     docsum::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let summarizer = create_summarizer(&config);
///
///     let outcome = summarize_task(
///         summarizer.as_ref(),
///         InputSource::Text("The quick brown fox jumps over the lazy dog."),
///     )
///     .await?;
///     println!("{}", outcome.display_text());
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod extract;
pub mod features;

/// Configure structured logging on stderr.
///
/// The level comes from `RUST_LOG` (default `info`). Set
/// `DOCSUM_LOG_FORMAT=json` for JSON lines. Calling it more than once is
/// harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// docsum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("DOCSUM_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };
}
