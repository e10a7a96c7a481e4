use tracing::{info, warn};

use crate::ai::Summarizer;
use crate::core::models::Document;
use crate::errors::SummarizerError;
use crate::extract::extract_text;

/// Prefix shown in front of backend failures.
pub const API_ERROR_PREFIX: &str = "API Error: ";

/// Shown when the backend answered but without a summary in the expected place.
pub const NO_SUMMARY_MESSAGE: &str = "No summary generated.";

/// Printed under a backend failure.
pub const BACKEND_FAILURE_HINT: &str =
    "Check that the backend is reachable and that its URL, model and API key are configured.";

/// What the user handed in for this action.
#[derive(Debug, Clone, Copy)]
pub enum InputSource<'a> {
    File(&'a Document),
    Text(&'a str),
}

/// Pick the input for this action. An uploaded file takes precedence over
/// typed text; blank text counts as no text.
pub fn resolve_input<'a>(
    file: Option<&'a Document>,
    text: Option<&'a str>,
) -> Result<InputSource<'a>, SummarizerError> {
    if let Some(document) = file {
        if text.is_some_and(|t| !t.trim().is_empty()) {
            info!(filename = %document.filename, "Both file and text supplied; using the file");
        }
        return Ok(InputSource::File(document));
    }

    match text {
        Some(t) if !t.trim().is_empty() => Ok(InputSource::Text(t)),
        _ => Err(SummarizerError::EmptyInput),
    }
}

/// Turn the input into the text that will be summarized, extracting it from
/// the file when one was supplied.
pub async fn prepare_text(input: InputSource<'_>) -> Result<String, SummarizerError> {
    let text = match input {
        InputSource::File(document) => extract_text(document).await?,
        InputSource::Text(text) => text.to_string(),
    };

    if text.trim().is_empty() {
        warn!("No text to summarize");
        return Err(SummarizerError::EmptyInput);
    }

    Ok(text)
}

#[derive(Debug)]
pub enum SummaryOutcome {
    Summary(String),
    Failed(SummarizerError),
}

impl SummaryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SummaryOutcome::Summary(_))
    }

    /// The string the presentation layer shows for this outcome.
    pub fn display_text(&self) -> String {
        match self {
            SummaryOutcome::Summary(summary) => summary.clone(),
            SummaryOutcome::Failed(SummarizerError::MalformedResponse(_)) => {
                NO_SUMMARY_MESSAGE.to_string()
            }
            SummaryOutcome::Failed(err) => format!("{API_ERROR_PREFIX}{err}"),
        }
    }

    /// A next step for the user when the backend itself failed the request.
    pub fn failure_hint(&self) -> Option<&'static str> {
        match self {
            SummaryOutcome::Failed(err) if err.is_backend_failure() => Some(BACKEND_FAILURE_HINT),
            _ => None,
        }
    }
}

/// Run one summarize action.
///
/// Input problems (nothing supplied, unsupported or unreadable file, no text
/// found) are returned as `Err` and no request is sent. Backend failures are
/// folded into [`SummaryOutcome::Failed`] so the caller always has something
/// to show.
pub async fn summarize_task(
    summarizer: &dyn Summarizer,
    input: InputSource<'_>,
) -> Result<SummaryOutcome, SummarizerError> {
    let text = prepare_text(input).await?;

    info!(
        backend = %summarizer.backend(),
        model = summarizer.model(),
        chars = text.len(),
        "Generating summary"
    );

    match summarizer.summarize(&text).await {
        Ok(summary) => Ok(SummaryOutcome::Summary(summary)),
        Err(err) => {
            warn!(error = %err, "Summarization failed");
            Ok(SummaryOutcome::Failed(err))
        }
    }
}
