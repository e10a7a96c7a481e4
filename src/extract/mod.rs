//! Plain-text extraction from uploaded documents

pub mod docx;
pub mod pdf;

use crate::core::models::{Document, DocumentFormat};
use crate::errors::ExtractError;

pub use docx::extract_docx_text;
pub use pdf::extract_pdf_text;

/// Extract the document's plain text, choosing the parser from the filename
/// suffix.
///
/// Parsing runs on the blocking pool: the PDF parser can panic on damaged
/// input, and a panic there surfaces as [`ExtractError::ExtractionFailed`].
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedFormat`] for anything other than `pdf`
/// or `docx`, and [`ExtractError::ExtractionFailed`] when the file cannot be
/// parsed.
#[tracing::instrument(skip(document), fields(filename = %document.filename, bytes = document.data.len()))]
pub async fn extract_text(document: &Document) -> Result<String, ExtractError> {
    let format = document.format()?;
    let data = document.data.clone();

    tokio::task::spawn_blocking(move || match format {
        DocumentFormat::Pdf => extract_pdf_text(&data),
        DocumentFormat::Docx => extract_docx_text(&data),
    })
    .await
    .map_err(|e| ExtractError::ExtractionFailed(format!("parser crashed: {e}")))?
}
