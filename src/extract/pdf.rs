use crate::errors::ExtractError;

/// Extract the text of every page, in page order. Pages that produced no text
/// come back as empty strings.
pub fn extract_pages(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    if !data.starts_with(b"%PDF-") {
        return Err(ExtractError::ExtractionFailed(
            "file does not look like a PDF".to_string(),
        ));
    }

    pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractError::ExtractionFailed(format!("failed to parse PDF: {e}")))
}

/// Join page texts with single newlines, dropping pages without text so that
/// scanned or blank pages leave no empty lines behind. Leading blank lines and
/// trailing whitespace are stripped from each page; indentation of its first
/// line is kept.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter_map(|page| {
            let text = strip_blank_edges(page.as_ref());
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_blank_edges(page: &str) -> &str {
    let page = page.trim_end();
    let first_visible = page.len() - page.trim_start().len();
    let line_start = page[..first_visible].rfind('\n').map_or(0, |i| i + 1);
    &page[line_start..]
}

pub fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractError> {
    let pages = extract_pages(data)?;
    let page_count = pages.len();
    let text = join_pages(pages);

    tracing::info!(page_count, chars = text.len(), "PDF text extraction complete");
    Ok(text)
}
