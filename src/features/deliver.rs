use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};

use super::summarize::SummaryOutcome;

/// Name offered for the downloadable summary.
pub const DEFAULT_SUMMARY_FILENAME: &str = "summary.txt";

/// Write the outcome as shown to the user: a heading, then the text.
pub fn render_outcome<W: Write>(out: &mut W, outcome: &SummaryOutcome) -> io::Result<()> {
    writeln!(out, "Summary:")?;
    writeln!(out, "{}", outcome.display_text())
}

/// Save the outcome if it holds a summary. Returns `false` when there was
/// nothing to save.
pub fn save_outcome(path: &Path, outcome: &SummaryOutcome) -> io::Result<bool> {
    match outcome {
        SummaryOutcome::Summary(summary) => save_summary(path, summary).map(|()| true),
        SummaryOutcome::Failed(_) => {
            warn!(path = %path.display(), "No summary to save");
            Ok(false)
        }
    }
}

/// Save the summary as a plain-text file.
pub fn save_summary(path: &Path, summary: &str) -> io::Result<()> {
    fs::write(path, summary)?;
    info!(path = %path.display(), bytes = summary.len(), "Summary saved");
    Ok(())
}
