pub mod deliver;
pub mod summarize;

pub use summarize::{InputSource, SummaryOutcome, resolve_input, summarize_task};
