//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, ScrapeOutput, SyncOutput};
pub use text::TextFormatter;
