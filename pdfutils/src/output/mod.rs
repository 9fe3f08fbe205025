//! Output formatting and display for pdfutils.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The imported files table
//! - Completion and failure notices
//! - The options panel strip
//!
//! # Examples
//!
//! ```no_run
//! use pdfutils::output::OutputFormatter;
//! use pdfutils::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Importing files");
//! formatter.success("Merge complete");
//! # }
//! ```

pub mod formatter;
pub mod notice;

pub use formatter::{MessageLevel, OutputFormatter};
pub use notice::{Notice, NoticeLevel};

use crate::manifest::ImportOutcome;

/// Report skipped files and summarize what was imported.
pub fn display_import_outcome(formatter: &OutputFormatter, outcome: &ImportOutcome) {
    for rejected in &outcome.rejected {
        formatter.warning(&format!("Skipped {}: {}", rejected.path.display(), rejected.error));
    }

    if outcome.manifest.is_empty() {
        formatter.info("No files imported");
        return;
    }

    formatter.debug(&format!(
        "Imported {} file(s), {} pages",
        outcome.manifest.len(),
        outcome.manifest.total_pages()
    ));
}
