//! Message formatting and display.
//!
//! This module provides formatted terminal output for the interactive session
//! and the one-shot subcommands, with support for quiet and verbose modes.
//! Text is built by pure `format_*`/`*_lines` helpers and printed by
//! [`OutputFormatter`].
//!
//! # Examples
//!
//! ```
//! use pdfutils::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Importing files...");
//! formatter.success("Merge complete");
//! formatter.error("Something went wrong");
//! ```

use crate::config::Config;
use crate::manifest::FileManifest;
use crate::ops::OperationResult;
use crate::output::notice::{Notice, NoticeLevel};
use crate::panel::SlidePanel;
use crate::utils::format_file_size;
use std::io::{self, Write};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m", // Green
            Self::Warning => "\x1b[33m", // Yellow
            Self::Error => "\x1b[31m",   // Red
            Self::Debug => "\x1b[36m",   // Cyan
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Width of the panel indicator, in cells.
pub const PANEL_COLUMNS: usize = 40;

/// Render a message with its level prefix, optionally colored.
pub fn format_message(level: MessageLevel, message: &str, colored: bool) -> String {
    let prefix = level.prefix();
    let color = level.color();

    if colored && !color.is_empty() {
        format!("{color}{prefix}{message}{RESET}")
    } else {
        format!("{prefix}{message}")
    }
}

/// One row per imported file: position, name, pages and size.
pub fn review_rows(manifest: &FileManifest) -> Vec<String> {
    manifest
        .iter()
        .enumerate()
        .map(|(index, file)| {
            format!(
                "{:>3}: {}  ({} page{}, {})",
                index + 1,
                file.display_name(),
                file.page_count(),
                if file.page_count() == 1 { "" } else { "s" },
                file.format_size()
            )
        })
        .collect()
}

/// A notice drawn as a boxed toast.
pub fn toast_lines(notice: &Notice) -> Vec<String> {
    let icon = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    };
    let heading = format!("{icon} {}", notice.title);
    let body: Vec<&str> = notice.message.lines().collect();

    let width = body
        .iter()
        .map(|line| line.chars().count())
        .chain(std::iter::once(heading.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(format!("╭{}╮", "─".repeat(width + 2)));
    lines.push(format!("│ {heading:<width$} │"));
    for line in body {
        lines.push(format!("│ {line:<width$} │"));
    }
    lines.push(format!("╰{}╯", "─".repeat(width + 2)));
    lines
}

/// The options panel as a one-line strip `columns` cells wide.
///
/// Cells left of the panel's position are blank and the rest is filled.
pub fn panel_line(panel: &SlidePanel, columns: usize) -> String {
    let offset = (panel.position().clamp(0.0, 1.0) * columns as f64).round() as usize;
    let offset = offset.min(columns);
    format!("[{}{}]", " ".repeat(offset), "▓".repeat(columns - offset))
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a message only in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        println!("{}", format_message(level, message, self.colored));
    }

    /// Print a section header.
    ///
    /// Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a labelled detail line in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a numbered menu entry.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Print the imported files table.
    pub fn review_table(&self, manifest: &FileManifest) {
        if self.quiet {
            return;
        }
        for row in review_rows(manifest) {
            println!("{row}");
        }
        println!(
            "     {} file(s), {} pages, {}",
            manifest.len(),
            manifest.total_pages(),
            format_file_size(manifest.total_size())
        );
    }

    /// Print a notice as a toast. Errors are shown even in quiet mode.
    pub fn notice(&self, notice: &Notice) {
        if self.quiet && !notice.is_error() {
            return;
        }
        let level = match notice.level {
            NoticeLevel::Success => MessageLevel::Success,
            NoticeLevel::Error => MessageLevel::Error,
        };
        for line in toast_lines(notice) {
            let line = if self.colored {
                format!("{}{line}{RESET}", level.color())
            } else {
                line
            };
            println!("{line}");
        }
    }

    /// Redraw the panel strip in place.
    pub fn panel_frame(&self, panel: &SlidePanel) {
        if !self.quiet {
            print!("\r{}", panel_line(panel, PANEL_COLUMNS));
            io::stdout().flush().ok();
        }
    }

    /// Finish a run of [`panel_frame`](Self::panel_frame) calls.
    pub fn end_frames(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print per-output details of a finished operation in verbose mode.
    pub fn operation_details(&self, result: &OperationResult) {
        if !self.verbose {
            return;
        }
        for output in &result.outputs {
            self.detail(
                &output.path.display().to_string(),
                &format!(
                    "{} pages, {}",
                    output.page_count,
                    format_file_size(output.size_bytes)
                ),
            );
        }
        self.detail("Elapsed", &format!("{} ms", result.statistics.elapsed_ms));
    }

    /// Print a blank line.
    ///
    /// Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Check if output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
