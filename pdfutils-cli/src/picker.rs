//! Line prompts and the file picker.
//!
//! The picker asks for a file-type filter and then for paths, directories
//! or glob patterns, and expands them with
//! [`collect_paths_for_patterns`].

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use pdfutils::output::OutputFormatter;
use pdfutils::utils::{FileFilter, collect_paths_for_patterns};

/// Reads answers from stdin, one line each.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    /// Prompt on the process's stdin.
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read the trimmed answer. `None` once stdin is
    /// closed.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        print!("{question} ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read input")?;
        Ok(line.map(|line| line.trim().to_string()))
    }
}

/// What the picker returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Candidate files, in the order they were given.
    Files(Vec<PathBuf>),
    /// The user asked to go back.
    Back,
    /// Stdin was closed.
    Closed,
}

/// Ask for a filter and a file selection.
pub async fn pick_files(prompt: &mut Prompt, formatter: &OutputFormatter) -> Result<Selection> {
    let filters = [FileFilter::Pdf, FileFilter::All];
    for (index, filter) in filters.iter().enumerate() {
        formatter.list_item(index + 1, filter.label());
    }

    let filter = loop {
        let Some(answer) = prompt.ask("File type [1]:").await? else {
            return Ok(Selection::Closed);
        };
        if is_back(&answer) {
            return Ok(Selection::Back);
        }
        match parse_filter_choice(&answer) {
            Some(filter) => break filter,
            None => formatter.warning(&format!("Unknown file type: {answer}")),
        }
    };

    loop {
        let Some(answer) = prompt
            .ask("Files, directories or patterns (b to go back):")
            .await?
        else {
            return Ok(Selection::Closed);
        };
        if is_back(&answer) {
            return Ok(Selection::Back);
        }

        let patterns = split_selection(&answer);
        if patterns.is_empty() {
            continue;
        }

        match collect_paths_for_patterns(&patterns, filter) {
            Ok(paths) if paths.is_empty() => {
                formatter.warning(&format!("Nothing matched {}", filter.label()));
            }
            Ok(paths) => return Ok(Selection::Files(paths)),
            Err(err) => formatter.warning(&err.to_string()),
        }
    }
}

/// Whether an answer means "go back".
pub fn is_back(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "b" | "back")
}

/// Map a filter answer to a filter. Empty picks the PDF filter.
pub fn parse_filter_choice(answer: &str) -> Option<FileFilter> {
    match answer.trim().to_lowercase().as_str() {
        "" | "1" | "pdf" => Some(FileFilter::Pdf),
        "2" | "all" | "*" => Some(FileFilter::All),
        _ => None,
    }
}

/// Split a selection line on whitespace. Double quotes group a path that
/// contains spaces.
pub fn split_selection(line: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }

    items
}
