//! Utilities for path collection, file-type filtering and formatting.

use crate::{Result, error::PdfUtilsError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File-type filter offered by the file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFilter {
    /// Only `*.pdf` files (case-insensitive).
    #[default]
    Pdf,
    /// Every file.
    All,
}

impl FileFilter {
    /// Label shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDFs (*.pdf)",
            Self::All => "All files (*.*)",
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["*.pdf"],
            Self::All => &["*"],
        }
    }

    /// Build the glob matcher for this filter.
    pub fn matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.patterns() {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| PdfUtilsError::other(err.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|err| PdfUtilsError::other(err.to_string()))
    }
}

/// Expand picker input into an ordered list of candidate files.
///
/// Each entry may be:
/// - a directory, expanded recursively (sorted by name)
/// - a glob pattern such as `"./docs/*.pdf"` or `"**/*.pdf"`
/// - a plain path, kept as-is even if it does not exist so that loading can
///   report it
///
/// Files whose name does not match `filter` are dropped. Duplicates are
/// removed, keeping the first occurrence.
pub fn collect_paths_for_patterns<T>(patterns: T, filter: FileFilter) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let matcher = filter.matcher()?;
    let mut seen = HashSet::new();
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        for path in collect_paths_for_pattern(pattern.as_ref())? {
            let accepted = path
                .file_name()
                .map(|name| matcher.is_match(Path::new(name)))
                .unwrap_or(false);

            if !accepted {
                tracing::debug!(path = %path.display(), filter = filter.label(), "filtered out");
                continue;
            }

            if seen.insert(path.clone()) {
                resolved_paths.push(path);
            }
        }
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let literal = Path::new(pattern);

    if literal.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(literal)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        files.dedup();
        return Ok(files);
    }

    if !is_glob(pattern) {
        return Ok(vec![literal.to_path_buf()]);
    }

    let paths = glob::glob(pattern).map_err(|err| PdfUtilsError::Other {
        message: err.to_string(),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PdfUtilsError::Other {
            message: err.to_string(),
        })?;
        if path.is_file() {
            resolved_paths.push(path);
        }
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// File name of `path` for display, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
