//! PDF reading and loading operations.
//!
//! Loading happens on tokio's blocking pool; callers await each load before
//! moving on, so documents are always returned in the order requested.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutils::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("a.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfUtilsError, Result};
use crate::utils::format_file_size;

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedPdf>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of PDFs successfully loaded.
    pub success_count: usize,

    /// Number of PDFs that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Total size of successfully loaded files.
    pub total_size: u64,

    /// Total number of pages loaded.
    pub total_pages: usize,
}

impl LoadStatistics {
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut stats = Self {
            success_count: 0,
            failure_count: 0,
            total_time,
            total_size: 0,
            total_pages: 0,
        };

        for result in results {
            match result {
                Ok(loaded) => {
                    stats.success_count += 1;
                    stats.total_size += loaded.file_size;
                    stats.total_pages += loaded.page_count;
                }
                Err(_) => stats.failure_count += 1,
            }
        }

        stats
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Loads PDFs, rejecting documents without pages.
#[derive(Debug, Clone)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self
    }

    /// Check that `path` names an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` or `NotAFile`.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        let exists = path.try_exists().map_err(|e| {
            PdfUtilsError::file_unreadable(path.to_path_buf(), e.to_string())
        })?;

        if !exists {
            return Err(PdfUtilsError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfUtilsError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a file
    /// - File is not a valid PDF
    /// - PDF is encrypted
    /// - PDF has no pages
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;

        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || {
            let start = Instant::now();

            let doc = Document::load(&path_buf).map_err(|e| {
                let err_msg = e.to_string();
                let lowered = err_msg.to_lowercase();
                if lowered.contains("encrypt") || lowered.contains("password") {
                    PdfUtilsError::encrypted_pdf(path_buf.clone())
                } else {
                    PdfUtilsError::file_unreadable(path_buf.clone(), err_msg)
                }
            })?;

            if doc.get_pages().is_empty() {
                return Err(PdfUtilsError::file_unreadable(
                    path_buf.clone(),
                    "PDF has no pages",
                ));
            }

            let loaded = LoadedPdf::new(doc, path_buf, start.elapsed());
            tracing::debug!(
                path = %loaded.path.display(),
                pages = loaded.page_count,
                "loaded pdf"
            );
            Ok(loaded)
        })
        .await
        .map_err(|e| PdfUtilsError::other(format!("Load task failed: {e}")))?
    }

    /// Load several documents one after another, stopping at the first failure.
    pub async fn load_each(&self, paths: &[PathBuf]) -> Result<Vec<LoadedPdf>> {
        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            loaded.push(self.load(path).await?);
        }
        Ok(loaded)
    }

    /// Load every document, keeping failures alongside successes.
    ///
    /// Results are returned in input order together with aggregate statistics.
    pub async fn load_all(&self, paths: &[PathBuf]) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results: Vec<LoadResult> = stream::iter(paths)
            .then(|path| self.load(path))
            .collect()
            .await;

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
