//! Saving operation outputs.
//!
//! Each output is written to `<name>.tmp` next to its final location and
//! renamed into place once complete. A failed write removes the staging file
//! and leaves any previous output untouched.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutils::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! PdfWriter::new().save(doc, Path::new("merged.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfUtilsError, Result};
use crate::utils::format_file_size;

const BUFFER_SIZE: usize = 64 * 1024;

/// What a single save produced.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time spent serializing and moving the file into place.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Final location of the file.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Saves documents exactly as given. Stream compression and object
/// renumbering are left to the operations.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self
    }

    /// Save a PDF document to a file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` if the file cannot be created, written or moved
    /// into place.
    pub async fn save(&self, doc: Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and report how long it took and how big it is.
    pub async fn save_with_stats(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let target = path.to_path_buf();

        task::spawn_blocking(move || {
            let start = Instant::now();
            let staging = staging_path(&target);

            if let Err(err) = write_document(&mut doc, &staging) {
                let _ = std::fs::remove_file(&staging);
                return Err(err);
            }

            std::fs::rename(&staging, &target).map_err(|e| {
                let _ = std::fs::remove_file(&staging);
                PdfUtilsError::write_failure(target.clone(), e)
            })?;

            let file_size = std::fs::metadata(&target).map(|m| m.len()).unwrap_or(0);
            let write_time = start.elapsed();
            tracing::debug!(
                path = %target.display(),
                bytes = file_size,
                ms = write_time.as_millis() as u64,
                "wrote pdf"
            );

            Ok(WriteStatistics {
                write_time,
                file_size,
                output_path: target,
            })
        })
        .await
        .map_err(|e| PdfUtilsError::other(format!("Write task failed: {e}")))?
    }

    /// Check that the directory `path` would be written into exists and is
    /// writable.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` if the parent directory is missing or read-only.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let denied = |kind: std::io::ErrorKind, reason: &str| {
            PdfUtilsError::write_failure(path.to_path_buf(), std::io::Error::new(kind, reason))
        };

        let metadata = tokio::fs::metadata(parent)
            .await
            .map_err(|e| PdfUtilsError::write_failure(path.to_path_buf(), e))?;

        if !metadata.is_dir() {
            return Err(denied(
                std::io::ErrorKind::NotADirectory,
                "working directory is not a directory",
            ));
        }
        if metadata.permissions().readonly() {
            return Err(denied(
                std::io::ErrorKind::PermissionDenied,
                "working directory is read-only",
            ));
        }

        Ok(())
    }

    /// Delete an output, treating a missing file as already deleted.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PdfUtilsError::write_failure(path.to_path_buf(), e)),
        }
    }
}

/// Sibling file the document is written to before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_document(doc: &mut Document, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| PdfUtilsError::write_failure(path.to_path_buf(), e))?;
    let mut out = std::io::BufWriter::with_capacity(BUFFER_SIZE, file);

    doc.save_to(&mut out)
        .map_err(|e| PdfUtilsError::write_failure(path.to_path_buf(), std::io::Error::other(e)))?;

    out.flush()
        .map_err(|e| PdfUtilsError::write_failure(path.to_path_buf(), e))
}
