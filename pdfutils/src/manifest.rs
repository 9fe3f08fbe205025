//! Imported files and their derived metadata.
//!
//! A [`FileManifest`] is built when the file picker returns a selection. It
//! keeps the picker's order, and each [`ImportedFile`] is immutable once
//! created. Files that cannot be opened as PDFs are reported back instead of
//! entering the manifest.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PdfUtilsError, Result};
use crate::io::{LoadedPdf, PdfReader};
use crate::utils::{display_name, format_file_size};

/// A file selected in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedFile {
    path: PathBuf,
    display_name: String,
    page_count: u32,
    size_bytes: u64,
}

impl ImportedFile {
    /// Open `path` and record its page count and size.
    ///
    /// # Errors
    ///
    /// Returns a `FileUnreadable`-kind error if the file is missing or is
    /// not a readable PDF.
    pub async fn inspect(path: &Path) -> Result<Self> {
        let loaded = PdfReader::new().load(path).await?;
        Ok(Self::from_loaded(loaded))
    }

    fn from_loaded(loaded: LoadedPdf) -> Self {
        Self {
            display_name: display_name(&loaded.path),
            path: loaded.path,
            page_count: loaded.page_count as u32,
            size_bytes: loaded.file_size,
        }
    }

    /// Build an entry from already known metadata.
    pub fn from_parts(path: impl Into<PathBuf>, page_count: u32, size_bytes: u64) -> Self {
        let path = path.into();
        Self {
            display_name: display_name(&path),
            path,
            page_count,
            size_bytes,
        }
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in the review table.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Size on disk in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Human-readable size.
    pub fn format_size(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

/// A file the picker returned that could not be imported.
#[derive(Debug)]
pub struct RejectedFile {
    /// Path as returned by the picker.
    pub path: PathBuf,
    /// Why it was rejected.
    pub error: PdfUtilsError,
}

/// Ordered list of imported files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifest {
    files: Vec<ImportedFile>,
}

/// Outcome of importing a picker selection.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Files that were imported, in selection order.
    pub manifest: FileManifest,
    /// Files that were skipped.
    pub rejected: Vec<RejectedFile>,
}

impl FileManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect every selected path in order.
    ///
    /// Unreadable files are collected in [`ImportOutcome::rejected`]; the
    /// rest keep their relative order.
    pub async fn import(paths: &[PathBuf]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();
        let (results, stats) = PdfReader::new().load_all(paths).await;

        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(loaded) => outcome.manifest.files.push(ImportedFile::from_loaded(loaded)),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping file");
                    outcome.rejected.push(RejectedFile {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            imported = stats.success_count,
            rejected = stats.failure_count,
            pages = stats.total_pages,
            size = %stats.format_total_size(),
            "import finished"
        );
        outcome
    }

    /// Append an already inspected file.
    pub fn push(&mut self, file: ImportedFile) {
        self.files.push(file);
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file has been imported.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ImportedFile> {
        self.files.get(index)
    }

    /// Iterate over files in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ImportedFile> {
        self.files.iter()
    }

    /// Files as a slice.
    pub fn files(&self) -> &[ImportedFile] {
        &self.files
    }

    /// Sum of page counts.
    pub fn total_pages(&self) -> u64 {
        self.files.iter().map(|f| f.page_count as u64).sum()
    }

    /// Sum of file sizes.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

impl FromIterator<ImportedFile> for FileManifest {
    fn from_iter<I: IntoIterator<Item = ImportedFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileManifest {
    type Item = &'a ImportedFile;
    type IntoIter = std::slice::Iter<'a, ImportedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
