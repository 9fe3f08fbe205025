//! PDF operations: merge, split and compress.
//!
//! The document-level transformations live in the submodules and work on
//! in-memory [`lopdf::Document`]s. [`Executor`] wraps them with loading from
//! disk and writing the fixed-name outputs into the working directory.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutils::ops::{Executor, Operation, OperationRequest};
//! use pdfutils::manifest::FileManifest;
//! use std::path::PathBuf;
//!
//! # async fn example() -> pdfutils::Result<()> {
//! let imported = FileManifest::import(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]).await;
//! let request = OperationRequest::new(Operation::Merge { reverse: false }, imported.manifest);
//!
//! let result = Executor::new("/tmp/out").execute(&request).await?;
//! println!("wrote {:?}", result.output_paths());
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod merge;
pub mod pages;
pub mod split;

pub use compress::{CompressionReport, compress_document};
pub use merge::PdfMerger;
pub use split::split_document;

use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{COMPRESS_OUTPUT, CompressionLevel, Config, MERGE_OUTPUT, SPLIT_OUTPUTS};
use crate::error::{PdfUtilsError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::manifest::FileManifest;

/// The three tasks offered from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Concatenate files.
    Merge,
    /// Divide one file at a pivot page.
    Split,
    /// Recompress files.
    Compress,
}

impl OperationKind {
    /// Every kind, in menu order.
    pub const ALL: [OperationKind; 3] = [Self::Merge, Self::Split, Self::Compress];

    /// Title used in menus and notices.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Merge => "Merge",
            Self::Split => "Split",
            Self::Compress => "Compress",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// An operation together with its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Concatenate every file; `reverse` flips the file order.
    Merge {
        /// Merge the files last to first.
        reverse: bool,
    },
    /// Split the first file so that the first output holds `pivot` pages.
    Split {
        /// Number of pages that go to the first output.
        pivot: u32,
    },
    /// Compress each file.
    Compress {
        /// How aggressively to rewrite the file.
        level: CompressionLevel,
    },
}

impl Operation {
    /// The payload-free discriminant.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Merge { .. } => OperationKind::Merge,
            Self::Split { .. } => OperationKind::Split,
            Self::Compress { .. } => OperationKind::Compress,
        }
    }
}

/// An operation to run over imported files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// What to do.
    pub operation: Operation,
    /// Inputs, in picker order.
    pub files: FileManifest,
}

impl OperationRequest {
    /// Create a request.
    pub fn new(operation: Operation, files: FileManifest) -> Self {
        Self { operation, files }
    }

    /// Check the request against the imported metadata.
    ///
    /// # Errors
    ///
    /// Returns `NoFiles` when nothing was imported and `InvalidPivot` when a
    /// split pivot does not leave at least one page on each side.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.files.get(0) else {
            return Err(PdfUtilsError::NoFiles);
        };

        if let Operation::Split { pivot } = self.operation {
            let page_count = first.page_count();
            if pivot == 0 || pivot >= page_count {
                return Err(PdfUtilsError::invalid_pivot(pivot, page_count));
            }
        }

        Ok(())
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path().to_path_buf()).collect()
    }
}

/// A file written by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    /// Where it was written.
    pub path: PathBuf,
    /// Pages it contains.
    pub page_count: usize,
    /// Size on disk.
    pub size_bytes: u64,
}

/// Aggregate numbers for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatistics {
    /// Inputs read.
    pub files_processed: usize,
    /// Pages across all outputs.
    pub pages_written: usize,
    /// Bytes across all outputs.
    pub bytes_written: u64,
    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Which operation ran.
    pub kind: OperationKind,
    /// Files written, in output order.
    pub outputs: Vec<OutputFile>,
    /// Aggregate numbers.
    pub statistics: OperationStatistics,
}

impl OperationResult {
    /// Paths of every output.
    pub fn output_paths(&self) -> Vec<&Path> {
        self.outputs.iter().map(|output| output.path.as_path()).collect()
    }
}

/// File name of the compress output for the input at `index`.
///
/// The first input writes `compressed.pdf`; later ones get a numeric suffix
/// starting at 2.
pub fn compress_output_name(index: usize) -> String {
    match index {
        0 => COMPRESS_OUTPUT.to_string(),
        n => {
            let stem = COMPRESS_OUTPUT.trim_end_matches(".pdf");
            format!("{stem}_{}.pdf", n + 1)
        }
    }
}

/// A document waiting to be written.
struct PendingOutput {
    document: Document,
    path: PathBuf,
}

/// Runs operations against files on disk.
#[derive(Debug, Clone)]
pub struct Executor {
    workdir: PathBuf,
    reader: PdfReader,
    writer: PdfWriter,
}

impl Executor {
    /// Create an executor that writes into `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
        }
    }

    /// Create an executor for a session.
    ///
    /// The working directory is made absolute so notices name a real place
    /// rather than `.`.
    pub fn from_config(config: &Config) -> Self {
        let workdir = config
            .workdir
            .canonicalize()
            .or_else(|_| std::path::absolute(&config.workdir))
            .unwrap_or_else(|_| config.workdir.clone());
        Self::new(workdir)
    }

    /// Directory outputs are written to.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a request.
    ///
    /// # Errors
    ///
    /// - `NoFiles` / `InvalidPivot` if the request is invalid
    /// - `FileUnreadable`-kind errors if an input cannot be loaded
    /// - `WriteFailure` if an output cannot be written; outputs already
    ///   written by this request are removed
    pub async fn execute(&self, request: &OperationRequest) -> Result<OperationResult> {
        request.validate()?;

        let start = Instant::now();
        let paths = request.paths();
        tracing::info!(operation = ?request.operation, files = paths.len(), "running operation");

        let (files_processed, outputs) = match request.operation {
            Operation::Merge { reverse } => (paths.len(), self.run_merge(&paths, reverse).await?),
            Operation::Split { pivot } => (1, self.run_split(&paths[0], pivot).await?),
            Operation::Compress { level } => (paths.len(), self.run_compress(&paths, level).await?),
        };

        let statistics = OperationStatistics {
            files_processed,
            pages_written: outputs.iter().map(|o| o.page_count).sum(),
            bytes_written: outputs.iter().map(|o| o.size_bytes).sum(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        Ok(OperationResult {
            kind: request.operation.kind(),
            outputs,
            statistics,
        })
    }

    /// Concatenate `files` into `merged.pdf`.
    pub async fn merge(&self, files: &[PathBuf], reverse: bool) -> Result<PathBuf> {
        let mut outputs = self.run_merge(files, reverse).await?;
        outputs
            .pop()
            .map(|output| output.path)
            .ok_or_else(|| PdfUtilsError::operation_failed("Merge produced no output"))
    }

    /// Split `file` into `split1.pdf` and `split2.pdf`.
    pub async fn split(&self, file: &Path, pivot: u32) -> Result<(PathBuf, PathBuf)> {
        let outputs = self.run_split(file, pivot).await?;
        match <[OutputFile; 2]>::try_from(outputs) {
            Ok([first, second]) => Ok((first.path, second.path)),
            Err(_) => Err(PdfUtilsError::operation_failed("Split produced no output")),
        }
    }

    /// Compress `file` into `compressed.pdf`.
    pub async fn compress(&self, file: &Path, level: CompressionLevel) -> Result<PathBuf> {
        let mut outputs = self.run_compress(&[file.to_path_buf()], level).await?;
        outputs
            .pop()
            .map(|output| output.path)
            .ok_or_else(|| PdfUtilsError::operation_failed("Compress produced no output"))
    }

    async fn run_merge(&self, files: &[PathBuf], reverse: bool) -> Result<Vec<OutputFile>> {
        if files.is_empty() {
            return Err(PdfUtilsError::NoFiles);
        }

        let output = self.workdir.join(MERGE_OUTPUT);
        self.writer.can_write(&output).await?;

        let mut documents: Vec<Document> = self
            .reader
            .load_each(files)
            .await?
            .into_iter()
            .map(|loaded| loaded.document)
            .collect();

        if reverse {
            documents.reverse();
        }

        let merged = task_blocking(move || PdfMerger::merge(documents)).await?;

        self.write_outputs(vec![PendingOutput {
            document: merged,
            path: output,
        }])
        .await
    }

    async fn run_split(&self, file: &Path, pivot: u32) -> Result<Vec<OutputFile>> {
        let first = self.workdir.join(SPLIT_OUTPUTS.0);
        let second = self.workdir.join(SPLIT_OUTPUTS.1);
        self.writer.can_write(&first).await?;

        let document = self.reader.load(file).await?.document;
        let (head, tail) = task_blocking(move || split_document(&document, pivot)).await?;

        self.write_outputs(vec![
            PendingOutput {
                document: head,
                path: first,
            },
            PendingOutput {
                document: tail,
                path: second,
            },
        ])
        .await
    }

    async fn run_compress(
        &self,
        files: &[PathBuf],
        level: CompressionLevel,
    ) -> Result<Vec<OutputFile>> {
        if files.is_empty() {
            return Err(PdfUtilsError::NoFiles);
        }
        self.writer
            .can_write(&self.workdir.join(COMPRESS_OUTPUT))
            .await?;

        let mut pending = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            let document = self.reader.load(file).await?.document;
            let document = task_blocking(move || {
                let mut document = document;
                compress_document(&mut document, level);
                Ok(document)
            })
            .await?;

            pending.push(PendingOutput {
                document,
                path: self.workdir.join(compress_output_name(index)),
            });
        }

        self.write_outputs(pending).await
    }

    /// Write every pending output, removing the ones already written if any
    /// later write fails.
    async fn write_outputs(&self, pending: Vec<PendingOutput>) -> Result<Vec<OutputFile>> {
        let mut written: Vec<OutputFile> = Vec::with_capacity(pending.len());

        for PendingOutput { document, path } in pending {
            let page_count = document.get_pages().len();

            match self.writer.save_with_stats(document, &path).await {
                Ok(stats) => written.push(OutputFile {
                    path: stats.output_path,
                    page_count,
                    size_bytes: stats.file_size,
                }),
                Err(err) => {
                    for output in &written {
                        if let Err(cleanup) = self.writer.remove_if_exists(&output.path).await {
                            tracing::warn!(%cleanup, "failed to remove partial output");
                        }
                    }
                    return Err(err);
                }
            }
        }

        Ok(written)
    }
}

/// Run CPU-bound document work off the async thread.
async fn task_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PdfUtilsError::other(format!("Operation task failed: {e}")))?
}
