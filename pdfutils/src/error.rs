//! Error types for pdfutils.
//!
//! Every fallible operation in the library returns [`PdfUtilsError`]. The
//! variants are grouped into a small user-facing taxonomy ([`ErrorKind`]) that
//! the view layer uses to phrase notices:
//!
//! - **FileUnreadable**: missing file, not a file, corrupt or encrypted PDF
//! - **InvalidPivot**: split point outside the document
//! - **WriteFailure**: an output could not be created or written
//! - **Other**: configuration, rendering and internal failures

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfutils operations.
pub type Result<T> = std::result::Result<T, PdfUtilsError>;

/// Coarse classification of a [`PdfUtilsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input could not be opened or parsed as a PDF.
    FileUnreadable,
    /// The split pivot is out of range for the document.
    InvalidPivot,
    /// An output file could not be written.
    WriteFailure,
    /// Anything else.
    Other,
}

/// Main error type for pdfutils operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfUtilsError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file exists but could not be loaded as a PDF.
    #[error("Cannot read PDF: {}\n  Reason: {reason}", .path.display())]
    FileUnreadable {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// An operation was requested without any input files.
    #[error("No input files selected")]
    NoFiles,

    /// Split pivot is outside `1..page_count`.
    #[error(
        "Invalid split page {pivot}: document has {page_count} page(s), \
         pick a page between 1 and {}",
        .page_count.saturating_sub(1)
    )]
    InvalidPivot {
        /// Requested pivot page.
        pivot: u32,
        /// Pages in the document being split.
        page_count: u32,
    },

    /// Failed to create or write an output file.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    WriteFailure {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document structure could not be manipulated.
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// A page thumbnail could not be produced.
    #[error("Failed to render thumbnail for: {}\n  Reason: {reason}", .path.display())]
    ThumbnailFailed {
        /// Source PDF.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfUtilsError {
    fn from(err: lopdf::Error) -> Self {
        Self::operation_failed(err.to_string())
    }
}

impl From<anyhow::Error> for PdfUtilsError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<image::ImageError> for PdfUtilsError {
    fn from(err: image::ImageError) -> Self {
        Self::other(format!("Image error: {err}"))
    }
}

impl PdfUtilsError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FileUnreadable error.
    pub fn file_unreadable(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FileUnreadable {
            path,
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an InvalidPivot error.
    pub fn invalid_pivot(pivot: u32, page_count: u32) -> Self {
        Self::InvalidPivot { pivot, page_count }
    }

    /// Create a WriteFailure error.
    pub fn write_failure(path: PathBuf, source: io::Error) -> Self {
        Self::WriteFailure { path, source }
    }

    /// Create an OperationFailed error.
    pub fn operation_failed(reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            reason: reason.into(),
        }
    }

    /// Create a ThumbnailFailed error.
    pub fn thumbnail_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::ThumbnailFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify this error for user-facing reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::NotAFile { .. }
            | Self::FileUnreadable { .. }
            | Self::EncryptedPdf { .. } => ErrorKind::FileUnreadable,
            Self::InvalidPivot { .. } => ErrorKind::InvalidPivot,
            Self::WriteFailure { .. } => ErrorKind::WriteFailure,
            _ => ErrorKind::Other,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileUnreadable { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::NoFiles => 1,
            Self::InvalidPivot { .. } => 1,
            Self::WriteFailure { .. } => 5,
            Self::OperationFailed { .. } => 6,
            Self::ThumbnailFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
