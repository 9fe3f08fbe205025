//! Completion and failure notices shown after an operation.

use serde::Serialize;
use std::path::Path;

use crate::error::{ErrorKind, PdfUtilsError};
use crate::ops::{OperationKind, OperationResult};

/// Tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// The operation finished.
    Success,
    /// The operation failed.
    Error,
}

/// A transient message naming an operation's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Tone.
    pub level: NoticeLevel,
    /// One-line heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notice {
    /// Notice for a finished operation, naming where the outputs went.
    pub fn completed(result: &OperationResult, workdir: &Path) -> Self {
        let outputs = result.outputs.len();
        Self {
            level: NoticeLevel::Success,
            title: format!("{} complete", result.kind),
            message: format!(
                "{} file{} saved to {}",
                outputs,
                if outputs == 1 { "" } else { "s" },
                workdir.display()
            ),
        }
    }

    /// Notice for a failed operation.
    pub fn failed(kind: OperationKind, error: &PdfUtilsError) -> Self {
        let title = match error.kind() {
            ErrorKind::FileUnreadable => "Could not read file".to_string(),
            ErrorKind::InvalidPivot => "Invalid split page".to_string(),
            ErrorKind::WriteFailure => "Could not save output".to_string(),
            ErrorKind::Other => format!("{kind} failed"),
        };

        Self {
            level: NoticeLevel::Error,
            title,
            message: error.to_string(),
        }
    }

    /// Notice for either outcome.
    pub fn from_outcome(
        kind: OperationKind,
        outcome: &Result<OperationResult, PdfUtilsError>,
        workdir: &Path,
    ) -> Self {
        match outcome {
            Ok(result) => Self::completed(result, workdir),
            Err(error) => Self::failed(kind, error),
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
