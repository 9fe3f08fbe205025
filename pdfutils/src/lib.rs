//! pdfutils - merge, split and compress PDF files.
//!
//! This library provides the pieces of a small PDF toolbox:
//!
//! - Concatenating several PDFs into one
//! - Splitting a PDF in two at a pivot page
//! - Lossless recompression
//! - Page thumbnails in a session-scoped cache
//! - Screen navigation and the animated options panel of the interactive
//!   session
//!
//! # Examples
//!
//! ## Running an operation
//!
//! ```no_run
//! use pdfutils::config::CompressionLevel;
//! use pdfutils::manifest::FileManifest;
//! use pdfutils::ops::{Executor, Operation, OperationRequest};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let imported = FileManifest::import(&[PathBuf::from("a.pdf")]).await;
//! let request = OperationRequest::new(
//!     Operation::Compress { level: CompressionLevel::Maximum },
//!     imported.manifest,
//! );
//!
//! let result = Executor::new(".").execute(&request).await?;
//! println!("Wrote {} page(s)", result.statistics.pages_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the screens
//!
//! ```no_run
//! use pdfutils::nav::{Event, Navigator, Screen};
//! use pdfutils::ops::{Executor, OperationKind};
//!
//! # async fn example() {
//! let mut nav = Navigator::new(Executor::new("."));
//! nav.dispatch(Event::SelectTask(OperationKind::Merge)).await;
//! assert_eq!(nav.screen(), &Screen::TaskSelect(OperationKind::Merge));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod manifest;
pub mod nav;
pub mod ops;
pub mod output;
pub mod panel;
pub mod thumbnail;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, PdfUtilsError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
