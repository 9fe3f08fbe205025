//! CLI argument parsing for pdfutils.
//!
//! Without a subcommand pdfutils starts the interactive session. The
//! `merge`, `split` and `compress` subcommands run a single operation and
//! exit, which is handy for scripts.
//!
//! # Examples
//!
//! ```text
//! pdfutils                                  # interactive session
//! pdfutils -C out merge a.pdf b.pdf         # writes out/merged.pdf
//! pdfutils split report.pdf --pivot 3       # split1.pdf + split2.pdf
//! pdfutils --json compress --compression maximum scan.pdf
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use pdfutils::config::{CompressionLevel, Config, ThumbnailSize};
use pdfutils::ops::Operation;
use pdfutils::{PdfUtilsError, Result};

/// Merge, split and compress PDF files.
///
/// Run without a subcommand for the menu-driven session: pick a task,
/// select files, review them and run the operation. Outputs are written to
/// the working directory with fixed names and overwrite earlier results.
#[derive(Parser, Debug)]
#[command(name = "pdfutils")]
#[command(version)]
#[command(about = "Merge, split and compress PDF files", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Working directory for outputs
    ///
    /// merged.pdf, split1.pdf, split2.pdf and compressed.pdf are written
    /// here, replacing files of the same name.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Thumbnail cache directory
    ///
    /// Emptied every time pdfutils starts. Defaults to `.pdfutils_cache`
    /// inside the working directory.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Bounding box for page thumbnails
    #[arg(long, value_name = "WxH", default_value = "150x200")]
    pub thumbnail_size: String,

    /// Compression level for the compress operation
    ///
    /// - standard: Flate-compress content streams
    /// - maximum: also drop unreferenced objects and empty streams
    #[arg(short, long, value_name = "LEVEL", default_value = "standard", global = true)]
    #[arg(value_parser = ["standard", "maximum"])]
    pub compression: String,

    /// Do not render page thumbnails on import
    #[arg(long)]
    pub no_thumbnails: bool,

    /// Show the options panel without sliding it in and out
    #[arg(long)]
    pub no_animation: bool,

    /// Verbose output, including per-file details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Print the operation result as JSON (subcommands only)
    #[arg(long, global = true)]
    pub json: bool,

    /// Run one operation and exit instead of starting the session
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Non-interactive operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Concatenate files into merged.pdf, in the order given
    Merge {
        /// Input PDF files
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Merge in reverse file order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Split a file into split1.pdf (pages 1..=PAGE) and split2.pdf (the rest)
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Last page of the first part
        #[arg(short, long, value_name = "PAGE")]
        pivot: u32,
    },

    /// Rewrite files with compressed streams
    ///
    /// The first file goes to compressed.pdf, later ones to
    /// compressed_2.pdf, compressed_3.pdf and so on.
    Compress {
        /// Input PDF files
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

impl Command {
    /// Input files named on the command line.
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Self::Merge { files, .. } | Self::Compress { files } => files,
            Self::Split { file, .. } => std::slice::from_ref(file),
        }
    }

    /// The operation this command runs.
    pub fn operation(&self, compression: CompressionLevel) -> Operation {
        match self {
            Self::Merge { reverse, .. } => Operation::Merge { reverse: *reverse },
            Self::Split { pivot, .. } => Operation::Split { pivot: *pivot },
            Self::Compress { .. } => Operation::Compress { level: compression },
        }
    }
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidConfig` error if the compression level or
    /// thumbnail size cannot be parsed, or if the resulting configuration
    /// fails validation (missing working directory, cache directory equal to
    /// the working directory).
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let thumbnail_size = ThumbnailSize::parse(&self.thumbnail_size)
            .map_err(|e| PdfUtilsError::invalid_config(format!("{e:#}")))?;

        let mut config = Config::new(self.workdir.clone());
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = cache_dir.clone();
        }
        config.thumbnail_size = thumbnail_size;
        config.thumbnails = !self.no_thumbnails;
        config.animate = !self.no_animation;
        config.compression = compression;
        config.verbose = self.verbose;
        config.quiet = self.quiet;

        config
            .validate()
            .map_err(|e| PdfUtilsError::invalid_config(format!("{e:#}")))?;

        Ok(config)
    }

    /// Whether the interactive session should start.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}
