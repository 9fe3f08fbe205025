//! Configuration module for pdfutils.
//!
//! The CLI turns its arguments into a [`Config`] that drives a whole
//! session: where outputs are written, where thumbnails are cached, how big
//! thumbnails are and how aggressively the compress operation rewrites
//! streams.

use anyhow::{Context, Result, bail};

use crate::PdfUtilsError;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Output file written by the merge operation.
pub const MERGE_OUTPUT: &str = "merged.pdf";

/// Output files written by the split operation (first part, second part).
pub const SPLIT_OUTPUTS: (&str, &str) = ("split1.pdf", "split2.pdf");

/// Output file written by the compress operation for the first input.
pub const COMPRESS_OUTPUT: &str = "compressed.pdf";

/// Default scratch directory name, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".pdfutils_cache";

/// Compression level used by the compress operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Flate-compress every stream.
    #[default]
    Standard,
    /// Flate-compress, prune unreferenced objects and drop empty streams.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfUtilsError;

    /// Parse compression level from `"standard"` or `"maximum"`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfUtilsError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: standard, maximum"
                ),
            }),
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Maximum => write!(f, "maximum"),
        }
    }
}

/// Bounding box for page thumbnails, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    /// Maximum width.
    pub width: u32,
    /// Maximum height.
    pub height: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: 150,
            height: 200,
        }
    }
}

impl ThumbnailSize {
    /// Parse a `WIDTHxHEIGHT` string.
    ///
    /// ```
    /// use pdfutils::config::ThumbnailSize;
    ///
    /// let size = ThumbnailSize::parse("120x160").unwrap();
    /// assert_eq!((size.width, size.height), (120, 160));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some((w, h)) = s.trim().to_lowercase().split_once('x').map(|(w, h)| {
            (w.trim().to_string(), h.trim().to_string())
        }) else {
            bail!("Invalid thumbnail size: {s}. Expected format like '150x200'");
        };

        let width: u32 = w
            .parse()
            .with_context(|| format!("Invalid thumbnail width: {w}"))?;
        let height: u32 = h
            .parse()
            .with_context(|| format!("Invalid thumbnail height: {h}"))?;

        if width == 0 || height == 0 {
            bail!("Thumbnail dimensions must be positive");
        }

        Ok(Self { width, height })
    }
}

/// Complete configuration for a pdfutils session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where operation outputs are written.
    pub workdir: PathBuf,

    /// Scratch directory for page thumbnails. Purged at startup.
    pub cache_dir: PathBuf,

    /// Bounding box for rendered thumbnails.
    pub thumbnail_size: ThumbnailSize,

    /// Whether thumbnails are rendered when files are imported.
    pub thumbnails: bool,

    /// Whether the options panel slides in and out.
    pub animate: bool,

    /// Compression level for the compress operation.
    pub compression: CompressionLevel,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Create a configuration rooted at `workdir` with default settings.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        let cache_dir = workdir.join(DEFAULT_CACHE_DIR);

        Self {
            workdir,
            cache_dir,
            thumbnail_size: ThumbnailSize::default(),
            thumbnails: true,
            animate: true,
            compression: CompressionLevel::default(),
            verbose: false,
            quiet: false,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The working directory is not a directory
    /// - The cache directory is the working directory or one of its ancestors
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if !self.workdir.is_dir() {
            bail!(
                "Working directory does not exist: {}",
                self.workdir.display()
            );
        }

        // The cache is wiped at startup, so it must never hold the workdir.
        if resolve(&self.workdir).starts_with(resolve(&self.cache_dir)) {
            bail!(
                "Cache directory cannot contain the working directory: {}",
                self.cache_dir.display()
            );
        }

        Ok(())
    }

    /// Check if informational output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}

/// Absolute form of `path`, with links resolved for the part that exists.
fn resolve(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |resolved, name| resolved.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}
