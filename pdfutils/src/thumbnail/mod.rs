//! Page thumbnails and the scratch directory that holds them.
//!
//! Every imported file is rasterized page by page into
//! `<file_index>_<page>.png` (page numbers start at 1). The cache directory is
//! wiped when the cache is opened, so thumbnails never outlive a session. A
//! directory holding anything else is left alone and the purge fails.
//!
//! # Examples
//!
//! ```no_run
//! use pdfutils::config::Config;
//! use pdfutils::thumbnail::ThumbnailCache;
//! use std::path::Path;
//!
//! # async fn example() -> pdfutils::Result<()> {
//! let cache = ThumbnailCache::from_config(&Config::new(".")).await?;
//! let thumbnails = cache.rasterize(Path::new("report.pdf"), 0).await?;
//! println!("{} pages rendered", thumbnails.len());
//! # Ok(())
//! # }
//! ```

pub mod render;

pub use render::{OutlineRenderer, PageGeometry, PageRenderer, default_renderer};

#[cfg(feature = "pdfium")]
pub use render::PdfiumRenderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::{Config, ThumbnailSize};
use crate::error::{PdfUtilsError, Result};
use crate::manifest::FileManifest;

/// A rendered page on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// PNG location inside the cache directory.
    pub path: PathBuf,
    /// Position of the source file in the manifest.
    pub file_index: usize,
    /// 1-based page number.
    pub page: u32,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Scratch directory of page thumbnails.
pub struct ThumbnailCache {
    dir: PathBuf,
    size: ThumbnailSize,
    renderer: Arc<dyn PageRenderer>,
}

impl std::fmt::Debug for ThumbnailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailCache")
            .field("dir", &self.dir)
            .field("size", &self.size)
            .field("renderer", &self.renderer.name())
            .finish()
    }
}

impl ThumbnailCache {
    /// Open the cache at `dir`, deleting the thumbnails it held.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `dir` holds anything but thumbnails, and
    /// `Io` if the directory cannot be removed or created.
    pub async fn open(
        dir: impl Into<PathBuf>,
        size: ThumbnailSize,
        renderer: Arc<dyn PageRenderer>,
    ) -> Result<Self> {
        let cache = Self {
            dir: dir.into(),
            size,
            renderer,
        };
        cache.purge().await?;

        tracing::debug!(dir = %cache.dir.display(), renderer = cache.renderer.name(), "opened thumbnail cache");
        Ok(cache)
    }

    /// Open the cache configured for a session with the best available renderer.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::open(
            config.cache_dir.clone(),
            config.thumbnail_size,
            default_renderer(),
        )
        .await
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Bounding box thumbnails are fitted into.
    pub fn size(&self) -> ThumbnailSize {
        self.size
    }

    /// Name of the active renderer.
    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Delete every thumbnail and leave the cache directory empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` without deleting anything when the directory
    /// holds an entry that is not a thumbnail.
    pub async fn purge(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&self.dir).await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut thumbnails = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let is_file = entry.file_type().await?.is_file();
            if !is_file || !is_thumbnail_file_name(&entry.file_name().to_string_lossy()) {
                return Err(PdfUtilsError::invalid_config(format!(
                    "Refusing to purge {}: {} is not a thumbnail",
                    self.dir.display(),
                    entry.path().display()
                )));
            }
            thumbnails.push(entry.path());
        }

        for path in &thumbnails {
            tokio::fs::remove_file(path).await?;
        }
        tracing::debug!(dir = %self.dir.display(), removed = thumbnails.len(), "purged thumbnail cache");
        Ok(())
    }

    /// Render every page of `file` and store the PNGs under `file_index`.
    ///
    /// Renders from an earlier import at the same index are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailFailed` if the file cannot be rendered or a PNG
    /// cannot be written.
    pub async fn rasterize(&self, file: &Path, file_index: usize) -> Result<Vec<Thumbnail>> {
        let renderer = Arc::clone(&self.renderer);
        let source = file.to_path_buf();
        let dir = self.dir.clone();
        let size = self.size;

        tokio::task::spawn_blocking(move || {
            let images = renderer.render_pages(&source, size)?;

            let mut thumbnails = Vec::with_capacity(images.len());
            for (index, image) in images.into_iter().enumerate() {
                let page = index as u32 + 1;
                let path = dir.join(thumbnail_file_name(file_index, page));

                image
                    .save_with_format(&path, image::ImageFormat::Png)
                    .map_err(|e| PdfUtilsError::thumbnail_failed(source.clone(), e.to_string()))?;

                thumbnails.push(Thumbnail {
                    path,
                    file_index,
                    page,
                    width: image.width(),
                    height: image.height(),
                });
            }

            tracing::debug!(
                path = %source.display(),
                pages = thumbnails.len(),
                "rasterized"
            );
            Ok(thumbnails)
        })
        .await
        .map_err(|e| PdfUtilsError::other(format!("Render task failed: {e}")))?
    }

    /// Render every file in the manifest, indexed by position.
    pub async fn rasterize_all(&self, manifest: &FileManifest) -> Result<Vec<Vec<Thumbnail>>> {
        let mut all = Vec::with_capacity(manifest.len());
        for (index, file) in manifest.iter().enumerate() {
            all.push(self.rasterize(file.path(), index).await?);
        }
        Ok(all)
    }

    /// Files currently in the cache directory, sorted by name.
    pub fn cached_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// Cache file name for a page.
pub fn thumbnail_file_name(file_index: usize, page: u32) -> String {
    format!("{file_index}_{page}.png")
}

/// Whether `name` has the `<file_index>_<page>.png` shape.
fn is_thumbnail_file_name(name: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    name.strip_suffix(".png")
        .and_then(|stem| stem.split_once('_'))
        .is_some_and(|(index, page)| digits(index) && digits(page))
}
