//! Thumbnail cache behavior against real files.

use std::sync::Arc;

use pdfutils::config::{Config, ThumbnailSize};
use pdfutils::thumbnail::{OutlineRenderer, ThumbnailCache};

use crate::common::{workdir, write_pdf};

async fn cache_in(dir: &std::path::Path, size: ThumbnailSize) -> ThumbnailCache {
    ThumbnailCache::open(dir.join(".pdfutils_cache"), size, Arc::new(OutlineRenderer))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_purge_twice_leaves_empty_directory() {
    let dir = workdir();
    let cache = cache_in(dir.path(), ThumbnailSize::default()).await;
    let pdf = write_pdf(dir.path(), "a.pdf", 2, 1);
    cache.rasterize(&pdf, 0).await.unwrap();
    assert_eq!(cache.cached_files().len(), 2);

    cache.purge().await.unwrap();
    cache.purge().await.unwrap();

    assert!(cache.dir().is_dir());
    assert!(cache.cached_files().is_empty());
}

#[tokio::test]
async fn test_reopening_clears_previous_session() {
    let dir = workdir();
    let pdf = write_pdf(dir.path(), "a.pdf", 3, 1);

    let first = cache_in(dir.path(), ThumbnailSize::default()).await;
    first.rasterize(&pdf, 0).await.unwrap();
    drop(first);

    let second = cache_in(dir.path(), ThumbnailSize::default()).await;
    assert!(second.cached_files().is_empty());
}

#[tokio::test]
async fn test_thumbnails_fit_bounds_and_keep_aspect() {
    let dir = workdir();
    // Pages 101..103 points wide and 792 tall
    let pdf = write_pdf(dir.path(), "a.pdf", 3, 1);
    let bounds = ThumbnailSize {
        width: 100,
        height: 100,
    };
    let cache = cache_in(dir.path(), bounds).await;

    let thumbnails = cache.rasterize(&pdf, 0).await.unwrap();

    for (index, thumbnail) in thumbnails.iter().enumerate() {
        assert_eq!(thumbnail.height, 100);
        assert!(thumbnail.width <= 100);

        let page_ratio = (101 + index) as f64 / 792.0;
        let thumb_ratio = thumbnail.width as f64 / thumbnail.height as f64;
        assert!((page_ratio - thumb_ratio).abs() < 0.01);
    }
}

#[tokio::test]
async fn test_cache_from_config_uses_configured_directory() {
    let dir = workdir();
    let mut config = Config::new(dir.path());
    config.cache_dir = dir.path().join("thumbs");
    std::fs::create_dir_all(&config.cache_dir).unwrap();
    std::fs::write(config.cache_dir.join("4_2.png"), b"old").unwrap();

    let cache = ThumbnailCache::from_config(&config).await.unwrap();

    assert_eq!(cache.dir(), config.cache_dir.as_path());
    assert!(!config.cache_dir.join("4_2.png").exists());
    assert_eq!(cache.size(), ThumbnailSize::default());
}

#[tokio::test]
async fn test_cache_above_workdir_is_rejected_and_nothing_is_deleted() {
    let root = workdir();
    let project = root.path().join("project");
    std::fs::create_dir_all(&project).unwrap();
    let input = write_pdf(&project, "input.pdf", 1, 1);
    let mut config = Config::new(&project);
    config.cache_dir = root.path().to_path_buf();

    assert!(config.validate().is_err());
    assert!(ThumbnailCache::from_config(&config).await.is_err());

    assert!(project.is_dir());
    assert!(input.exists());
}
