//! From picker input to an imported manifest.

use pdfutils::manifest::FileManifest;
use pdfutils::utils::{FileFilter, collect_paths_for_patterns};

use crate::common::{workdir, write_pdf};

#[tokio::test]
async fn test_directory_selection_imports_pdfs_in_name_order() {
    let dir = workdir();
    write_pdf(dir.path(), "b.pdf", 2, 2);
    write_pdf(dir.path(), "a.pdf", 1, 1);
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let root = dir.path().display().to_string();
    let paths = collect_paths_for_patterns([root.as_str()], FileFilter::Pdf).unwrap();
    let outcome = FileManifest::import(&paths).await;

    let names: Vec<&str> = outcome.manifest.iter().map(|f| f.display_name()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    assert!(outcome.rejected.is_empty());
}

#[tokio::test]
async fn test_all_files_filter_rejects_non_pdfs_at_import() {
    let dir = workdir();
    write_pdf(dir.path(), "a.pdf", 1, 1);
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let pattern = format!("{}/*", dir.path().display());
    let paths = collect_paths_for_patterns([pattern.as_str()], FileFilter::All).unwrap();
    assert_eq!(paths.len(), 2);

    let outcome = FileManifest::import(&paths).await;

    assert_eq!(outcome.manifest.len(), 1);
    assert_eq!(outcome.rejected.len(), 1);
    assert!(outcome.rejected[0].path.ends_with("notes.txt"));
}
