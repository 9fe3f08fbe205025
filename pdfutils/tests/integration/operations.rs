//! Integration tests for merge, split and compress.

use pdfutils::ErrorKind;
use pdfutils::config::{CompressionLevel, Config};
use pdfutils::ops::{Executor, Operation, OperationKind, OperationRequest};
use rstest::rstest;

use crate::common::{import, page_count, page_widths, workdir, write_pdf};

#[tokio::test]
async fn test_merge_keeps_file_and_page_order() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 3, 1);
    let b = write_pdf(dir.path(), "b.pdf", 2, 2);
    let files = import(&[a, b]).await;

    let request = OperationRequest::new(Operation::Merge { reverse: false }, files);
    let result = Executor::new(dir.path()).execute(&request).await.unwrap();

    assert_eq!(result.kind, OperationKind::Merge);
    let merged = dir.path().join("merged.pdf");
    assert_eq!(result.output_paths(), vec![merged.as_path()]);
    assert_eq!(page_widths(&merged), vec![101, 102, 103, 201, 202]);
}

#[tokio::test]
async fn test_merge_reverse() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 2, 1);
    let b = write_pdf(dir.path(), "b.pdf", 1, 2);

    let merged = Executor::new(dir.path())
        .merge(&[a, b], true)
        .await
        .unwrap();

    assert_eq!(page_widths(&merged), vec![201, 101, 102]);
}

#[tokio::test]
async fn test_merge_overwrites_previous_output() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 1, 1);
    let b = write_pdf(dir.path(), "b.pdf", 4, 2);
    let executor = Executor::new(dir.path());

    executor.merge(&[b], false).await.unwrap();
    let merged = executor.merge(&[a], false).await.unwrap();

    assert_eq!(page_widths(&merged), vec![101]);
}

#[tokio::test]
async fn test_split_at_pivot_two_of_five() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 5, 1);
    let files = import(&[a]).await;

    let request = OperationRequest::new(Operation::Split { pivot: 2 }, files);
    let result = Executor::new(dir.path()).execute(&request).await.unwrap();

    let first = dir.path().join("split1.pdf");
    let second = dir.path().join("split2.pdf");
    assert_eq!(result.output_paths(), vec![first.as_path(), second.as_path()]);
    assert_eq!(page_widths(&first), vec![101, 102]);
    assert_eq!(page_widths(&second), vec![103, 104, 105]);
    assert_eq!(result.statistics.files_processed, 1);
    assert_eq!(result.statistics.pages_written, 5);
}

#[rstest]
#[case(0)]
#[case(5)]
#[case(6)]
#[tokio::test]
async fn test_split_invalid_pivot(#[case] pivot: u32) {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 5, 1);

    let err = Executor::new(dir.path()).split(&a, pivot).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPivot);
    assert!(!dir.path().join("split1.pdf").exists());
    assert!(!dir.path().join("split2.pdf").exists());
}

#[tokio::test]
async fn test_split_uses_first_imported_file() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 3, 1);
    let b = write_pdf(dir.path(), "b.pdf", 3, 2);
    let files = import(&[a, b]).await;

    let request = OperationRequest::new(Operation::Split { pivot: 1 }, files);
    Executor::new(dir.path()).execute(&request).await.unwrap();

    assert_eq!(page_widths(&dir.path().join("split1.pdf")), vec![101]);
    assert_eq!(page_widths(&dir.path().join("split2.pdf")), vec![102, 103]);
}

#[rstest]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_compress_preserves_page_count(#[case] level: CompressionLevel) {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 4, 3);

    let compressed = Executor::new(dir.path()).compress(&a, level).await.unwrap();

    assert_eq!(compressed, dir.path().join("compressed.pdf"));
    assert_eq!(page_widths(&compressed), vec![301, 302, 303, 304]);
}

#[rstest]
#[case(&[1, 1], 2)]
#[case(&[3, 4, 2], 9)]
#[case(&[7], 7)]
#[tokio::test]
async fn test_merge_page_count_is_sum(#[case] pages: &[u32], #[case] expected: usize) {
    let dir = workdir();
    let paths: Vec<_> = pages
        .iter()
        .enumerate()
        .map(|(i, &n)| write_pdf(dir.path(), &format!("{i}.pdf"), n, i as u32 + 1))
        .collect();

    let merged = Executor::new(dir.path()).merge(&paths, false).await.unwrap();

    assert_eq!(page_count(&merged), expected);
}

#[tokio::test]
async fn test_split_then_merge_restores_pages() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 6, 4);
    let executor = Executor::new(dir.path());

    let (first, second) = executor.split(&a, 4).await.unwrap();
    let merged = executor.merge(&[first, second], false).await.unwrap();

    assert_eq!(page_widths(&merged), page_widths(&a));
}

#[tokio::test]
async fn test_unreadable_input_reports_file_unreadable() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 1, 1);
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.5\nnot really").unwrap();

    let err = Executor::new(dir.path())
        .merge(&[a, broken], false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileUnreadable);
    assert!(!dir.path().join("merged.pdf").exists());
}

#[tokio::test]
async fn test_executor_from_config_writes_into_workdir() {
    let dir = workdir();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, 1);

    let executor = Executor::from_config(&Config::new(&out));
    let merged = executor.merge(&[a], false).await.unwrap();

    assert_eq!(merged, out.join("merged.pdf"));
    assert!(!dir.path().join("merged.pdf").exists());
}
