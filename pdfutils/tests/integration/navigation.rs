//! A whole interactive session driven through the navigator.

use std::sync::Arc;

use pdfutils::config::ThumbnailSize;
use pdfutils::nav::{Event, Navigator, Screen};
use pdfutils::ops::{Executor, Operation, OperationKind};
use pdfutils::output::NoticeLevel;
use pdfutils::thumbnail::{OutlineRenderer, ThumbnailCache};

use crate::common::{import, page_widths, workdir, write_pdf};

fn review_state(nav: &Navigator) -> &pdfutils::nav::ReviewState {
    match nav.screen() {
        Screen::FileReview(state) => state,
        other => panic!("expected FileReview, got {other:?}"),
    }
}

#[tokio::test]
async fn test_session_split_then_back() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 5, 1);
    let cache = ThumbnailCache::open(
        dir.path().join(".cache"),
        ThumbnailSize::default(),
        Arc::new(OutlineRenderer),
    )
    .await
    .unwrap();

    let mut nav = Navigator::new(Executor::new(dir.path()));

    nav.dispatch(Event::SelectTask(OperationKind::Split)).await;
    assert_eq!(nav.screen(), &Screen::TaskSelect(OperationKind::Split));

    let manifest = import(&[a]).await;
    let thumbnails = cache.rasterize_all(&manifest).await.unwrap();
    nav.dispatch(Event::FilesImported {
        manifest,
        thumbnails,
    })
    .await;
    assert_eq!(review_state(&nav).thumbnails[0].len(), 5);

    let outcome = nav
        .dispatch(Event::RunOperation(Operation::Split { pivot: 2 }))
        .await
        .expect("split ran");
    assert!(outcome.is_ok());

    let notice = review_state(&nav).notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert!(notice.title.contains("Split"));
    assert_eq!(page_widths(&dir.path().join("split1.pdf")), vec![101, 102]);

    nav.dispatch(Event::Back).await;
    assert_eq!(nav.screen(), &Screen::MainMenu);
    assert!(!nav.exit_requested());

    nav.dispatch(Event::Quit).await;
    assert!(nav.exit_requested());
}

#[tokio::test]
async fn test_session_error_keeps_review_open() {
    let dir = workdir();
    let a = write_pdf(dir.path(), "a.pdf", 2, 1);
    let manifest = import(&[a.clone()]).await;
    std::fs::remove_file(&a).unwrap();

    let mut nav = Navigator::new(Executor::new(dir.path()));
    nav.dispatch(Event::SelectTask(OperationKind::Merge)).await;
    nav.dispatch(Event::FilesImported {
        manifest,
        thumbnails: Vec::new(),
    })
    .await;

    let outcome = nav
        .dispatch(Event::RunOperation(Operation::Merge { reverse: false }))
        .await
        .expect("merge ran");

    assert!(outcome.is_err());
    let state = review_state(&nav);
    assert!(state.notice.as_ref().unwrap().is_error());
    assert_eq!(state.manifest.len(), 1);
}

#[tokio::test]
async fn test_empty_import_stays_on_task_select() {
    let dir = workdir();
    let mut nav = Navigator::new(Executor::new(dir.path()));
    nav.dispatch(Event::SelectTask(OperationKind::Compress)).await;

    let outcome = pdfutils::manifest::FileManifest::import(&[dir.path().join("nope.pdf")]).await;
    nav.dispatch(Event::FilesImported {
        manifest: outcome.manifest,
        thumbnails: Vec::new(),
    })
    .await;

    assert_eq!(nav.screen(), &Screen::TaskSelect(OperationKind::Compress));
}
