//! Shared helpers for integration tests.
//!
//! Test PDFs are generated on the fly. Every page of a document written with
//! tag `t` has a MediaBox width of `t * 100 + page_number`, so page identity
//! survives merging and splitting.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdfutils::manifest::FileManifest;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fresh working directory.
pub fn workdir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

/// Write a `pages`-page PDF tagged `tag` to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, pages: u32, tag: u32) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for page in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("{tag}-{page}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let width = (tag * 100 + page) as i64;
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("save test pdf");
    path
}

/// MediaBox widths of every page of the PDF at `path`.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("load output pdf");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            doc.get_dictionary(page_id)
                .and_then(|page| page.get(b"MediaBox"))
                .and_then(Object::as_array)
                .ok()
                .and_then(|rect| rect.get(2))
                .and_then(|width| width.as_float().ok())
                .map(|width| width as i64)
                .unwrap_or(-1)
        })
        .collect()
}

/// Page count of the PDF at `path`.
pub fn page_count(path: &Path) -> usize {
    Document::load(path).expect("load pdf").get_pages().len()
}

/// Import `paths`, asserting every file was accepted.
pub async fn import(paths: &[PathBuf]) -> FileManifest {
    let outcome = FileManifest::import(paths).await;
    assert!(
        outcome.rejected.is_empty(),
        "unexpected rejections: {:?}",
        outcome.rejected
    );
    outcome.manifest
}
