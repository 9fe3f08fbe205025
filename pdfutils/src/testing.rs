//! Helpers for building small PDFs in unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Build a document with `pages` pages tagged by `tag`.
///
/// Page `i` (0-based) gets a MediaBox width of `tag * 100 + i + 1` so tests
/// can tell pages apart after merging or splitting.
pub(crate) fn tagged_document(pages: u32, tag: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Document {tag} page {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let width = (tag * 100 + i + 1) as i64;
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
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

    doc
}

/// A document with `pages` pages and tag 0.
pub(crate) fn sample_document(pages: u32) -> Document {
    tagged_document(pages, 0)
}

/// Write a tagged document to `dir/name` and return its path.
pub(crate) fn write_tagged_pdf(dir: &Path, name: &str, pages: u32, tag: u32) -> PathBuf {
    let path = dir.join(name);
    let mut doc = tagged_document(pages, tag);
    doc.save(&path).expect("save sample pdf");
    path
}

/// Write an untagged sample document to `dir/name`.
pub(crate) fn write_sample_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
    write_tagged_pdf(dir, name, pages, 0)
}

/// MediaBox widths of every page, in page order.
pub(crate) fn page_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            doc.get_dictionary(page_id)
                .and_then(|page| page.get(b"MediaBox"))
                .and_then(|mediabox| mediabox.as_array())
                .ok()
                .and_then(|mediabox| mediabox.get(2))
                .and_then(|width| width.as_float().ok())
                .map(|width| width as i64)
                .unwrap_or(-1)
        })
        .collect()
}
