use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

use crate::config::CompressionLevel;
use crate::ops::pages::page_ids;

/// What a compression pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    /// Pages in the document (unchanged by compression).
    pub pages: usize,
    /// Page content streams that gained a Flate filter.
    pub content_streams_compressed: usize,
    /// Objects removed by the `maximum` level.
    pub objects_removed: usize,
}

/// Losslessly compress `doc` in place.
///
/// Every stream that allows it is Flate-encoded when that makes it smaller.
/// At [`CompressionLevel::Maximum`] unreferenced objects and zero-length
/// streams are dropped first.
pub fn compress_document(doc: &mut Document, level: CompressionLevel) -> CompressionReport {
    let pages = page_ids(doc);
    let before = unfiltered_content_streams(doc, &pages);

    let objects_removed = match level {
        CompressionLevel::Standard => 0,
        CompressionLevel::Maximum => {
            let pruned = doc.prune_objects().len();
            pruned + doc.delete_zero_length_streams().len()
        }
    };

    doc.compress();

    let after = unfiltered_content_streams(doc, &pages);
    let report = CompressionReport {
        pages: pages.len(),
        content_streams_compressed: before.saturating_sub(after),
        objects_removed,
    };
    tracing::debug!(?level, ?report, "compressed document");

    report
}

/// Page content streams that carry no `Filter`.
fn unfiltered_content_streams(doc: &Document, pages: &[ObjectId]) -> usize {
    pages
        .iter()
        .flat_map(|&page_id| doc.get_page_contents(page_id))
        .filter(|&content_id| {
            matches!(
                doc.get_object(content_id),
                Ok(Object::Stream(stream)) if stream.dict.get(b"Filter").is_err()
            )
        })
        .count()
}
