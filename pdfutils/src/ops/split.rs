use lopdf::{Document, ObjectId};

use crate::error::{PdfUtilsError, Result};
use crate::ops::pages::{page_ids, rebuild_page_tree};

/// Divide `doc` at `pivot` into two documents.
///
/// The first part holds pages `[0, pivot)` and the second `[pivot, n)`,
/// where `n` is the page count. Objects only reachable from the other part's
/// pages are pruned from each output.
///
/// # Errors
///
/// Returns `InvalidPivot` unless `1 <= pivot <= n - 1`.
pub fn split_document(doc: &Document, pivot: u32) -> Result<(Document, Document)> {
    let pages = page_ids(doc);
    let page_count = pages.len() as u32;

    if pivot == 0 || pivot >= page_count {
        return Err(PdfUtilsError::invalid_pivot(pivot, page_count));
    }

    let (head, tail) = pages.split_at(pivot as usize);
    Ok((extract_pages(doc, head)?, extract_pages(doc, tail)?))
}

/// Copy of `doc` restricted to `page_ids`.
fn extract_pages(doc: &Document, page_ids: &[ObjectId]) -> Result<Document> {
    let mut part = doc.clone();
    rebuild_page_tree(&mut part, page_ids)?;

    let pruned = part.prune_objects();
    tracing::debug!(pages = page_ids.len(), pruned = pruned.len(), "extracted pages");

    part.renumber_objects();
    Ok(part)
}
