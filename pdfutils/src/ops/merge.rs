use lopdf::{Document, ObjectId};

use crate::error::{PdfUtilsError, Result};
use crate::ops::pages::{page_ids, rebuild_page_tree};

/// Concatenates documents into a single document.
pub struct PdfMerger;

impl PdfMerger {
    /// Merge `documents` in the order given.
    ///
    /// The first document becomes the base; every following document is
    /// renumbered past the base's highest object id and its objects are moved
    /// in. The resulting page tree lists every page of every input, in input
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `NoFiles` for an empty list and `OperationFailed` if a
    /// document's page tree cannot be rewritten.
    pub fn merge(documents: Vec<Document>) -> Result<Document> {
        let mut documents = documents.into_iter();
        let mut merged = documents.next().ok_or(PdfUtilsError::NoFiles)?;

        let mut all_pages: Vec<ObjectId> = page_ids(&merged);
        let mut max_id = merged.max_id;

        for mut doc in documents {
            // Avoid object id collisions by renumbering the incoming document
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let incoming = page_ids(&doc);
            tracing::debug!(pages = incoming.len(), "appending document");

            all_pages.extend(incoming);
            merged.objects.extend(doc.objects);
        }
        merged.max_id = max_id;

        rebuild_page_tree(&mut merged, &all_pages)?;

        // Catalogs and page trees of the appended documents are now orphans
        merged.prune_objects();
        merged.renumber_objects();

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_widths, sample_document, tagged_document};

    #[test]
    fn test_merge_concatenates_in_order() {
        let merged =
            PdfMerger::merge(vec![tagged_document(3, 1), tagged_document(2, 2)]).unwrap();

        assert_eq!(page_widths(&merged), vec![101, 102, 103, 201, 202]);
    }

    #[test]
    fn test_merge_single_document() {
        let merged = PdfMerger::merge(vec![sample_document(4)]).unwrap();
        assert_eq!(merged.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_nothing_fails() {
        assert!(matches!(
            PdfMerger::merge(Vec::new()),
            Err(PdfUtilsError::NoFiles)
        ));
    }

    #[test]
    fn test_merge_drops_orphaned_catalogs() {
        let merged =
            PdfMerger::merge(vec![tagged_document(1, 1), tagged_document(1, 2)]).unwrap();

        let catalogs = merged
            .objects
            .values()
            .filter_map(|object| object.as_dict().ok())
            .filter(|dict| {
                dict.get(b"Type")
                    .and_then(|t| t.as_name())
                    .map(|name| name == b"Catalog")
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(catalogs, 1);
    }
}
