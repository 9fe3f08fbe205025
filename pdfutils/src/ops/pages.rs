//! Page tree manipulation shared by merge and split.
//!
//! Both operations end by pointing the catalog's root `Pages` node directly at
//! an ordered list of page objects. Pages may rely on attributes inherited
//! from intermediate nodes that are about to be detached, so those attributes
//! are copied onto each page first.

use crate::error::{PdfUtilsError, Result};
use lopdf::{Document, Object, ObjectId};

/// Attributes a page may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed, cyclic `Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

/// Page object ids in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Id of the catalog's root `Pages` node.
pub fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PdfUtilsError::operation_failed(format!("Failed to get pages reference: {e}")))
}

/// Replace the document's page tree with exactly `page_ids`, in order.
///
/// Every listed page becomes a direct child of the root `Pages` node and
/// receives any inheritable attribute it previously picked up from an
/// ancestor.
pub fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = root_pages_id(doc)?;

    for &page_id in page_ids {
        let inherited = inherited_attributes(doc, page_id);

        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfUtilsError::operation_failed(format!("Failed to get page: {e}")))?;

        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", Object::Reference(pages_id));
    }

    let root = doc
        .get_dictionary_mut(pages_id)
        .map_err(|e| PdfUtilsError::operation_failed(format!("Failed to get pages object: {e}")))?;

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    root.set("Kids", Object::Array(kids));
    root.set("Count", Object::Integer(page_ids.len() as i64));

    Ok(())
}

/// Look up `key` on a page, falling back to its ancestors.
pub fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }

    None
}

/// Inheritable attributes the page lacks but an ancestor provides.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    INHERITABLE
        .iter()
        .filter(|key| !page.has(key))
        .filter_map(|key| {
            resolve_inherited(doc, page_id, key).map(|value| (key.to_vec(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_widths, sample_document};
    use lopdf::dictionary;

    /// Two pages under an intermediate node that carries the MediaBox.
    fn nested_document() -> Document {
        let mut doc = Document::with_version("1.5");
        let root_id = doc.new_object_id();
        let node_id = doc.new_object_id();

        let first = doc.add_object(dictionary! { "Type" => "Page", "Parent" => node_id });
        let second = doc.add_object(dictionary! { "Type" => "Page", "Parent" => node_id });

        doc.objects.insert(
            node_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Parent" => root_id,
                "Kids" => vec![first.into(), second.into()],
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
            }),
        );
        doc.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![node_id.into()],
                "Count" => 2,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => root_id });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_resolve_inherited() {
        let doc = nested_document();
        let page = page_ids(&doc)[1];

        assert!(resolve_inherited(&doc, page, b"MediaBox").is_some());
        assert!(resolve_inherited(&doc, page, b"Rotate").is_none());
    }

    #[test]
    fn test_rebuild_keeps_requested_order() {
        let mut doc = sample_document(3);
        let mut ids = page_ids(&doc);
        ids.reverse();

        rebuild_page_tree(&mut doc, &ids).unwrap();

        assert_eq!(page_widths(&doc), vec![3, 2, 1]);
    }

    #[test]
    fn test_rebuild_subset_updates_count() {
        let mut doc = sample_document(4);
        let ids = page_ids(&doc);

        rebuild_page_tree(&mut doc, &ids[1..3]).unwrap();

        assert_eq!(doc.get_pages().len(), 2);
        let root = doc.get_dictionary(root_pages_id(&doc).unwrap()).unwrap();
        assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), 2);
    }

    #[test]
    fn test_rebuild_copies_inherited_mediabox() {
        let mut doc = nested_document();
        let ids = page_ids(&doc);
        assert_eq!(ids.len(), 2);

        rebuild_page_tree(&mut doc, &ids[..1]).unwrap();

        let root_id = root_pages_id(&doc).unwrap();
        let page = doc.get_dictionary(ids[0]).unwrap();
        assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), root_id);
        assert_eq!(page_widths(&doc), vec![300]);
    }
}
