//! Page tree lookups shared by the other modules.

use crate::error::ComposerError;
use lopdf::{Document, Object, ObjectId};
use prepender_types::Rect;

/// Attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

/// Page object ids in document order.
pub fn ordered_page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Resolves the id of the page at a zero-based index.
pub fn page_id_at(doc: &Document, index: usize) -> Result<ObjectId, ComposerError> {
    let pages = doc.get_pages();
    pages
        .get(&(index as u32 + 1))
        .copied()
        .ok_or(ComposerError::PageOutOfRange {
            index,
            page_count: pages.len(),
        })
}

/// Numeric value of an integer or real operand.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Follows a reference, or returns the object itself.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, ComposerError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Looks up `key` on the page, walking up `/Parent` links for inheritable attributes.
pub fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>, ComposerError> {
    let mut current = doc
        .get_dictionary(page_id)
        .map_err(|_| ComposerError::InvalidPage(page_id))?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Ok(Some(value.clone()));
        }
        match current.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent_id) => current = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// The page's `/MediaBox`, defaulting to US Letter when none is present.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Result<Rect, ComposerError> {
    let Some(obj) = inherited_attribute(doc, page_id, b"MediaBox")? else {
        return Ok(Rect::new(0.0, 0.0, 612.0, 792.0));
    };
    let values = resolve(doc, &obj)?
        .as_array()?
        .iter()
        .map(|v| resolve(doc, v).ok().and_then(number))
        .collect::<Option<Vec<f32>>>();
    match values.as_deref() {
        Some([x0, y0, x1, y1]) => Ok(Rect::from_corners(*x0, *y0, *x1, *y1)),
        _ => Err(ComposerError::Other(format!(
            "page {page_id:?} has a malformed /MediaBox"
        ))),
    }
}
