//! Link annotations.

use crate::error::ComposerError;
use lopdf::{dictionary, Document, Object, ObjectId};
use prepender_types::Rect;

/// Adds a borderless `/Link` annotation over `rect` on `page_id` whose action jumps to
/// `destination` (an explicit destination array or a name).
pub fn insert_goto_link(
    doc: &mut Document,
    page_id: ObjectId,
    rect: Rect,
    destination: Object,
) -> Result<ObjectId, ComposerError> {
    let rect: Vec<Object> = rect.to_pdf_array().into_iter().map(Object::from).collect();
    let annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! { "S" => "GoTo", "D" => destination },
    };
    let annot_id = doc.add_object(annot);
    append_annotation(doc, page_id, annot_id)?;
    Ok(annot_id)
}

/// Appends to the page's `/Annots`, which may be missing, inline, or an indirect array.
fn append_annotation(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<(), ComposerError> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| ComposerError::InvalidPage(page_id))?;

    let annots_ref = match page.get(b"Annots").ok().cloned() {
        Some(Object::Reference(id)) => id,
        Some(Object::Array(mut annots)) => {
            annots.push(Object::Reference(annot_id));
            page.set("Annots", annots);
            return Ok(());
        }
        _ => {
            page.set("Annots", vec![Object::Reference(annot_id)]);
            return Ok(());
        }
    };

    match doc.get_object_mut(annots_ref)? {
        Object::Array(annots) => annots.push(Object::Reference(annot_id)),
        other => *other = Object::Array(vec![Object::Reference(annot_id)]),
    }
    Ok(())
}
