use crate::error::ComposerError;
use crate::pages::{inherited_attribute, INHERITABLE};
use log::debug;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashMap;

/// State for deep-copying objects from one document into another.
struct ObjectCopier<'a> {
    source_doc: &'a Document,
    target_doc: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source_doc: &'a Document, target_doc: &'a mut Document) -> Self {
        Self {
            source_doc,
            target_doc,
            id_map: HashMap::new(),
        }
    }

    /// Copies an object and everything it references, each at most once.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so reference cycles terminate.
        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source_doc.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;

        match self.target_doc.objects.get_mut(&new_id) {
            Some(target_obj) => *target_obj = new_obj,
            None => return Err(lopdf::Error::ObjectNotFound(new_id)),
        }
        Ok(new_id)
    }

    /// Copies pages without following their `/Parent`, pulling inherited attributes
    /// down onto each page so it renders the same under a new parent.
    ///
    /// Ids for all pages are reserved first, so links between the copied pages resolve
    /// to the copies instead of dragging the source page tree along.
    fn copy_pages(&mut self, page_ids: &[ObjectId]) -> Result<Vec<ObjectId>, ComposerError> {
        let new_ids: Vec<ObjectId> = page_ids
            .iter()
            .map(|source_id| {
                let new_id = self.target_doc.add_object(Object::Null);
                self.id_map.insert(*source_id, new_id);
                new_id
            })
            .collect();

        for (source_id, new_id) in page_ids.iter().zip(&new_ids) {
            let mut page = self.source_doc.get_dictionary(*source_id)?.clone();
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = inherited_attribute(self.source_doc, *source_id, key)? {
                        page.set(key, value);
                    }
                }
            }
            page.remove(b"Parent");

            let new_obj = self.remap_references(Object::Dictionary(page))?;
            match self.target_doc.objects.get_mut(new_id) {
                Some(target_obj) => *target_obj = new_obj,
                None => return Err(lopdf::Error::ObjectNotFound(*new_id).into()),
            }
        }
        Ok(new_ids)
    }

    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => {
                let new_arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(new_arr))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }
}

/// Inserts all pages of `prefix` before the first page of `target`. Returns the ids of the
/// copied pages in `target`, in order.
///
/// Only the root `/Pages` node of `target` is touched; existing objects keep their ids, so
/// annotations and destinations on the original pages stay valid.
pub fn prepend_document(target: &mut Document, prefix: &Document) -> Result<Vec<ObjectId>, ComposerError> {
    let source_pages = prefix.get_pages();
    if source_pages.is_empty() {
        return Ok(Vec::new());
    }

    // BTreeMap iteration is already in page order.
    let source_page_ids: Vec<ObjectId> = source_pages.into_values().collect();
    let copied_page_ids = ObjectCopier::new(prefix, target).copy_pages(&source_page_ids)?;

    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;
    let kids_obj = target.get_dictionary(pages_id)?.get(b"Kids")?.clone();
    let kids_array_id = kids_obj.as_reference().ok();
    let mut kids = match kids_array_id {
        Some(id) => target.get_object(id)?.as_array()?.clone(),
        None => kids_obj.as_array()?.clone(),
    };

    kids.splice(0..0, copied_page_ids.iter().map(|id| Object::Reference(*id)));

    if let Some(id) = kids_array_id {
        *target.get_object_mut(id)? = Object::Array(kids);
    } else {
        target
            .get_object_mut(pages_id)?
            .as_dict_mut()?
            .set("Kids", Object::Array(kids));
    }
    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let original_count = pages_dict.get(b"Count")?.as_i64()?;
    pages_dict.set("Count", original_count + copied_page_ids.len() as i64);

    for page_id in &copied_page_ids {
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(*page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    debug!("Prepended {} page(s) to document", copied_page_ids.len());
    Ok(copied_page_ids)
}
