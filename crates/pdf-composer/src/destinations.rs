//! Named destinations in the catalog `/Names /Dests` name tree.

use crate::error::ComposerError;
use crate::pages::resolve;
use log::{debug, warn};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::BTreeMap;

const MAX_TREE_DEPTH: usize = 32;

/// `[page /XYZ 0 top null]`: show `page` scrolled to `top`, keeping the current zoom.
pub fn xyz_destination(page_id: ObjectId, top: f32) -> Object {
    Object::Array(vec![
        Object::Reference(page_id),
        "XYZ".into(),
        0.into(),
        top.into(),
        Object::Null,
    ])
}

/// Reads every entry of the existing `/Dests` name tree, flattened.
pub fn named_destinations(doc: &Document) -> Result<BTreeMap<Vec<u8>, Object>, ComposerError> {
    let mut out = BTreeMap::new();
    let Some(tree) = dests_tree(doc)? else {
        return Ok(out);
    };
    collect_tree(doc, tree, 0, &mut out)?;
    Ok(out)
}

fn catalog(doc: &Document) -> Result<&Dictionary, ComposerError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    Ok(doc.get_dictionary(root_id)?)
}

fn dests_tree(doc: &Document) -> Result<Option<&Dictionary>, ComposerError> {
    let Ok(names) = catalog(doc)?.get(b"Names") else {
        return Ok(None);
    };
    let Ok(names) = resolve(doc, names)?.as_dict() else {
        return Ok(None);
    };
    let Ok(dests) = names.get(b"Dests") else {
        return Ok(None);
    };
    Ok(resolve(doc, dests)?.as_dict().ok())
}

fn collect_tree(
    doc: &Document,
    node: &Dictionary,
    depth: usize,
    out: &mut BTreeMap<Vec<u8>, Object>,
) -> Result<(), ComposerError> {
    if depth > MAX_TREE_DEPTH {
        warn!("Named destination tree deeper than {MAX_TREE_DEPTH} levels; ignoring the rest");
        return Ok(());
    }
    if let Ok(names) = node.get(b"Names") {
        let names = resolve(doc, names)?.as_array()?;
        for pair in names.chunks_exact(2) {
            if let Object::String(key, _) = resolve(doc, &pair[0])? {
                out.insert(key.clone(), pair[1].clone());
            }
        }
    }
    if let Ok(kids) = node.get(b"Kids") {
        for kid in resolve(doc, kids)?.as_array()? {
            if let Ok(kid) = resolve(doc, kid)?.as_dict() {
                collect_tree(doc, kid, depth + 1, out)?;
            }
        }
    }
    Ok(())
}

/// Adds `entries` to the document's named destinations.
///
/// Existing entries are preserved; on a name clash the new entry wins. The tree is
/// rewritten as a single leaf whose `/Names` array is sorted bytewise by key.
pub fn add_named_destinations<I>(doc: &mut Document, entries: I) -> Result<usize, ComposerError>
where
    I: IntoIterator<Item = (String, Object)>,
{
    let mut all = named_destinations(doc)?;
    let existing = all.len();
    let mut added = 0;
    for (name, dest) in entries {
        all.insert(name.into_bytes(), dest);
        added += 1;
    }

    let mut flat = Vec::with_capacity(all.len() * 2);
    for (key, dest) in all {
        flat.push(Object::String(key, StringFormat::Literal));
        flat.push(dest);
    }
    let tree_id = doc.add_object(dictionary! { "Names" => flat });

    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let names_ref = doc
        .get_dictionary(root_id)?
        .get(b"Names")
        .ok()
        .and_then(|n| n.as_reference().ok());
    match names_ref {
        Some(names_id) => {
            doc.get_object_mut(names_id)?
                .as_dict_mut()?
                .set("Dests", Object::Reference(tree_id));
        }
        None => {
            let catalog = doc.get_object_mut(root_id)?.as_dict_mut()?;
            let mut names = catalog
                .get(b"Names")
                .ok()
                .and_then(|n| n.as_dict().ok())
                .cloned()
                .unwrap_or_default();
            names.set("Dests", Object::Reference(tree_id));
            catalog.set("Names", Object::Dictionary(names));
        }
    }

    debug!("Named destinations: {existing} existing, {added} added");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_dummy_pdf;

    #[test]
    fn names_are_sorted_bytewise() {
        let mut doc = create_dummy_pdf(3, "Page");
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let entries = [10, 2, 1].map(|n| (format!("page_{n}"), xyz_destination(pages[0], 792.0)));
        add_named_destinations(&mut doc, entries).unwrap();

        let names: Vec<Vec<u8>> = named_destinations(&doc).unwrap().into_keys().collect();
        assert_eq!(names, vec![b"page_1".to_vec(), b"page_10".to_vec(), b"page_2".to_vec()]);

        let tree = dests_tree(&doc).unwrap().unwrap();
        let flat = tree.get(b"Names").unwrap().as_array().unwrap();
        assert_eq!(flat.len(), 6);
    }

    #[test]
    fn existing_entries_are_merged_and_ours_win() {
        let mut doc = create_dummy_pdf(2, "Page");
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        add_named_destinations(
            &mut doc,
            [
                ("intro".to_string(), xyz_destination(pages[0], 700.0)),
                ("page_1".to_string(), xyz_destination(pages[0], 1.0)),
            ],
        )
        .unwrap();
        add_named_destinations(&mut doc, [("page_1".to_string(), xyz_destination(pages[1], 792.0))])
            .unwrap();

        let dests = named_destinations(&doc).unwrap();
        assert_eq!(dests.len(), 2);
        let page_1 = dests.get(b"page_1".as_slice()).unwrap().as_array().unwrap();
        assert_eq!(page_1[0].as_reference().unwrap(), pages[1]);
    }

    #[test]
    fn destination_array_layout() {
        let dest = xyz_destination((7, 0), 792.0);
        let arr = dest.as_array().unwrap();
        assert_eq!(arr.len(), 5);
        assert_eq!(arr[1].as_name().unwrap(), b"XYZ");
        assert!(matches!(arr[4], Object::Null));
    }
}
