#![allow(dead_code)]

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use prepender_pdf_composer::{named_destinations, page_text_lines};
use std::collections::{BTreeMap, HashMap};

/// Text of one page (1-based), one visual line per output line
pub fn page_text(doc: &LopdfDocument, page_num: u32) -> String {
    let Some(page_id) = doc.get_pages().get(&page_num).copied() else {
        return String::new();
    };
    page_text_lines(doc, page_id)
        .map(|lines| lines.into_iter().map(|l| l.text).collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    for page_num in 1..=doc.get_pages().len() as u32 {
        text.push_str(&page_text(doc, page_num));
        text.push('\n');
    }
    text
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn page_numbers(doc: &LopdfDocument) -> HashMap<ObjectId, u32> {
    doc.get_pages().into_iter().map(|(n, id)| (id, n)).collect()
}

/// A `/Link` annotation with a `/GoTo` action
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// Page the annotation sits on (1-based)
    pub page: u32,
    pub rect: [f32; 4],
    /// Page the destination points at (1-based)
    pub target_page: Option<u32>,
    /// The `top` of an `/XYZ` destination
    pub target_top: Option<f32>,
}

/// Extract GoTo link annotations from PDF pages, in page order
pub fn extract_link_annotations(doc: &LopdfDocument) -> Vec<LinkAnnotation> {
    let numbers = page_numbers(doc);
    let mut annotations = Vec::new();

    for (page_num, page_id) in doc.get_pages() {
        let Ok(page_dict) = doc.get_dictionary(page_id) else { continue };
        let Some(annots) = page_dict.get(b"Annots").ok().and_then(|a| resolve(doc, a)) else {
            continue;
        };
        let Ok(annots) = annots.as_array() else { continue };

        for annot in annots {
            let Some(Ok(annot)) = resolve(doc, annot).map(Object::as_dict) else { continue };
            if annot.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Link".as_slice()) {
                continue;
            }
            let Some(Ok(action)) = annot.get(b"A").ok().and_then(|a| resolve(doc, a)).map(Object::as_dict)
            else {
                continue;
            };
            if action.get(b"S").and_then(Object::as_name).ok() != Some(b"GoTo".as_slice()) {
                continue;
            }
            let dest = action
                .get(b"D")
                .ok()
                .and_then(|d| resolve(doc, d))
                .and_then(|d| d.as_array().ok());
            let target_page = dest
                .and_then(|d| d.first())
                .and_then(|r| r.as_reference().ok())
                .and_then(|id| numbers.get(&id).copied());
            let target_top = dest.and_then(|d| d.get(3)).and_then(number);

            let rect = annot
                .get(b"Rect")
                .ok()
                .and_then(|r| r.as_array().ok())
                .map(|r| r.iter().filter_map(number).collect::<Vec<_>>())
                .filter(|r| r.len() == 4)
                .map(|r| [r[0], r[1], r[2], r[3]])
                .unwrap_or_default();

            annotations.push(LinkAnnotation {
                page: page_num,
                rect,
                target_page,
                target_top,
            });
        }
    }
    annotations
}

/// Count internal links in the PDF
pub fn count_internal_links(doc: &LopdfDocument) -> usize {
    extract_link_annotations(doc).len()
}

/// Named destinations mapped to the 1-based page they point at
pub fn named_destination_pages(doc: &LopdfDocument) -> BTreeMap<String, u32> {
    let numbers = page_numbers(doc);
    named_destinations(doc)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, dest)| {
            let page = resolve(doc, &dest)?
                .as_array()
                .ok()?
                .first()?
                .as_reference()
                .ok()
                .and_then(|id| numbers.get(&id).copied())?;
            Some((String::from_utf8_lossy(&name).into_owned(), page))
        })
        .collect()
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that a page contains specific text
#[macro_export]
macro_rules! assert_page_contains_text {
    ($pdf:expr, $page:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::page_text(&$pdf.doc, $page);
        assert!(
            extracted.contains($text),
            "Page {} should contain '{}', but extracted text was:\n{}",
            $page,
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF has a specific number of internal links
#[macro_export]
macro_rules! assert_pdf_internal_link_count {
    ($pdf:expr, $count:expr) => {
        let link_count = $crate::common::pdf_assertions::count_internal_links(&$pdf.doc);
        assert_eq!(
            link_count, $count,
            "Expected {} internal links, got {}",
            $count, link_count
        );
    };
}
