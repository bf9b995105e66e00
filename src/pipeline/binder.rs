//! Turns anchor positions into clickable links in the merged document.

use crate::compose::AnchorPosition;
use crate::error::PrependError;
use log::{debug, info, warn};
use lopdf::{Document, ObjectId};
use prepender_pdf_composer::{
    find_text, insert_goto_link, media_box, ordered_page_ids, page_text_lines, xyz_destination, ComposerError, TextLine,
};
use prepender_types::Rect;
use std::collections::HashMap;

/// What happened to the anchors of one [`LinkBinder::attach`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindSummary {
    pub attached: usize,
    /// Attached over text found on the page.
    pub via_search: usize,
    /// Attached over the estimated rectangle.
    pub via_fallback: usize,
    /// Source or target page outside the document.
    pub skipped: usize,
    /// Annotation insertion failed.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Search,
    Fallback,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkBinder {
    compress: bool,
}

impl LinkBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Adds one link per anchor. Anchors that cannot be attached are logged and left out; only
    /// failing to read or write the document as a whole is an error.
    pub fn attach(&self, merged: &[u8], anchors: &[AnchorPosition]) -> Result<(Vec<u8>, BindSummary), PrependError> {
        let mut summary = BindSummary::default();
        if anchors.is_empty() && !self.compress {
            return Ok((merged.to_vec(), summary));
        }

        let mut doc = Document::load_mem(merged)?;
        let page_ids = ordered_page_ids(&doc);
        let total = page_ids.len();
        let mut text = PageText::default();

        for anchor in anchors {
            let target_index = (anchor.target_page as usize).wrapping_sub(1);
            if anchor.page_index >= total || target_index >= total {
                warn!(
                    "Skipping link '{}': page {} -> target {} outside a {total}-page document",
                    anchor.text,
                    anchor.page_index + 1,
                    anchor.target_page
                );
                summary.skipped += 1;
                continue;
            }
            match attach_one(&mut doc, &mut text, page_ids[anchor.page_index], page_ids[target_index], anchor) {
                Ok(placement) => {
                    summary.attached += 1;
                    match placement {
                        Placement::Search => summary.via_search += 1,
                        Placement::Fallback => summary.via_fallback += 1,
                    }
                }
                Err(e) => {
                    warn!("Could not add link '{}' on page {}: {e}", anchor.text, anchor.page_index + 1);
                    summary.failed += 1;
                }
            }
        }

        if self.compress {
            doc.compress();
        }
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        info!(
            "Attached {} of {} link(s) ({} by search, {} estimated, {} skipped, {} failed)",
            summary.attached,
            anchors.len(),
            summary.via_search,
            summary.via_fallback,
            summary.skipped,
            summary.failed
        );
        Ok((bytes, summary))
    }
}

/// Text lines of each page, decoded the first time an anchor on that page needs them.
/// Annotations never touch content streams, so entries stay valid while links are added.
#[derive(Debug, Default)]
struct PageText {
    pages: HashMap<ObjectId, Option<Vec<TextLine>>>,
}

impl PageText {
    fn lines(&mut self, doc: &Document, page_id: ObjectId) -> Option<&[TextLine]> {
        self.pages
            .entry(page_id)
            .or_insert_with(|| match page_text_lines(doc, page_id) {
                Ok(lines) => Some(lines),
                Err(e) => {
                    debug!("Could not read text on page {page_id:?}: {e}");
                    None
                }
            })
            .as_deref()
    }
}

fn attach_one(
    doc: &mut Document,
    text: &mut PageText,
    page_id: ObjectId,
    target_id: ObjectId,
    anchor: &AnchorPosition,
) -> Result<Placement, ComposerError> {
    let (rect, placement) = match locate(text, doc, page_id, anchor) {
        Some(rect) => (rect, Placement::Search),
        None => (anchor.rect, Placement::Fallback),
    };
    let top = media_box(doc, target_id)?.top();
    insert_goto_link(doc, page_id, rect, xyz_destination(target_id, top))?;
    debug!("Linked '{}' at {rect:?} ({placement:?})", anchor.text);
    Ok(placement)
}

/// The rectangle of the anchor text on its page, if the text can be found there.
fn locate(text: &mut PageText, doc: &Document, page_id: ObjectId, anchor: &AnchorPosition) -> Option<Rect> {
    if anchor.text.is_empty() {
        return None;
    }
    let lines = text.lines(doc, page_id)?;
    nearest(&find_text(lines, &anchor.text), anchor.rect.y)
}

/// The candidate whose bottom edge is closest to `estimated_bottom`; the first one wins ties.
fn nearest(candidates: &[Rect], estimated_bottom: f32) -> Option<Rect> {
    let (first, rest) = candidates.split_first()?;
    let mut best = *first;
    let mut best_distance = (first.y - estimated_bottom).abs();
    for rect in rest {
        let distance = (rect.y - estimated_bottom).abs();
        if distance < best_distance {
            best = *rect;
            best_distance = distance;
        }
    }
    Some(best)
}
