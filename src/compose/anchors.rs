use prepender_render_lopdf::ParagraphPlacement;
use prepender_types::Rect;
use std::ops::Range;

/// Where a rendered link landed in the prefix, and where it should go.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPosition {
    /// Zero-based page within the prefix.
    pub page_index: usize,
    /// Final 1-based page in the merged document.
    pub target_page: u32,
    /// The link text exactly as drawn, used to find it again on the page.
    pub text: String,
    /// Estimated link area in PDF user space.
    pub rect: Rect,
}

/// A link emitted into a paragraph, before layout.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingLink {
    pub flow_index: usize,
    pub text: String,
    pub target_page: u32,
    /// Character range within the paragraph's plain text.
    pub chars: Range<usize>,
}

/// Estimates the link area from the line that holds the link's first character, assuming every
/// character on that line is equally wide.
pub(crate) fn estimate(placement: &ParagraphPlacement, link: &PendingLink, min_width: f32) -> Option<AnchorPosition> {
    let line = placement.line_containing(link.chars.start)?;
    let avg = if line.char_count() == 0 {
        0.0
    } else {
        line.rect.width / line.char_count() as f32
    };
    let lead = link.chars.start.saturating_sub(line.chars.start) as f32;
    let width = (link.chars.len() as f32 * avg).max(min_width);
    Some(AnchorPosition {
        page_index: line.page_index,
        target_page: link.target_page,
        text: link.text.clone(),
        rect: Rect::new(line.rect.x + lead * avg, line.rect.y, width, line.rect.height),
    })
}
