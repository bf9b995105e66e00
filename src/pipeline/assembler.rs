use super::source::PdfSource;
use crate::error::PrependError;
use crate::links::destination_name;
use log::{debug, info};
use lopdf::Document;
use prepender_pdf_composer::{add_named_destinations, media_box, ordered_page_ids, prepend_document, xyz_destination};

/// The prefix and the original joined into one document.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    pub bytes: Vec<u8>,
    pub page_count: u32,
}

/// Joins prefix pages and original pages and names every page of the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfAssembler;

impl PdfAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Puts `prefix` in front of `original` and adds a `page_<n>` destination for every page.
    pub fn merge(&self, prefix: &[u8], original: &[u8]) -> Result<MergedDocument, PrependError> {
        let prefix = Document::load_mem(prefix)?;
        let mut doc = Document::load_mem(original)?;
        let original_pages = doc.get_pages().len();

        let inserted = prepend_document(&mut doc, &prefix)?;

        let page_ids = ordered_page_ids(&doc);
        let mut destinations = Vec::with_capacity(page_ids.len());
        for (i, page_id) in page_ids.iter().enumerate() {
            let top = media_box(&doc, *page_id)?.top();
            destinations.push((destination_name(i as u32 + 1), xyz_destination(*page_id, top)));
        }
        let named = add_named_destinations(&mut doc, destinations)?;
        debug!("Added {named} named destination(s)");

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        info!(
            "Merged {} prefix page(s) with {} original page(s)",
            inserted.len(),
            original_pages
        );
        Ok(MergedDocument {
            bytes,
            page_count: page_ids.len() as u32,
        })
    }

    /// Number of pages in a document.
    pub fn page_count<'a>(source: impl Into<PdfSource<'a>>) -> Result<u32, PrependError> {
        let bytes = source.into().into_bytes()?;
        Ok(Document::load_mem(&bytes)?.get_pages().len() as u32)
    }
}
