//! The build-scoped registry of links into the original document.
//!
//! Composition asks for the target of every link it emits through [`LinkTargets`]. During the
//! counting pass the [`LinkTable`] registers each request; once the prefix page count is known
//! the offset is set and the table is read through [`ResolvedLinks`], which never registers.

use crate::error::PrependError;

/// One link occurrence. `adjusted_page` stays `None` until an offset has been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRecord {
    pub original_page: u32,
    pub adjusted_page: Option<u32>,
}

/// Supplies the final page number a link should point at.
pub trait LinkTargets {
    fn target_for(&mut self, original_page: u32) -> u32;
}

#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    records: Vec<LinkRecord>,
    offset: u32,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unresolved record. Repeated pages get independent records.
    pub fn register(&mut self, original_page: u32) -> LinkRecord {
        let record = LinkRecord {
            original_page,
            adjusted_page: None,
        };
        self.records.push(record);
        record
    }

    /// Sets the prefix page count and re-resolves every record in place.
    ///
    /// Fails without touching the table if some registered page cannot be shifted by `count`.
    pub fn set_offset(&mut self, count: u32) -> Result<(), PrependError> {
        if let Some(record) = self.records.iter().find(|r| r.original_page.checked_add(count).is_none()) {
            return Err(PrependError::TargetPageOutOfRange {
                page: record.original_page,
                offset: count,
            });
        }
        self.offset = count;
        for record in &mut self.records {
            record.adjusted_page = Some(record.original_page + count);
        }
        Ok(())
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Saturates for pages the table never registered; such targets land past the document.
    pub fn adjusted_page(&self, original_page: u32) -> u32 {
        original_page.saturating_add(self.offset)
    }

    pub fn destination_name(&self, original_page: u32) -> String {
        destination_name(self.adjusted_page(original_page))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.offset = 0;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    /// Destination names for every page of a document with `total_pages` pages.
    pub fn destinations_for(total_pages: u32) -> Vec<String> {
        (1..=total_pages).map(destination_name).collect()
    }
}

impl LinkTargets for LinkTable {
    fn target_for(&mut self, original_page: u32) -> u32 {
        self.register(original_page);
        self.adjusted_page(original_page)
    }
}

/// Read-only view of a resolved table.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLinks<'a> {
    table: &'a LinkTable,
}

impl<'a> ResolvedLinks<'a> {
    pub fn new(table: &'a LinkTable) -> Self {
        Self { table }
    }

    pub fn offset(&self) -> u32 {
        self.table.offset()
    }
}

impl LinkTargets for ResolvedLinks<'_> {
    fn target_for(&mut self, original_page: u32) -> u32 {
        self.table.adjusted_page(original_page)
    }
}

/// `page_<n>` for a final 1-based page number.
pub fn destination_name(page: u32) -> String {
    format!("page_{page}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_page_is_original_plus_offset() {
        let mut table = LinkTable::new();
        for page in [1, 3, 3, 10] {
            table.register(page);
        }
        assert!(table.records().iter().all(|r| r.adjusted_page.is_none()));

        for offset in [0, 1, 2, 7] {
            table.set_offset(offset).unwrap();
            for record in table.records() {
                assert_eq!(record.adjusted_page, Some(record.original_page + offset));
                assert_eq!(table.adjusted_page(record.original_page), record.original_page + offset);
            }
        }
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn adjusted_page_works_before_registration() {
        let mut table = LinkTable::new();
        table.set_offset(1).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.adjusted_page(3), 4);
        assert_eq!(table.destination_name(3), "page_4");
    }

    #[test]
    fn resolved_view_does_not_register() {
        let mut table = LinkTable::new();
        assert_eq!(table.target_for(5), 5);
        assert_eq!(table.target_for(7), 7);
        table.set_offset(2).unwrap();

        let mut view = ResolvedLinks::new(&table);
        assert_eq!(view.target_for(5), 7);
        assert_eq!(view.target_for(7), 9);
        assert_eq!(view.offset(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn clear_resets_records_and_offset() {
        let mut table = LinkTable::new();
        table.register(2);
        table.set_offset(4).unwrap();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.offset(), 0);
        assert_eq!(table.adjusted_page(2), 2);
    }

    #[test]
    fn offset_that_overflows_a_target_is_rejected() {
        let mut table = LinkTable::new();
        table.register(3);
        table.register(u32::MAX);
        let err = table.set_offset(1).unwrap_err();
        assert!(matches!(
            err,
            PrependError::TargetPageOutOfRange { page: u32::MAX, offset: 1 }
        ));
        assert_eq!(table.offset(), 0);
        assert!(table.records().iter().all(|r| r.adjusted_page.is_none()));
        table.set_offset(0).unwrap();
    }

    #[test]
    fn unregistered_pages_saturate() {
        let mut table = LinkTable::new();
        table.set_offset(5).unwrap();
        assert_eq!(table.adjusted_page(u32::MAX - 1), u32::MAX);
    }

    #[test]
    fn destinations_cover_every_page() {
        assert_eq!(LinkTable::destinations_for(3), vec!["page_1", "page_2", "page_3"]);
        assert!(LinkTable::destinations_for(0).is_empty());
    }
}
