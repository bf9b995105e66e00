//! The two composition passes that resolve link targets.
//!
//! The prefix length is only known once the prefix has been laid out, but the links inside it
//! must already point past it. [`TwoPass<Counting>`] lays the prefix out once to learn its page
//! count; [`TwoPass<Resolved>`] lays it out again with the offset applied. Anchors from the
//! counting pass are dropped inside [`TwoPass::count`] and never reach the caller.

use crate::compose::{ComposedPrefix, PageComposer};
use crate::error::PrependError;
use crate::links::{LinkTable, ResolvedLinks};
use log::{info, warn};
use std::marker::PhantomData;

/// Link targets are not yet known.
#[derive(Debug)]
pub struct Counting;

/// The prefix page count is known and the link table carries the offset.
#[derive(Debug)]
pub struct Resolved;

#[derive(Debug)]
pub struct TwoPass<'s, P> {
    composer: PageComposer<'s>,
    links: LinkTable,
    prefix_pages: u32,
    _phase: PhantomData<P>,
}

impl<'s> TwoPass<'s, Counting> {
    pub fn new(composer: PageComposer<'s>) -> Self {
        Self {
            composer,
            links: LinkTable::new(),
            prefix_pages: 0,
            _phase: PhantomData,
        }
    }

    /// Runs the counting pass and applies the resulting offset to the link table.
    pub fn count(mut self) -> Result<TwoPass<'s, Resolved>, PrependError> {
        info!("[PASS 1] Laying out prefix to count its pages.");
        let ComposedPrefix { page_count, .. } = self.composer.compose(&mut self.links)?;
        self.links.set_offset(page_count)?;
        info!(
            "[PASS 1] Prefix has {page_count} page(s); {} link(s) registered.",
            self.links.len()
        );
        Ok(TwoPass {
            composer: self.composer,
            links: self.links,
            prefix_pages: page_count,
            _phase: PhantomData,
        })
    }
}

impl<'s> TwoPass<'s, Resolved> {
    pub fn prefix_pages(&self) -> u32 {
        self.prefix_pages
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Lays the prefix out again with final link targets.
    pub fn render(self) -> Result<ComposedPrefix, PrependError> {
        info!("[PASS 2] Rendering prefix with offset {}.", self.prefix_pages);
        let prefix = self.composer.compose(&mut ResolvedLinks::new(&self.links))?;
        if prefix.page_count != self.prefix_pages {
            warn!(
                "[PASS 2] Prefix page count changed from {} to {}; link targets may be off.",
                self.prefix_pages, prefix.page_count
            );
        }
        info!("[PASS 2] Rendered {} anchor(s).", prefix.anchors.len());
        Ok(prefix)
    }
}
