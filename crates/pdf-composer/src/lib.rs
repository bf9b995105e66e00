//! PDF composition utilities built on lopdf:
//! - Deep object copying and page prepending
//! - Named destinations in the catalog name tree
//! - GoTo link annotations
//! - Positioned text search

mod annotate;
mod destinations;
mod error;
mod merge;
mod pages;
mod search;
#[cfg(test)]
mod test_support;

pub use annotate::insert_goto_link;
pub use destinations::{add_named_destinations, named_destinations, xyz_destination};
pub use error::ComposerError;
pub use merge::prepend_document;
pub use pages::{inherited_attribute, media_box, ordered_page_ids, page_id_at};
pub use search::{find_text, page_text_lines, TextLine};
