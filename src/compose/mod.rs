//! Layout of the prefix pages and the link anchors inside them.

mod anchors;
mod composer;
pub mod styles;

pub use anchors::AnchorPosition;
pub use composer::{ComposedPrefix, PageComposer};
pub use styles::StyleSheet;
