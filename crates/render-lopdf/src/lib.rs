//! Typesetter for the generated prefix pages.
//!
//! Takes a flat list of [`FlowItem`]s, breaks paragraphs into lines, paginates them and
//! writes a standalone PDF with lopdf. Alongside the bytes it reports where every line
//! ended up so callers can place annotations over the rendered text.

mod error;
mod flow;
mod page;
mod typesetter;
mod wrapper;

pub use error::RenderError;
pub use flow::{FlowItem, FontVariant, Paragraph, ParagraphStyle, TextAlign, TextRun, WrapMode};
pub use typesetter::{ParagraphPlacement, PlacedLine, TypesetDocument, Typesetter};
pub use wrapper::{break_lines, LineItem, LineLayout};
