//! Prepends generated pages to an existing PDF with links that point into the original.
//!
//! The generated prefix shifts every original page back by its own length, which is only known
//! after the prefix has been laid out. The build therefore composes the prefix twice: once to
//! count its pages and once with link targets offset by that count. The prefix is then merged
//! in front of the original, every page gets a `page_<n>` named destination, and each link is
//! bound to its text on the page.

pub mod compose;
pub mod config;
pub mod error;
pub mod links;
pub mod markup;
pub mod pipeline;
pub mod schema;

pub use compose::{AnchorPosition, ComposedPrefix, PageComposer};
pub use config::PrependConfig;
pub use error::{FieldError, PrependError, ValidationErrors};
pub use links::{destination_name, LinkRecord, LinkTable, LinkTargets, ResolvedLinks};
pub use markup::{FormattedText, MarkerFormatter, Span};
pub use pipeline::{
    prepend_pages, BindSummary, DocumentBuilder, LinkBinder, MergedDocument, PdfAssembler, PdfSource, TwoPass,
};
pub use schema::Specification;
