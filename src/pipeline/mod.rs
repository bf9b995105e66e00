//! The build pipeline: count, resolve, render, merge, annotate.

pub mod assembler;
pub mod binder;
pub mod builder;
pub mod source;
pub mod two_pass;

pub use assembler::{MergedDocument, PdfAssembler};
pub use binder::{BindSummary, LinkBinder};
pub use builder::{prepend_pages, DocumentBuilder};
pub use source::PdfSource;
pub use two_pass::{Counting, Resolved, TwoPass};
