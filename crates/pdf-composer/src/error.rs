use lopdf::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("page index {index} is out of range for a document with {page_count} page(s)")]
    PageOutOfRange { index: usize, page_count: usize },

    #[error("object {0:?} is not a valid page")]
    InvalidPage(ObjectId),

    #[error("{0}")]
    Other(String),
}
