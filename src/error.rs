use prepender_pdf_composer::ComposerError;
use prepender_render_lopdf::RenderError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One problem found while validating a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Location of the offending value, e.g. `pages -> 0 -> content -> 1 -> content`.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every problem found in a specification, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True if some error was reported at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors that abort a build.
#[derive(Error, Debug)]
pub enum PrependError {
    #[error("Specification is invalid: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed or unsupported PDF input, passed through as reported by lopdf.
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    #[error("PDF composition failed: {0}")]
    Compose(ComposerError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Link target page {page} cannot be shifted by {offset} prepended page(s)")]
    TargetPageOutOfRange { page: u32, offset: u32 },

    #[error("Invalid text marker: {0}")]
    Marker(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ComposerError> for PrependError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::Pdf(e) => PrependError::Pdf(e),
            other => PrependError::Compose(other),
        }
    }
}
