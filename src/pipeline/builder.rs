use super::assembler::PdfAssembler;
use super::binder::LinkBinder;
use super::source::PdfSource;
use super::two_pass::TwoPass;
use crate::compose::PageComposer;
use crate::config::PrependConfig;
use crate::error::PrependError;
use crate::schema::{self, Specification};
use log::info;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Builds a document with generated pages in front of an existing PDF.
///
/// ```no_run
/// use pdf_prepender::DocumentBuilder;
///
/// let builder = DocumentBuilder::from_json_file("toc.json")?;
/// builder.build_to_file("report.pdf", "report-with-toc.pdf")?;
/// # Ok::<(), pdf_prepender::PrependError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    spec: Specification,
    config: PrependConfig,
}

impl DocumentBuilder {
    /// Validates `spec` before accepting it.
    pub fn new(spec: Specification) -> Result<Self, PrependError> {
        spec.validate()?;
        Ok(Self {
            spec,
            config: PrependConfig::default(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PrependError> {
        Self::new(schema::parse_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PrependError> {
        Self::new(schema::parse_file(path)?)
    }

    pub fn from_value(value: Value) -> Result<Self, PrependError> {
        Self::new(schema::parse_value(value)?)
    }

    pub fn with_config(mut self, config: PrependConfig) -> Self {
        self.config = config;
        self
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    fn composer(&self) -> Result<PageComposer<'_>, PrependError> {
        PageComposer::new(&self.spec, self.config.clone())
    }

    /// Number of pages the generated prefix will have.
    pub fn prepend_page_count(&self) -> Result<u32, PrependError> {
        Ok(TwoPass::new(self.composer()?).count()?.prefix_pages())
    }

    /// Returns the finished document.
    pub fn build<'a>(&self, original: impl Into<PdfSource<'a>>) -> Result<Vec<u8>, PrependError> {
        let original = original.into().into_bytes()?;

        let resolved = TwoPass::new(self.composer()?).count()?;
        let prefix = resolved.render()?;

        let merged = PdfAssembler::new().merge(&prefix.bytes, &original)?;
        info!("[MERGE] Document has {} page(s).", merged.page_count);

        let binder = LinkBinder::new().with_compression(self.config.compress);
        let (bytes, _) = binder.attach(&merged.bytes, &prefix.anchors)?;
        Ok(bytes)
    }

    pub fn build_into<'a, W: Write>(&self, original: impl Into<PdfSource<'a>>, mut writer: W) -> Result<(), PrependError> {
        let bytes = self.build(original)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the finished document to `output`. Nothing is written there unless the build succeeds.
    pub fn build_to_file(&self, original: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), PrependError> {
        let output = output.as_ref();
        let bytes = self.build(original.as_ref())?;

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(output).map_err(|e| e.error)?;
        info!("Wrote {} bytes to {}", bytes.len(), output.display());
        Ok(())
    }
}

/// Reads a JSON specification from `spec_path` and prepends its pages to `original`.
pub fn prepend_pages(
    spec_path: impl AsRef<Path>,
    original: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<(), PrependError> {
    DocumentBuilder::from_json_file(spec_path)?.build_to_file(original, output)
}
