use crate::error::PrependError;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// An original document, from wherever it lives.
pub enum PdfSource<'a> {
    Path(PathBuf),
    Bytes(&'a [u8]),
    Reader(Box<dyn Read + 'a>),
}

impl<'a> PdfSource<'a> {
    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        PdfSource::Reader(Box::new(reader))
    }

    /// Reads the whole document into memory.
    pub fn into_bytes(self) -> Result<Vec<u8>, PrependError> {
        match self {
            PdfSource::Path(path) => {
                if !path.exists() {
                    return Err(PrependError::NotFound(path));
                }
                Ok(fs::read(&path)?)
            }
            PdfSource::Bytes(bytes) => Ok(bytes.to_vec()),
            PdfSource::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

impl<'a> From<&'a [u8]> for PdfSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        PdfSource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for PdfSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        PdfSource::Bytes(bytes)
    }
}

impl From<&Path> for PdfSource<'_> {
    fn from(path: &Path) -> Self {
        PdfSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for PdfSource<'_> {
    fn from(path: PathBuf) -> Self {
        PdfSource::Path(path)
    }
}

impl std::fmt::Debug for PdfSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            PdfSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            PdfSource::Reader(_) => f.write_str("Reader"),
        }
    }
}
