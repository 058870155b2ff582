//! PDF opening and page rasterization.

mod embedded;
#[cfg(feature = "pdfium")]
mod pdfium;

pub use embedded::{EmbeddedImageBackend, EmbeddedImageDocument};
#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumBackend, PdfiumDocument};

use std::path::{Path, PathBuf};

use crate::error::PdfError;
use crate::models::{PageIndex, PixelRaster};

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Where a document comes from: a file picked on disk or an uploaded buffer.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl DocumentSource {
    /// Read the whole document into memory.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Path(path) => std::fs::read(&path)
                .map_err(|e| PdfError::Open(format!("{}: {}", path.display(), e))),
            Self::Bytes(bytes) => Ok(bytes),
        }
    }

    /// Short description for log messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// An open document that can render its pages.
pub trait PageRasterizer {
    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Render a page to a raster without alpha.
    fn render_page(&self, index: PageIndex) -> Result<PixelRaster>;
}

/// Opens documents for rasterization.
pub trait RasterBackend {
    /// The open document; dropping it releases the underlying handle.
    type Document<'a>: PageRasterizer
    where
        Self: 'a;

    /// Open a document from a path or buffer.
    fn open(&self, source: DocumentSource) -> Result<Self::Document<'_>>;
}
