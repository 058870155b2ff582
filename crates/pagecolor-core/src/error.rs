//! Error types for the pagecolor-core library.

use thiserror::Error;

use crate::models::PageNumber;

/// Main error type for the pagecolor library.
#[derive(Error, Debug)]
pub enum PageColorError {
    /// PDF opening or rendering error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scan was cancelled before every page was classified.
    #[error("scan cancelled after {completed} of {total} pages")]
    Cancelled { completed: u32, total: u32 },
}

/// Errors related to opening and rasterizing PDF documents.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the document (missing file, corruption, wrong format).
    #[error("failed to open PDF: {0}")]
    Open(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// A page could not be rasterized.
    #[error("failed to render page {page}: {reason}")]
    Render { page: PageNumber, reason: String },

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(PageNumber),

    /// The rasterizer library could not be loaded.
    #[error("rasterizer unavailable: {0}")]
    BackendUnavailable(String),
}

impl PdfError {
    pub(crate) fn render(page: PageNumber, reason: impl Into<String>) -> Self {
        Self::Render {
            page,
            reason: reason.into(),
        }
    }
}

/// Result type for the pagecolor library.
pub type Result<T> = std::result::Result<T, PageColorError>;
