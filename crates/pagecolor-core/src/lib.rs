//! Core library for PDF page color classification.
//!
//! This crate provides:
//! - Page rasterization behind the [`RasterBackend`] contract (pdfium or embedded images)
//! - Stride-sampling color/monochrome classification of page rasters
//! - Whole-document scanning with per-page progress and cancellation
//! - Compact page-range formatting ("1-3, 5, 7-8") and result summaries

pub mod classify;
pub mod error;
pub mod models;
pub mod pdf;
pub mod ranges;
pub mod report;
pub mod scan;

pub use classify::{ColorClassifier, classify};
pub use error::{PageColorError, PdfError, Result};
pub use models::{
    AnalyzerConfig, BackendKind, Classification, ColorSpaceInfo, PageIndex, PageNumber,
    PixelRaster, ScanResult,
};
pub use pdf::{DocumentSource, EmbeddedImageBackend, PageRasterizer, RasterBackend};
pub use ranges::{PageRun, format_page_list, page_runs};
pub use scan::{CancelFlag, DocumentScanner, ScanProgress};

#[cfg(feature = "pdfium")]
pub use pdf::PdfiumBackend;
