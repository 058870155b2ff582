//! Whole-document scanning: render, classify and aggregate every page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use crate::classify::ColorClassifier;
use crate::error::{PageColorError, Result};
use crate::models::{ClassifierConfig, ScanResult, page_number};
use crate::pdf::{DocumentSource, PageRasterizer, RasterBackend};

/// Receives `(pages_completed, total_pages)` after each classified page.
pub trait ScanProgress {
    fn page_done(&self, completed: u32, total: u32);
}

impl<F> ScanProgress for F
where
    F: Fn(u32, u32),
{
    fn page_done(&self, completed: u32, total: u32) {
        self(completed, total)
    }
}

/// Shared flag that stops a running scan before its next page.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Classifies every page of a document opened through a [`RasterBackend`].
pub struct DocumentScanner<B> {
    backend: B,
    classifier: ColorClassifier,
    cancel: Option<CancelFlag>,
}

impl<B: RasterBackend> DocumentScanner<B> {
    /// Create a scanner with the reference classifier.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            classifier: ColorClassifier::new(),
            cancel: None,
        }
    }

    /// Use classifier parameters from configuration.
    pub fn with_classifier_config(mut self, config: &ClassifierConfig) -> Self {
        self.classifier = ColorClassifier::from_config(config);
        self
    }

    /// Check `flag` before each page.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan a document without progress reporting.
    pub fn scan(&self, source: impl Into<DocumentSource>) -> Result<ScanResult> {
        self.scan_with_progress(source, &|_: u32, _: u32| {})
    }

    /// Scan a document, reporting progress once per classified page.
    ///
    /// Any open or render failure aborts the scan; no partial result is
    /// returned. A readable document without pages yields an empty result.
    pub fn scan_with_progress(
        &self,
        source: impl Into<DocumentSource>,
        progress: &dyn ScanProgress,
    ) -> Result<ScanResult> {
        let document = self.backend.open(source.into())?;
        let total = document.page_count();
        debug!("Scanning {} pages", total);

        let mut result = ScanResult::empty();
        for index in 0..total {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                info!("Scan cancelled after {} of {} pages", index, total);
                return Err(PageColorError::Cancelled {
                    completed: index,
                    total,
                });
            }

            let page = page_number(index);
            let raster = document.render_page(index)?;
            let classification = self.classifier.classify(&raster);
            drop(raster);

            debug!("Page {}: {}", page, classification);
            result.record(page, classification);
            progress.page_done(page, total);
        }

        info!(
            "Scanned {} pages: {} color, {} black and white",
            result.total_pages,
            result.color_count(),
            result.monochrome_count()
        );
        Ok(result)
    }

    /// Scan a document, logging any failure and returning the empty result instead.
    pub fn scan_or_empty(&self, source: impl Into<DocumentSource>) -> ScanResult {
        match self.scan(source) {
            Ok(result) => result,
            Err(e) => {
                error!("An error occurred: {}", e);
                ScanResult::empty()
            }
        }
    }
}
