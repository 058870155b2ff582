//! WASM bindings for PDF page color classification.
//!
//! Browsers hand over the uploaded file's bytes and get the page partition
//! back as a plain object. Only the embedded-image backend is available here.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use pagecolor_core::models::ClassifierConfig;
use pagecolor_core::{DocumentScanner, EmbeddedImageBackend, ScanResult};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Serialize)]
struct AnalysisOutput {
    color_pages: Vec<u32>,
    monochrome_pages: Vec<u32>,
    total_pages: u32,
    summary: String,
}

impl From<ScanResult> for AnalysisOutput {
    fn from(result: ScanResult) -> Self {
        let summary = result.summary();
        Self {
            color_pages: result.color_pages,
            monochrome_pages: result.monochrome_pages,
            total_pages: result.total_pages,
            summary,
        }
    }
}

fn run_scan(
    config: &ClassifierConfig,
    bytes: &[u8],
    on_progress: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let scanner =
        DocumentScanner::new(EmbeddedImageBackend::new()).with_classifier_config(config);

    let report = |done: u32, total: u32| {
        if let Some(callback) = &on_progress {
            // A throwing callback must not abort the scan.
            let _ = callback.call2(&JsValue::NULL, &JsValue::from(done), &JsValue::from(total));
        }
    };

    let result = scanner
        .scan_with_progress(bytes.to_vec(), &report)
        .map_err(|e| JsValue::from_str(&format!("An error occurred: {}", e)))?;

    serde_wasm_bindgen::to_value(&AnalysisOutput::from(result))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify every page of an uploaded PDF.
///
/// `on_progress(done, total)` is called after each page.
#[wasm_bindgen]
pub fn analyze_pdf(
    bytes: &[u8],
    on_progress: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    run_scan(&ClassifierConfig::default(), bytes, on_progress)
}

/// Render page numbers as compact ranges, e.g. "1-3, 5".
#[wasm_bindgen]
pub fn format_page_list(pages: Vec<u32>) -> String {
    pagecolor_core::format_page_list(pages)
}

/// Analyzer with adjustable classifier settings.
#[wasm_bindgen]
pub struct PageColorAnalyzer {
    config: ClassifierConfig,
}

#[wasm_bindgen]
impl PageColorAnalyzer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Largest channel difference still treated as gray.
    #[wasm_bindgen]
    pub fn set_channel_threshold(&mut self, threshold: u8) {
        self.config.channel_threshold = threshold;
    }

    #[wasm_bindgen]
    pub fn set_pixel_stride(&mut self, stride: usize) {
        self.config.pixel_stride = stride;
    }

    #[wasm_bindgen]
    pub fn analyze(
        &self,
        bytes: &[u8],
        on_progress: Option<js_sys::Function>,
    ) -> Result<JsValue, JsValue> {
        run_scan(&self.config, bytes, on_progress)
    }
}

impl Default for PageColorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
