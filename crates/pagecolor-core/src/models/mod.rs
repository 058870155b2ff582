//! Data models shared by the classifier, scanner and front ends.

pub mod config;
pub mod raster;
pub mod scan;

pub use config::{AnalyzerConfig, BackendKind, ClassifierConfig, RenderConfig};
pub use raster::{ColorModel, ColorSpaceInfo, PixelRaster};
pub use scan::ScanResult;

use serde::{Deserialize, Serialize};

/// 0-based position of a page inside a document.
pub type PageIndex = u32;

/// 1-based page number, used for display and aggregation.
pub type PageNumber = u32;

/// Convert a page index to the page number shown to users.
pub const fn page_number(index: PageIndex) -> PageNumber {
    index + 1
}

/// Verdict for a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// At least one sampled pixel carries chromatic variation.
    Color,
    /// Grayscale, indexed, or no sampled pixel above the threshold.
    Monochrome,
}

impl Classification {
    /// Whether the page needs color printing.
    pub fn is_color(self) -> bool {
        self == Self::Color
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Color => f.write_str("color"),
            Self::Monochrome => f.write_str("black and white"),
        }
    }
}
