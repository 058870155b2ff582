//! Configuration structures for page analysis.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PageColorError, Result};

/// Main configuration for the pagecolor pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Color classifier configuration.
    pub classifier: ClassifierConfig,

    /// Page rendering configuration.
    pub render: RenderConfig,
}

/// Sampling parameters of the color classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Sample every n-th pixel.
    pub pixel_stride: usize,

    /// Largest channel difference still considered gray (0 - 255).
    pub channel_threshold: u8,

    /// Rasters with fewer channels are never color.
    pub min_color_channels: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pixel_stride: 10,
            channel_threshold: 5,
            min_color_channels: 3,
        }
    }
}

/// Which rasterizer renders the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Full page rendering through the pdfium library.
    Pdfium,
    /// Pure Rust approximation from the page's embedded images.
    Embedded,
}

/// Page rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rasterizer to use.
    pub backend: BackendKind,

    /// DPI for rendering PDF pages to rasters.
    pub dpi: u32,

    /// Directory containing the pdfium shared library (system search path if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Pdfium,
            dpi: 72,
            pdfium_library_dir: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PageColorError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PageColorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.render.dpi == 0 {
            return Err(PageColorError::Config("render.dpi must be positive".to_string()));
        }
        if self.classifier.min_color_channels == 0 {
            return Err(PageColorError::Config(
                "classifier.min_color_channels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_reference_heuristic() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.classifier.pixel_stride, 10);
        assert_eq!(config.classifier.channel_threshold, 5);
        assert_eq!(config.classifier.min_color_channels, 3);
        assert_eq!(config.render.dpi, 72);
        assert_eq!(config.render.backend, BackendKind::Pdfium);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"render": {"backend": "embedded"}}"#).unwrap();
        assert_eq!(config.render.backend, BackendKind::Embedded);
        assert_eq!(config.render.dpi, 72);
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_dpi() {
        let mut config = AnalyzerConfig::default();
        config.render.dpi = 0;
        assert!(matches!(config.validate(), Err(PageColorError::Config(_))));
    }
}
