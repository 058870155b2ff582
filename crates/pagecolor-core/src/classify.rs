//! Color/monochrome classification by sparse pixel sampling.
//!
//! The classifier walks the leading RGB triplet of every n-th pixel and calls
//! a page color as soon as one sampled pixel has two channels further apart
//! than the threshold. It is a heuristic: a color feature that falls entirely
//! between sampled pixels goes unnoticed.

use tracing::trace;

use crate::models::{Classification, ClassifierConfig, ColorSpaceInfo, PixelRaster};

/// Samples occupied by the leading R, G, B channels of a pixel.
const RGB_TRIPLET: usize = 3;

/// Stride-sampling color classifier.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    pixel_stride: usize,
    threshold: u8,
    min_channels: u8,
}

impl ColorClassifier {
    /// Create a classifier with the reference parameters (every 10th pixel, threshold 5).
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    /// Create a classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            pixel_stride: config.pixel_stride.max(1),
            threshold: config.channel_threshold,
            min_channels: config.min_color_channels,
        }
    }

    /// Set the pixel stride.
    pub fn with_pixel_stride(mut self, stride: usize) -> Self {
        self.pixel_stride = stride.max(1);
        self
    }

    /// Set the channel difference threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Classify a rendered page.
    pub fn classify(&self, raster: &PixelRaster) -> Classification {
        self.classify_samples(raster.samples(), raster.color_space())
    }

    /// Classify raw interleaved samples described by `color_space`.
    pub fn classify_samples(
        &self,
        samples: &[u8],
        color_space: Option<ColorSpaceInfo>,
    ) -> Classification {
        let Some(color_space) = color_space else {
            return Classification::Monochrome;
        };
        if color_space.channels < self.min_channels {
            return Classification::Monochrome;
        }

        let step = RGB_TRIPLET.saturating_mul(self.pixel_stride);
        for i in (0..samples.len()).step_by(step) {
            if i + 2 >= samples.len() {
                continue;
            }
            let (r, g, b) = (samples[i], samples[i + 1], samples[i + 2]);
            if self.is_chromatic(r, g, b) {
                trace!("Chromatic sample at offset {}: ({}, {}, {})", i, r, g, b);
                return Classification::Color;
            }
        }

        Classification::Monochrome
    }

    fn is_chromatic(&self, r: u8, g: u8, b: u8) -> bool {
        r.abs_diff(g) > self.threshold
            || r.abs_diff(b) > self.threshold
            || g.abs_diff(b) > self.threshold
    }
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify samples with the reference parameters.
pub fn classify(samples: &[u8], color_space: Option<ColorSpaceInfo>) -> Classification {
    ColorClassifier::new().classify_samples(samples, color_space)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RGB raster of `pixels` gray pixels.
    fn gray_rgb(pixels: usize, level: u8) -> Vec<u8> {
        vec![level; pixels * 3]
    }

    #[test]
    fn test_missing_color_space_is_monochrome() {
        let samples = [255, 0, 0, 0, 255, 0];
        assert_eq!(classify(&samples, None), Classification::Monochrome);
    }

    #[test]
    fn test_low_channel_counts_are_monochrome() {
        let samples = [255, 0, 0, 0, 255, 0, 0, 0, 255];
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::GRAY)),
            Classification::Monochrome
        );
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::INDEXED)),
            Classification::Monochrome
        );
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::from_channels(2))),
            Classification::Monochrome
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let at_threshold = [105, 100, 100];
        assert_eq!(
            classify(&at_threshold, Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );

        let above_threshold = [106, 100, 100];
        assert_eq!(
            classify(&above_threshold, Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );
    }

    #[test]
    fn test_every_channel_pair_is_checked() {
        for samples in [[100, 106, 100], [100, 100, 106], [106, 100, 106]] {
            assert_eq!(
                classify(&samples, Some(ColorSpaceInfo::RGB)),
                Classification::Color,
                "{:?}",
                samples
            );
        }
    }

    #[test]
    fn test_only_every_tenth_pixel_is_sampled() {
        let mut samples = gray_rgb(20, 128);
        // Pixels 1..=9 are skipped by the stride.
        samples[3..6].copy_from_slice(&[255, 0, 0]);
        samples[27..30].copy_from_slice(&[0, 0, 255]);
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );

        samples[30..33].copy_from_slice(&[0, 255, 0]);
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );
    }

    #[test]
    fn test_short_circuit_ignores_truncated_tail() {
        // First sample hits; the trailing sample at offset 30 has only one byte.
        let mut samples = vec![200, 10, 10];
        samples.resize(31, 0);
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );
    }

    #[test]
    fn test_truncated_sample_is_skipped() {
        let mut samples = gray_rgb(10, 50);
        samples.extend_from_slice(&[255, 0]);
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );
    }

    #[test]
    fn test_cmyk_stride_uses_leading_triplet_offsets() {
        // Byte stride stays 30 regardless of the channel count.
        let mut samples = vec![0u8; 4 * 20];
        samples[30..33].copy_from_slice(&[90, 10, 10]);
        assert_eq!(
            classify(&samples, Some(ColorSpaceInfo::CMYK)),
            Classification::Color
        );
    }

    #[test]
    fn test_empty_rgb_raster_is_monochrome() {
        assert_eq!(
            classify(&[], Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );
    }

    #[test]
    fn test_configured_parameters() {
        let mut samples = gray_rgb(4, 100);
        samples[3..6].copy_from_slice(&[120, 100, 100]);

        let dense = ColorClassifier::new().with_pixel_stride(1);
        assert_eq!(
            dense.classify_samples(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );

        let tolerant = dense.with_threshold(30);
        assert_eq!(
            tolerant.classify_samples(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );
    }

    #[test]
    fn test_zero_stride_is_clamped() {
        let classifier = ColorClassifier::from_config(&ClassifierConfig {
            pixel_stride: 0,
            ..ClassifierConfig::default()
        });
        let samples = [0, 0, 0, 0, 0, 255];
        assert_eq!(
            classifier.classify_samples(&samples, Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );
    }

    #[test]
    fn test_huge_stride_samples_first_pixel_only() {
        let classifier = ColorClassifier::new().with_pixel_stride(usize::MAX);
        assert_eq!(
            classifier.classify_samples(&[200, 0, 0, 90, 90, 90], Some(ColorSpaceInfo::RGB)),
            Classification::Color
        );
        assert_eq!(
            classifier.classify_samples(&[90, 90, 90, 200, 0, 0], Some(ColorSpaceInfo::RGB)),
            Classification::Monochrome
        );
    }

    #[test]
    fn test_classify_raster() {
        let raster = PixelRaster::new(1, 1, vec![0, 128, 255], Some(ColorSpaceInfo::RGB));
        assert_eq!(ColorClassifier::new().classify(&raster), Classification::Color);
        assert_eq!(
            ColorClassifier::new().classify(&PixelRaster::degenerate()),
            Classification::Monochrome
        );
    }
}
