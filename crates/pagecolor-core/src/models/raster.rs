//! Rendered page rasters and their color space description.

use serde::{Deserialize, Serialize};

/// Color model a raster's samples are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorModel {
    Gray,
    /// Palette indices; one sample per pixel.
    Indexed,
    Rgb,
    Cmyk,
    /// Anything else (Lab, DeviceN, ICC profiles with unusual component counts).
    Other,
}

/// Channel count `n` of a raster plus the model it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpaceInfo {
    /// Number of color components per pixel (1 = gray, 3 = RGB, 4 = CMYK).
    pub channels: u8,
    pub model: ColorModel,
}

impl ColorSpaceInfo {
    pub const GRAY: Self = Self {
        channels: 1,
        model: ColorModel::Gray,
    };
    pub const INDEXED: Self = Self {
        channels: 1,
        model: ColorModel::Indexed,
    };
    pub const RGB: Self = Self {
        channels: 3,
        model: ColorModel::Rgb,
    };
    pub const CMYK: Self = Self {
        channels: 4,
        model: ColorModel::Cmyk,
    };

    /// Describe a color space only by its component count.
    pub fn from_channels(channels: u8) -> Self {
        let model = match channels {
            1 => ColorModel::Gray,
            3 => ColorModel::Rgb,
            4 => ColorModel::Cmyk,
            _ => ColorModel::Other,
        };
        Self { channels, model }
    }
}

/// Interleaved 8-bit samples for one rendered page, without alpha.
///
/// A raster is produced by a rasterizer for a single page and dropped once
/// that page has been classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRaster {
    width: u32,
    height: u32,
    samples: Vec<u8>,
    color_space: Option<ColorSpaceInfo>,
}

impl PixelRaster {
    /// Wrap already-decoded samples.
    pub fn new(
        width: u32,
        height: u32,
        samples: Vec<u8>,
        color_space: Option<ColorSpaceInfo>,
    ) -> Self {
        Self {
            width,
            height,
            samples,
            color_space,
        }
    }

    /// A page with nothing to render and no color space.
    pub fn degenerate() -> Self {
        Self::new(0, 0, Vec::new(), None)
    }

    /// Build an RGB raster from RGBA samples, dropping the alpha channel.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let samples = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::new(width, height, samples, Some(ColorSpaceInfo::RGB))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw interleaved samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn color_space(&self) -> Option<ColorSpaceInfo> {
        self.color_space
    }

    /// Channel count, or 0 when the color space is absent.
    pub fn channels(&self) -> u8 {
        self.color_space.map(|cs| cs.channels).unwrap_or(0)
    }
}
