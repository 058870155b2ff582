//! Pure Rust page rasters built from embedded images, using lopdf.
//!
//! Without a full renderer the best available raster of a page is its
//! dominant image XObject. Vector art and text color are not seen by this
//! backend; pages without a decodable image come back degenerate (no color
//! space) and classify as black and white.

use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace};

use super::{DocumentSource, PageRasterizer, RasterBackend, Result};
use crate::error::PdfError;
use crate::models::{
    ColorModel, ColorSpaceInfo, PageIndex, PageNumber, PixelRaster, page_number,
};

/// Nesting limit when following inherited resources and form XObjects.
const MAX_DEPTH: usize = 16;

/// Backend that opens documents with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedImageBackend;

impl EmbeddedImageBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for EmbeddedImageBackend {
    type Document<'a> = EmbeddedImageDocument;

    fn open(&self, source: DocumentSource) -> Result<EmbeddedImageDocument> {
        debug!("Opening {} with embedded-image backend", source.describe());
        EmbeddedImageDocument::load(&source.into_bytes()?)
    }
}

/// A loaded document whose pages are rasterized from their images.
pub struct EmbeddedImageDocument {
    document: Document,
    pages: Vec<ObjectId>,
}

/// An image XObject worth decoding.
struct Candidate<'d> {
    stream: &'d Stream,
    width: u32,
    height: u32,
}

impl Candidate<'_> {
    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl EmbeddedImageDocument {
    /// Load a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Open(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!("Loaded PDF with {} pages", pages.len());

        Ok(Self { document, pages })
    }

    /// Get resources dictionary for a page, handling inheritance.
    fn page_resources(&self, node_id: ObjectId, depth: usize) -> Option<&Dictionary> {
        if depth > MAX_DEPTH {
            return None;
        }
        let dict = self.document.get_object(node_id).ok()?.as_dict().ok()?;

        if let Ok(resources) = dict.get(b"Resources") {
            if let Ok((_, Object::Dictionary(res_dict))) = self.document.dereference(resources) {
                return Some(res_dict);
            }
        }

        // Continue up the tree
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.page_resources(*parent_id, depth + 1),
            _ => None,
        }
    }

    /// Collect decodable images reachable from a resources dictionary.
    fn collect_candidates<'d>(
        &'d self,
        resources: &'d Dictionary,
        depth: usize,
        out: &mut Vec<Candidate<'d>>,
    ) {
        if depth > MAX_DEPTH {
            return;
        }
        let Ok(xobjects) = resources.get(b"XObject") else {
            return;
        };
        let Ok((_, Object::Dictionary(xobj_dict))) = self.document.dereference(xobjects) else {
            return;
        };

        for (name, obj_ref) in xobj_dict.iter() {
            let Ok((_, Object::Stream(stream))) = self.document.dereference(obj_ref) else {
                continue;
            };
            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
            match subtype {
                Some(b"Image") => {
                    if let Some(candidate) = image_candidate(stream) {
                        out.push(candidate);
                    } else {
                        trace!("Skipping unsupported image /{}", String::from_utf8_lossy(name));
                    }
                }
                Some(b"Form") => {
                    if let Ok((_, Object::Dictionary(form_resources))) = stream
                        .dict
                        .get(b"Resources")
                        .and_then(|r| self.document.dereference(r))
                    {
                        self.collect_candidates(form_resources, depth + 1, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn decode(&self, candidate: &Candidate<'_>, page: PageNumber) -> Result<PixelRaster> {
        let Candidate {
            stream,
            width,
            height,
        } = *candidate;

        if has_filter(&stream.dict, b"DCTDecode") {
            trace!("Decoding JPEG image {}x{}", width, height);
            let img = image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .map_err(|e| PdfError::render(page, e.to_string()))?;
            return Ok(raster_from_image(img));
        }

        let color_space = self
            .color_space(&stream.dict)
            .ok_or_else(|| PdfError::render(page, "image has no usable color space"))?;

        let data = if stream.dict.get(b"Filter").is_ok() {
            stream
                .decompressed_content()
                .map_err(|e| PdfError::render(page, e.to_string()))?
        } else {
            stream.content.clone()
        };

        let expected = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|n| n.checked_mul(u64::from(color_space.channels)))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                PdfError::render(page, format!("image too large: {}x{}", width, height))
            })?;
        if data.len() < expected {
            return Err(PdfError::render(
                page,
                format!("image data too short: {} < {}", data.len(), expected),
            ));
        }

        trace!(
            "Raw image {}x{}, {} channels ({:?})",
            width, height, color_space.channels, color_space.model
        );
        let mut samples = data;
        samples.truncate(expected);
        Ok(PixelRaster::new(width, height, samples, Some(color_space)))
    }

    /// Resolve an image's color space to its channel count.
    fn color_space(&self, dict: &Dictionary) -> Option<ColorSpaceInfo> {
        let (_, obj) = self.document.dereference(dict.get(b"ColorSpace").ok()?).ok()?;
        match obj {
            Object::Name(name) => named_color_space(name),
            Object::Array(arr) => {
                let family = arr.first()?.as_name().ok()?;
                match family {
                    b"ICCBased" => {
                        let (_, profile) = self.document.dereference(arr.get(1)?).ok()?;
                        let n = profile.as_stream().ok()?.dict.get(b"N").ok()?.as_i64().ok()?;
                        Some(ColorSpaceInfo::from_channels(u8::try_from(n).ok()?))
                    }
                    b"Indexed" | b"I" => Some(ColorSpaceInfo::INDEXED),
                    b"Separation" => Some(ColorSpaceInfo {
                        channels: 1,
                        model: ColorModel::Other,
                    }),
                    b"DeviceN" => {
                        let (_, names) = self.document.dereference(arr.get(1)?).ok()?;
                        let n = names.as_array().ok()?.len();
                        Some(ColorSpaceInfo {
                            channels: u8::try_from(n).ok()?,
                            model: ColorModel::Other,
                        })
                    }
                    other => named_color_space(other),
                }
            }
            _ => None,
        }
    }
}

impl PageRasterizer for EmbeddedImageDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn render_page(&self, index: PageIndex) -> Result<PixelRaster> {
        let page = page_number(index);
        let page_id = *self
            .pages
            .get(index as usize)
            .ok_or(PdfError::InvalidPage(page))?;

        let mut candidates = Vec::new();
        if let Some(resources) = self.page_resources(page_id, 0) {
            self.collect_candidates(resources, 0, &mut candidates);
        }

        let Some(largest) = candidates.iter().max_by_key(|c| c.area()) else {
            debug!("No decodable images on page {}", page);
            return Ok(PixelRaster::degenerate());
        };

        debug!(
            "Page {}: {} candidate images, using {}x{}",
            page,
            candidates.len(),
            largest.width,
            largest.height
        );
        self.decode(largest, page)
    }
}

/// Width and height of an image this backend can decode.
fn image_candidate(stream: &Stream) -> Option<Candidate<'_>> {
    let dict = &stream.dict;
    for unsupported in [&b"JPXDecode"[..], &b"JBIG2Decode"[..], &b"CCITTFaxDecode"[..]] {
        if has_filter(dict, unsupported) {
            return None;
        }
    }

    // Stencil masks carry no colors of their own.
    if dict
        .get(b"ImageMask")
        .and_then(Object::as_bool)
        .unwrap_or(false)
    {
        return None;
    }

    let is_jpeg = has_filter(dict, b"DCTDecode");
    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(Object::as_i64)
        .unwrap_or(8);
    if !is_jpeg && bits != 8 {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    if width == 0 || height == 0 {
        return None;
    }

    Some(Candidate {
        stream,
        width,
        height,
    })
}

fn has_filter(dict: &Dictionary, name: &[u8]) -> bool {
    match dict.get(b"Filter") {
        Ok(Object::Name(filter)) => filter.as_slice() == name,
        Ok(Object::Array(filters)) => filters
            .iter()
            .any(|f| f.as_name().map(|n| n == name).unwrap_or(false)),
        _ => false,
    }
}

fn named_color_space(name: &[u8]) -> Option<ColorSpaceInfo> {
    match name {
        b"DeviceGray" | b"G" | b"CalGray" => Some(ColorSpaceInfo::GRAY),
        b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorSpaceInfo::RGB),
        b"DeviceCMYK" | b"CMYK" => Some(ColorSpaceInfo::CMYK),
        b"Lab" => Some(ColorSpaceInfo {
            channels: 3,
            model: ColorModel::Other,
        }),
        _ => None,
    }
}

fn raster_from_image(img: DynamicImage) -> PixelRaster {
    let (width, height) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(gray) => {
            PixelRaster::new(width, height, gray.into_raw(), Some(ColorSpaceInfo::GRAY))
        }
        other => PixelRaster::new(
            width,
            height,
            other.to_rgb8().into_raw(),
            Some(ColorSpaceInfo::RGB),
        ),
    }
}
