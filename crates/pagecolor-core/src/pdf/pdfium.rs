//! Full page rasterization through the pdfium library.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::debug;

use super::{DocumentSource, PageRasterizer, RasterBackend, Result};
use crate::error::PdfError;
use crate::models::{PageIndex, PixelRaster, page_number};

/// Resolution pdfium lays pages out at.
const POINTS_PER_INCH: f32 = 72.0;

/// Backend bound to a pdfium shared library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
    dpi: u32,
}

impl PdfiumBackend {
    /// Bind to pdfium in `library_dir`, or on the system search path.
    pub fn bind(library_dir: Option<&Path>, dpi: u32) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PdfError::BackendUnavailable(format!("{:?}", e)))?;

        debug!("Bound pdfium, rendering at {} dpi", dpi);
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi: dpi.max(1),
        })
    }
}

impl RasterBackend for PdfiumBackend {
    type Document<'a> = PdfiumDocument<'a>;

    fn open(&self, source: DocumentSource) -> Result<PdfiumDocument<'_>> {
        debug!("Opening {} with pdfium", source.describe());
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(source.into_bytes()?, None)
            .map_err(|e| match e {
                PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                    PdfError::Encrypted
                }
                other => PdfError::Open(format!("{:?}", other)),
            })?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(self.dpi as f32 / POINTS_PER_INCH);

        Ok(PdfiumDocument {
            document,
            render_config,
        })
    }
}

/// A document opened by pdfium.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    render_config: PdfRenderConfig,
}

impl PageRasterizer for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn render_page(&self, index: PageIndex) -> Result<PixelRaster> {
        let page_no = page_number(index);
        let pdfium_index =
            PdfPageIndex::try_from(index).map_err(|_| PdfError::InvalidPage(page_no))?;

        let page = self
            .document
            .pages()
            .get(pdfium_index)
            .map_err(|_| PdfError::InvalidPage(page_no))?;

        let bitmap = page
            .render_with_config(&self.render_config)
            .map_err(|e| PdfError::render(page_no, format!("{:?}", e)))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        debug!("Rendered page {} at {}x{}", page_no, width, height);

        Ok(PixelRaster::from_rgba(width, height, &bitmap.as_rgba_bytes()))
    }
}
