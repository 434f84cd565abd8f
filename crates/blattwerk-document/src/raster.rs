// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasterisation seam.
//
// Blattwerk does not draw PDF content itself. A `PageRasterizer` turns one
// page of a PDF into pixels; the platform supplies the implementation. With
// the `pdfium` feature, `PdfiumRasterizer` binds the system PDFium library
// through `pdfium-render`.

use blattwerk_core::error::BlattwerkError;
use image::RgbaImage;

use crate::pdf::reader::PdfReader;

/// Renders individual PDF pages to RGBA rasters.
pub trait PageRasterizer {
    /// Number of pages in `pdf`.
    ///
    /// The default implementation walks the page tree with `lopdf`.
    fn page_count(&self, pdf: &[u8]) -> Result<u32, BlattwerkError> {
        Ok(PdfReader::from_bytes(pdf)?.page_count())
    }

    /// Render page `page_number` (1-indexed) at `scale` device pixels per
    /// PDF point.
    fn render_page(
        &self,
        pdf: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<RgbaImage, BlattwerkError>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for Box<R> {
    fn page_count(&self, pdf: &[u8]) -> Result<u32, BlattwerkError> {
        (**self).page_count(pdf)
    }

    fn render_page(
        &self,
        pdf: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<RgbaImage, BlattwerkError> {
        (**self).render_page(pdf, page_number, scale)
    }
}

#[cfg(feature = "pdfium")]
pub use pdfium_backend::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium_backend {
    use blattwerk_core::error::BlattwerkError;
    use image::RgbaImage;
    use pdfium_render::prelude::*;
    use tracing::{debug, info};

    use super::PageRasterizer;

    /// Rasteriser backed by the system PDFium library.
    pub struct PdfiumRasterizer {
        pdfium: Pdfium,
    }

    impl PdfiumRasterizer {
        /// Bind to the system PDFium library.
        ///
        /// Fails with [`BlattwerkError::RasterizerUnavailable`] when the
        /// library cannot be found.
        pub fn from_system_library() -> Result<Self, BlattwerkError> {
            let bindings = Pdfium::bind_to_system_library()
                .map_err(|err| BlattwerkError::RasterizerUnavailable(err.to_string()))?;
            info!("Bound system PDFium library");
            Ok(Self {
                pdfium: Pdfium::new(bindings),
            })
        }

        fn load<'a>(&'a self, pdf: &'a [u8]) -> Result<PdfDocument<'a>, BlattwerkError> {
            self.pdfium
                .load_pdf_from_byte_slice(pdf, None)
                .map_err(|err| BlattwerkError::PdfError(format!("PDFium cannot open PDF: {}", err)))
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn page_count(&self, pdf: &[u8]) -> Result<u32, BlattwerkError> {
            Ok(self.load(pdf)?.pages().len() as u32)
        }

        fn render_page(
            &self,
            pdf: &[u8],
            page_number: u32,
            scale: f32,
        ) -> Result<RgbaImage, BlattwerkError> {
            let document = self.load(pdf)?;
            let index = page_number
                .checked_sub(1)
                .and_then(|i| PdfPageIndex::try_from(i).ok())
                .ok_or_else(|| {
                    BlattwerkError::Rasterize(format!("invalid page number {}", page_number))
                })?;
            let page = document.pages().get(index).map_err(|err| {
                BlattwerkError::Rasterize(format!("page {}: {}", page_number, err))
            })?;

            let config = PdfRenderConfig::new().scale_page_by_factor(scale);
            let bitmap = page.render_with_config(&config).map_err(|err| {
                BlattwerkError::Rasterize(format!("page {}: {}", page_number, err))
            })?;
            let raster = bitmap.as_image().into_rgba8();
            debug!(
                page_number,
                width = raster.width(),
                height = raster.height(),
                "Page rendered"
            );
            Ok(raster)
        }
    }
}
