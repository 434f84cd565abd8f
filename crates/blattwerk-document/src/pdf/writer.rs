// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: assemble documents whose pages are full-bleed JPEG images,
// using `lopdf`.
//
// Each page's MediaBox equals the image's pixel dimensions (1 px = 1 pt), so
// the image is painted edge to edge with no scaling or letterboxing. JPEG
// data is embedded verbatim as a /DCTDecode stream; the writer never
// re-encodes. No timestamps or random IDs are written, so identical input
// yields identical bytes.

use blattwerk_core::error::BlattwerkError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

/// Name under which each page's image is registered in its /Resources.
const IMAGE_RESOURCE: &str = "Im0";

/// Builds a PDF one image page at a time.
pub struct PdfWriter {
    document: Document,
    /// Reserved ID of the /Pages root, filled in by [`PdfWriter::finish`].
    pages_id: ObjectId,
    /// Page object references in document order.
    kids: Vec<Object>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append a page showing `jpeg`, sized `width` x `height` points.
    ///
    /// `width` and `height` must be the JPEG's pixel dimensions.
    #[instrument(skip(self, jpeg), fields(jpeg_len = jpeg.len()))]
    pub fn add_jpeg_page(
        &mut self,
        jpeg: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), BlattwerkError> {
        if width == 0 || height == 0 {
            return Err(BlattwerkError::PdfError(format!(
                "cannot create a {}x{} page",
                width, height
            )));
        }
        if !jpeg.starts_with(&[0xFF, 0xD8]) {
            return Err(BlattwerkError::PdfError(
                "page image is not JPEG data (missing SOI marker)".into(),
            ));
        }

        let (w, h) = (width as i64, height as i64);

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w,
                "Height" => h,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg.to_vec(),
        )
        .with_compression(false);
        let image_id = self.document.add_object(image_stream);

        // Paint the unit-square image scaled to the full page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|err| {
            BlattwerkError::PdfError(format!("failed to encode page content: {}", err))
        })?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), encoded));

        let mut xobjects = Dictionary::new();
        xobjects.set(IMAGE_RESOURCE, image_id);

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
        });
        self.kids.push(page_id.into());

        debug!(page = self.kids.len(), width, height, "Image page added");
        Ok(())
    }

    /// Close the page tree and serialise the document.
    pub fn finish(mut self) -> Result<Vec<u8>, BlattwerkError> {
        if self.kids.is_empty() {
            return Err(BlattwerkError::PdfError("document has no pages".into()));
        }

        let page_total = self.kids.len();
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => page_total as i64,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.document.add_object(dictionary! {
            "Producer" => Object::string_literal("Blattwerk"),
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to serialise PDF: {}", err))
        })?;

        info!(pages = page_total, output_bytes = output.len(), "PDF assembled");
        Ok(output)
    }

    /// Convenience: a standalone one-page document.
    pub fn single_page(jpeg: &[u8], width: u32, height: u32) -> Result<Vec<u8>, BlattwerkError> {
        let mut writer = Self::new();
        writer.add_jpeg_page(jpeg, width, height)?;
        writer.finish()
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::encode_jpeg;
    use image::{Rgba, RgbaImage};

    fn page_jpeg(width: u32, height: u32, shade: u8) -> Vec<u8> {
        let page = RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255]));
        encode_jpeg(&page, 90).unwrap()
    }

    /// Pull the embedded image streams back out, in page order.
    fn embedded_images(pdf: &[u8]) -> Vec<Vec<u8>> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let page = doc.get_dictionary(*page_id).unwrap();
                let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
                let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
                let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
                doc.get_object(image_id)
                    .unwrap()
                    .as_stream()
                    .unwrap()
                    .content
                    .clone()
            })
            .collect()
    }

    #[test]
    fn embeds_jpeg_verbatim_in_page_order() {
        let first = page_jpeg(8, 6, 10);
        let second = page_jpeg(4, 9, 200);

        let mut writer = PdfWriter::new();
        writer.add_jpeg_page(&first, 8, 6).unwrap();
        writer.add_jpeg_page(&second, 4, 9).unwrap();
        assert_eq!(writer.page_count(), 2);
        let pdf = writer.finish().unwrap();

        assert!(pdf.starts_with(b"%PDF-1.5"));
        assert_eq!(embedded_images(&pdf), vec![first, second]);
    }

    #[test]
    fn output_is_deterministic() {
        let jpeg = page_jpeg(5, 5, 42);
        let a = PdfWriter::single_page(&jpeg, 5, 5).unwrap();
        let b = PdfWriter::single_page(&jpeg, 5, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_documents_and_non_jpeg_data() {
        assert!(PdfWriter::new().finish().is_err());

        let mut writer = PdfWriter::new();
        assert!(writer.add_jpeg_page(b"\x89PNG\r\n", 1, 1).is_err());
        assert!(writer.add_jpeg_page(&page_jpeg(1, 1, 0), 0, 1).is_err());
        assert_eq!(writer.page_count(), 0);
    }
}
