// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open PDF bytes and inspect the page tree (page count, media
// boxes) using the `lopdf` crate. Drawing pages is the rasteriser's job.

use blattwerk_core::error::BlattwerkError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument, warn};

/// Upper bound on /Parent hops when resolving inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Reads the structure of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Parse PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Media box size of a page (1-indexed) in PDF points, honouring
    /// inheritance from ancestor /Pages nodes and /Rotate.
    pub fn page_size(&self, page_number: u32) -> Result<(f32, f32), BlattwerkError> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            BlattwerkError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .ok_or_else(|| {
                BlattwerkError::PdfError(format!("page {} has no /MediaBox", page_number))
            })?;
        let (width, height) = box_dimensions(&self.document, media_box)?;

        let rotation = self
            .inherited_attribute(page_id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(0)
            .rem_euclid(360);

        if rotation == 90 || rotation == 270 {
            Ok((height, width))
        } else {
            Ok((width, height))
        }
    }

    /// Look up `key` on the page dictionary, walking up /Parent links.
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.document.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = current.get(key) {
                return Some(resolve(&self.document, value));
            }
            current = parent_of(&self.document, current)?;
        }
        warn!(?page_id, "Page tree deeper than inheritance limit");
        None
    }
}

fn parent_of<'a>(document: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    document.get_dictionary(parent_id).ok()
}

/// Follow a single indirect reference, if any.
fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Width and height of a `[llx lly urx ury]` rectangle.
fn box_dimensions(document: &Document, object: &Object) -> Result<(f32, f32), BlattwerkError> {
    let values = object
        .as_array()
        .map_err(|err| BlattwerkError::PdfError(format!("/MediaBox is not an array: {}", err)))?;
    if values.len() != 4 {
        return Err(BlattwerkError::PdfError(format!(
            "/MediaBox has {} entries, expected 4",
            values.len()
        )));
    }

    let mut coords = [0f32; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        *slot = resolve(document, value).as_float().map_err(|err| {
            BlattwerkError::PdfError(format!("/MediaBox entry is not a number: {}", err))
        })?;
    }

    Ok(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::writer::PdfWriter;
    use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg};

    /// Smallest valid baseline JPEG we can produce: a 1x1 grey pixel.
    fn tiny_jpeg() -> Vec<u8> {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([128, 128, 128, 255]));
        crate::image::processor::encode_jpeg(&pixel, 90).unwrap()
    }

    #[test]
    fn counts_pages_written_by_our_writer() {
        let jpeg = tiny_jpeg();
        let mut writer = PdfWriter::new();
        writer.add_jpeg_page(&jpeg, 30, 40).unwrap();
        writer.add_jpeg_page(&jpeg, 50, 20).unwrap();
        let bytes = writer.finish().unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 2);
        assert_eq!(reader.page_size(1).unwrap(), (30.0, 40.0));
        assert_eq!(reader.page_size(2).unwrap(), (50.0, 20.0));
    }

    #[test]
    fn reads_foreign_documents() {
        let mut doc = PdfDocument::new("fixture");
        let pages = (0..3)
            .map(|_| PdfPage::new(Mm(210.0), Mm(297.0), Vec::new()))
            .collect();
        doc.with_pages(pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
        let (width, height) = reader.page_size(1).unwrap();
        // A4 is 595 x 842 points.
        assert!((width - 595.3).abs() < 1.0, "width {width}");
        assert!((height - 841.9).abs() < 1.0, "height {height}");
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let mut writer = PdfWriter::new();
        writer.add_jpeg_page(&tiny_jpeg(), 10, 10).unwrap();
        let reader = PdfReader::from_bytes(&writer.finish().unwrap()).unwrap();
        assert!(reader.page_size(0).is_err());
        assert!(reader.page_size(2).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = PdfReader::from_bytes(b"hello, definitely not a document").err().unwrap();
        assert!(matches!(err, BlattwerkError::PdfError(_)));
    }
}
