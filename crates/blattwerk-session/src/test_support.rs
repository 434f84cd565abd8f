// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the session tests.

use std::io::Cursor;
use std::sync::Arc;

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::InputFormat;
use blattwerk_document::image::{encode_jpeg, encode_png};
use blattwerk_document::{PageRasterizer, PdfReader, PdfWriter};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use crate::collection::PageCollection;
use crate::ingest::IngestFile;
use crate::record::{PageRecord, SourceFile};

/// Paints each page a solid colour whose red channel is the page number,
/// sized from the MediaBox times `scale`.
pub(crate) struct StubRasterizer;

impl PageRasterizer for StubRasterizer {
    fn render_page(
        &self,
        pdf: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<RgbaImage, BlattwerkError> {
        let (width, height) = PdfReader::from_bytes(pdf)?.page_size(page_number)?;
        let width = (width * scale).round() as u32;
        let height = (height * scale).round() as u32;
        Ok(RgbaImage::from_pixel(
            width,
            height,
            Rgba([page_number as u8, 0, 0, 255]),
        ))
    }
}

/// Reports the platform renderer as missing on every call.
pub(crate) struct MissingRasterizer;

impl PageRasterizer for MissingRasterizer {
    fn page_count(&self, _pdf: &[u8]) -> Result<u32, BlattwerkError> {
        Err(BlattwerkError::RasterizerUnavailable("no renderer".into()))
    }

    fn render_page(&self, _pdf: &[u8], _page: u32, _scale: f32) -> Result<RgbaImage, BlattwerkError> {
        Err(BlattwerkError::RasterizerUnavailable("no renderer".into()))
    }
}

/// A PDF with one page per `(width, height)` entry, in points.
pub(crate) fn pdf_bytes(sizes: &[(u32, u32)]) -> Vec<u8> {
    let mut writer = PdfWriter::new();
    for &(width, height) in sizes {
        let page = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let jpeg = encode_jpeg(&page, 90).unwrap();
        writer.add_jpeg_page(&jpeg, width, height).unwrap();
    }
    writer.finish().unwrap()
}

pub(crate) fn png_bytes(width: u32, height: u32, shade: u8) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255]))).unwrap()
}

pub(crate) fn pdf_file(name: &str, sizes: &[(u32, u32)]) -> IngestFile {
    IngestFile::new(name, pdf_bytes(sizes)).with_mime("application/pdf")
}

pub(crate) fn png_file(name: &str, width: u32, height: u32) -> IngestFile {
    IngestFile::new(name, png_bytes(width, height, 128))
}

/// An image file encoded with the `image` crate in `format`, named by
/// extension only.
pub(crate) fn encoded_image_file(
    name: &str,
    width: u32,
    height: u32,
    format: ImageFormat,
) -> IngestFile {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 140, 200])));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    IngestFile::new(name, bytes.into_inner())
}

/// A page whose pixels are all distinct, so rotations are observable.
pub(crate) fn image_record(name: &str, width: u32, height: u32) -> PageRecord {
    let raster = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([x as u8, y as u8, (x * 7 + y * 13) as u8, 255])
    });
    let source = Arc::new(SourceFile::new(name, InputFormat::Png, Arc::from(&[][..])));
    PageRecord::new(raster, source, None)
}

/// One 2x2 page per name, appended in order.
pub(crate) fn collection_of(names: &[&str]) -> PageCollection {
    let mut collection = PageCollection::new();
    for name in names {
        collection.append(image_record(name, 2, 2));
    }
    collection
}

/// Source file names in collection order.
pub(crate) fn labels(collection: &PageCollection) -> Vec<String> {
    collection
        .iter()
        .map(|page| page.source_file_name.clone())
        .collect()
}
