// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document: Codec layer for the Blattwerk page organiser.
//
// Provides raster page processing (decode, quarter-turn rotation, JPEG/PNG
// encoding, thumbnails), PDF structure reading and image-page PDF writing,
// ZIP bundling, and the seam through which PDF pages are rasterised.

pub mod archive;
pub mod image;
pub mod pdf;
pub mod raster;

// Re-export the primary structs so callers can use `blattwerk_document::PdfWriter` etc.
pub use archive::ArchiveBuilder;
pub use crate::image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use raster::PageRasterizer;

#[cfg(feature = "pdfium")]
pub use raster::PdfiumRasterizer;
