// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode source images, rotate by quarter turns, and
// re-encode page rasters as JPEG (lossy, for PDF embedding) or PNG
// (lossless, for image archives). Operates on in-memory buffers using the
// `image` crate.

use blattwerk_core::InputFormat;
use blattwerk_core::error::BlattwerkError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::{debug, instrument};

/// Processing pipeline operating on a single in-memory page raster.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining:
///
/// ```ignore
/// let thumb = ImageProcessor::from_bytes(&bytes, InputFormat::Tiff)?
///     .rotate_clockwise()
///     .fit_within(240)
///     .to_jpeg_bytes(80)?;
/// ```
pub struct ImageProcessor {
    /// The current working image, always RGBA8.
    image: RgbaImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an encoded raster image at its native resolution.
    ///
    /// The declared `format` is authoritative; a PNG renamed to `.jpg` with a
    /// JPEG MIME type fails to decode rather than being sniffed.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], format: InputFormat) -> Result<Self, BlattwerkError> {
        let image_format = match format {
            InputFormat::Jpeg => ImageFormat::Jpeg,
            InputFormat::Png => ImageFormat::Png,
            InputFormat::Bmp => ImageFormat::Bmp,
            InputFormat::Tiff => ImageFormat::Tiff,
            InputFormat::Pdf => {
                return Err(BlattwerkError::UnsupportedFormat(
                    "PDF documents must be rasterised, not decoded as images".into(),
                ));
            }
        };

        let img = image::load_from_memory_with_format(data, image_format).map_err(|err| {
            BlattwerkError::ImageError(format!("failed to decode {}: {}", format.mime_type(), err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self {
            image: img.into_rgba8(),
        })
    }

    /// Wrap an already-decoded RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying buffer.
    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Rotate a quarter turn clockwise.
    ///
    /// Width and height swap; the pixel at new `(x, y)` is the old pixel at
    /// `(y, old_height - 1 - x)`. Lossless.
    pub fn rotate_clockwise(self) -> Self {
        Self {
            image: image::imageops::rotate90(&self.image),
        }
    }

    /// Downscale so the longest edge is at most `max_edge`, preserving aspect
    /// ratio. Images already within bounds are returned unchanged.
    #[instrument(skip(self), fields(max_edge))]
    pub fn fit_within(self, max_edge: u32) -> Self {
        let longest = self.image.width().max(self.image.height());
        if longest <= max_edge {
            return self;
        }
        let resized = DynamicImage::ImageRgba8(self.image).resize(
            max_edge,
            max_edge,
            FilterType::Triangle,
        );
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Downscale complete"
        );
        Self {
            image: resized.into_rgba8(),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as JPEG with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
        encode_jpeg(&self.image, quality)
    }
}

/// Encode an RGBA raster as baseline JPEG.
///
/// JPEG has no alpha channel, so the raster is first composited onto white.
/// The output is a pure function of the pixels and `quality`.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
    let rgb = flatten_onto_white(image);
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|err| BlattwerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Encode an RGBA raster as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BlattwerkError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    image
        .write_with_encoder(encoder)
        .map_err(|err| BlattwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Alpha-composite over an opaque white background.
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u16;
        let blend = |channel: u8| -> u8 {
            ((channel as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
