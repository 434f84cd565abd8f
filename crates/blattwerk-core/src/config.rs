// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BlattwerkError, Result};
use crate::types::ExportKind;

/// Settings for ingestion and export. Session-only; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upscale factor applied when rasterising PDF pages.
    pub raster_scale: f32,
    /// JPEG quality (1-100) for pages embedded in exported PDFs and previews.
    pub jpeg_quality: u8,
    /// JPEG quality (1-100) for grid thumbnails.
    pub thumbnail_quality: u8,
    /// Longest edge of a grid thumbnail, in pixels.
    pub thumbnail_edge: u32,
    /// Prefix of per-page archive entries (`page_001.pdf`).
    pub page_name_prefix: String,
    pub unified_file_name: String,
    pub selection_file_name: String,
    pub pdf_archive_file_name: String,
    pub png_archive_file_name: String,
    /// Stamp archive entries with the current local time. When false, entries
    /// carry the fixed ZIP epoch and archives are byte-identical across runs.
    pub timestamp_archive_entries: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            raster_scale: 2.0,
            jpeg_quality: 90,
            thumbnail_quality: 80,
            thumbnail_edge: 240,
            page_name_prefix: "page".into(),
            unified_file_name: "organized_document.pdf".into(),
            selection_file_name: "selected_pages.pdf".into(),
            pdf_archive_file_name: "separate_pages_pdf.zip".into(),
            png_archive_file_name: "separate_pages_png.zip".into(),
            timestamp_archive_entries: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON settings document. Missing keys take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(BlattwerkError::InvalidConfig(format!(
                "raster_scale must be positive, got {}",
                self.raster_scale
            )));
        }
        for (name, quality) in [
            ("jpeg_quality", self.jpeg_quality),
            ("thumbnail_quality", self.thumbnail_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(BlattwerkError::InvalidConfig(format!(
                    "{name} must be within 1..=100, got {quality}"
                )));
            }
        }
        if self.thumbnail_edge == 0 {
            return Err(BlattwerkError::InvalidConfig(
                "thumbnail_edge must be non-zero".into(),
            ));
        }
        if self.page_name_prefix.contains(['/', '\\']) {
            return Err(BlattwerkError::InvalidConfig(format!(
                "page_name_prefix must not contain path separators: {}",
                self.page_name_prefix
            )));
        }
        Ok(())
    }

    /// Suggested file name for an export artifact.
    pub fn file_name_for(&self, kind: ExportKind) -> &str {
        match kind {
            ExportKind::Unified => &self.unified_file_name,
            ExportKind::Selection => &self.selection_file_name,
            ExportKind::PdfArchive => &self.pdf_archive_file_name,
            ExportKind::PngArchive => &self.png_archive_file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.raster_scale, 2.0);
        assert_eq!(config.jpeg_quality, 90);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{ "jpeg_quality": 75 }"#).unwrap();
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.page_name_prefix, "page");
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let err = SessionConfig::from_json(r#"{ "jpeg_quality": 0 }"#).unwrap_err();
        assert!(matches!(err, BlattwerkError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let config = SessionConfig {
            raster_scale: 0.0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = SessionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BlattwerkError::Serialization(_)));
    }

    #[test]
    fn archive_kinds_use_zip_names() {
        let config = SessionConfig::default();
        assert!(config.file_name_for(ExportKind::PngArchive).ends_with(".zip"));
        assert!(config.file_name_for(ExportKind::Selection).ends_with(".pdf"));
    }
}
