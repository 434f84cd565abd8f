// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk page organiser.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-unique identity of a page record.
///
/// Assigned once when the record is created and never reused; selection is
/// tracked by this value rather than by collection index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(pub Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a page's pixels originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// One rasterised page of a PDF.
    Pdf,
    /// A standalone raster image.
    Image,
}

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Pdf,
    Jpeg,
    Png,
    Bmp,
    Tiff,
}

impl InputFormat {
    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer the format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Parse a declared MIME type. Parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/tiff" | "image/tiff-fx" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Resolve the format of a named file.
    ///
    /// A declared MIME type wins when present; otherwise the extension of
    /// `file_name` decides.
    pub fn resolve(declared_mime: Option<&str>, file_name: &str) -> Option<Self> {
        match declared_mime.filter(|m| !m.trim().is_empty()) {
            Some(mime) => Self::from_mime(mime),
            None => file_name
                .rsplit_once('.')
                .and_then(|(_, ext)| Self::from_extension(ext)),
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::Pdf => SourceKind::Pdf,
            _ => SourceKind::Image,
        }
    }
}

/// How a click on a page changes the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectMode {
    /// Clear the selection, then select the page.
    Replace,
    /// Add the page if absent, remove it if present.
    Toggle,
}

/// Layout used by the view projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }
}

/// Colour theme of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// The four export modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    /// Every page in collection order, one PDF.
    Unified,
    /// Selected pages in ascending index order, one PDF.
    Selection,
    /// One single-page PDF per page, zipped.
    PdfArchive,
    /// One PNG per page, zipped.
    PngArchive,
}

impl ExportKind {
    /// MIME type of the produced artifact.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Unified | Self::Selection => "application/pdf",
            Self::PdfArchive | Self::PngArchive => "application/zip",
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Self::PdfArchive | Self::PngArchive)
    }
}

/// A progress event: percentage in `0..=100` plus a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub percent: u8,
    pub message: String,
}

impl Progress {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_inference_is_case_insensitive() {
        assert_eq!(InputFormat::from_extension("PDF"), Some(InputFormat::Pdf));
        assert_eq!(InputFormat::from_extension("Jpg"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_extension("tif"), Some(InputFormat::Tiff));
        assert_eq!(InputFormat::from_extension("docx"), None);
    }

    #[test]
    fn declared_mime_wins_over_extension() {
        let format = InputFormat::resolve(Some("image/png"), "scan.pdf");
        assert_eq!(format, Some(InputFormat::Png));

        let unknown = InputFormat::resolve(Some("text/plain"), "scan.pdf");
        assert_eq!(unknown, None);
    }

    #[test]
    fn missing_mime_falls_back_to_extension() {
        assert_eq!(
            InputFormat::resolve(None, "holiday.photo.JPEG"),
            Some(InputFormat::Jpeg)
        );
        assert_eq!(InputFormat::resolve(Some("  "), "a.bmp"), Some(InputFormat::Bmp));
        assert_eq!(InputFormat::resolve(None, "README"), None);
    }

    #[test]
    fn mime_parameters_are_ignored() {
        assert_eq!(
            InputFormat::from_mime("application/pdf; charset=binary"),
            Some(InputFormat::Pdf)
        );
    }

    #[test]
    fn page_ids_are_unique() {
        assert_ne!(PageId::new(), PageId::new());
    }

    #[test]
    fn toggles_flip_back_and_forth() {
        assert_eq!(ViewMode::List.toggled(), ViewMode::Grid);
        assert_eq!(ViewMode::List.toggled().toggled(), ViewMode::List);
        assert_eq!(Theme::default().toggled(), Theme::Light);
    }

    #[test]
    fn archive_kinds_are_zip() {
        for kind in [ExportKind::PdfArchive, ExportKind::PngArchive] {
            assert!(kind.is_archive());
            assert_eq!(kind.mime_type(), "application/zip");
        }
        for kind in [ExportKind::Unified, ExportKind::Selection] {
            assert!(!kind.is_archive());
            assert_eq!(kind.mime_type(), "application/pdf");
        }
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Progress::new(140, "done").percent, 100);
    }
}
