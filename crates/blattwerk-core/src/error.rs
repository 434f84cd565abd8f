// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Decoding / encoding --
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF rasteriser unavailable: {0}")]
    RasterizerUnavailable(String),

    #[error("page rasterisation failed: {0}")]
    Rasterize(String),

    #[error("archive creation failed: {0}")]
    Archive(String),

    // -- Validation --
    #[error("invalid target position {target} (collection has {len} pages)")]
    InvalidPosition { target: usize, len: usize },

    #[error("page index {index} out of range (collection has {len} pages)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no pages selected")]
    NothingSelected,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How an error affects the operation that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// One file or page failed; the pipeline skips it and continues.
    PerItem,
    /// The request was rejected before anything changed.
    Validation,
    /// The whole operation is aborted.
    Fatal,
}

impl BlattwerkError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedFormat(_)
            | Self::PdfError(_)
            | Self::ImageError(_)
            | Self::Rasterize(_) => ErrorClass::PerItem,
            Self::InvalidPosition { .. }
            | Self::IndexOutOfRange { .. }
            | Self::NothingSelected
            | Self::InvalidConfig(_) => ErrorClass::Validation,
            Self::RasterizerUnavailable(_)
            | Self::Archive(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorClass::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
