// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page records: the unit of work held in the collection.

use std::sync::Arc;

use blattwerk_core::types::{InputFormat, PageId, SourceKind};
use image::RgbaImage;
use sha2::{Digest, Sha256};

/// An ingested file whose bytes are retained for re-derivation.
///
/// Shared by every page cut from the file (and by their duplicates). Exports
/// never read it; the page raster is authoritative.
#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub format: InputFormat,
    pub bytes: Arc<[u8]>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub digest: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, format: InputFormat, bytes: Arc<[u8]>) -> Self {
        let digest = hex::encode(Sha256::digest(&bytes));
        Self {
            name: name.into(),
            format,
            bytes,
            digest,
        }
    }
}

/// One page (a rasterised PDF page or a standalone image).
pub struct PageRecord {
    /// Current visual state; every rotation rewrites it.
    pub raster: RgbaImage,
    pub source_file_name: String,
    pub source_kind: SourceKind,
    /// 1-based page within the originating PDF; `None` for images.
    pub source_page_number: Option<u32>,
    pub source: Arc<SourceFile>,
    id: PageId,
    /// 1-based position at first append; 0 until then.
    original_position: u32,
}

impl PageRecord {
    pub fn new(raster: RgbaImage, source: Arc<SourceFile>, source_page_number: Option<u32>) -> Self {
        Self {
            raster,
            source_file_name: source.name.clone(),
            source_kind: source.format.source_kind(),
            source_page_number,
            source,
            id: PageId::new(),
            original_position: 0,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// 1-based position recorded when the page was first appended.
    pub fn original_position(&self) -> u32 {
        self.original_position
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Record the append position. Only the first call has an effect.
    pub(crate) fn assign_original_position(&mut self, position: u32) {
        if self.original_position == 0 {
            self.original_position = position;
        }
    }

    /// Deep copy with a fresh identity, a " (copy)" suffix on the file name,
    /// and the given original position.
    pub(crate) fn duplicate(&self, original_position: u32) -> Self {
        Self {
            raster: self.raster.clone(),
            source_file_name: format!("{} (copy)", self.source_file_name),
            source_kind: self.source_kind,
            source_page_number: self.source_page_number,
            source: Arc::clone(&self.source),
            id: PageId::new(),
            original_position,
        }
    }
}

impl std::fmt::Debug for PageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRecord")
            .field("id", &self.id)
            .field("source_file_name", &self.source_file_name)
            .field("source_kind", &self.source_kind)
            .field("source_page_number", &self.source_page_number)
            .field("original_position", &self.original_position)
            .field("width", &self.raster.width())
            .field("height", &self.raster.height())
            .finish()
    }
}
