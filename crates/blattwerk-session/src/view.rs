// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only snapshots for the list and grid views.

use blattwerk_core::config::SessionConfig;
use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{PageId, SourceKind};
use blattwerk_document::image::encode_jpeg;
use blattwerk_document::ImageProcessor;
use serde::Serialize;

use crate::collection::PageCollection;

/// One row of the page list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub id: PageId,
    /// Current 1-based position.
    pub position: usize,
    pub label: String,
    pub source_file_name: String,
    pub source_kind: SourceKind,
    pub source_page_number: Option<u32>,
    pub original_position: u32,
    /// Set when the page no longer sits where it was added ("was page N").
    pub moved_from: Option<u32>,
    pub width: u32,
    pub height: u32,
    pub selected: bool,
}

/// A distinct source file in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    pub name: String,
    pub pages: usize,
    pub digest: String,
}

impl PageCollection {
    pub fn summaries(&self) -> Vec<PageSummary> {
        self.iter()
            .enumerate()
            .map(|(index, page)| {
                let position = index + 1;
                let original = page.original_position();
                let label = match page.source_page_number {
                    Some(number) => format!("{} - page {}", page.source_file_name, number),
                    None => page.source_file_name.clone(),
                };
                PageSummary {
                    id: page.id(),
                    position,
                    label,
                    source_file_name: page.source_file_name.clone(),
                    source_kind: page.source_kind,
                    source_page_number: page.source_page_number,
                    original_position: original,
                    moved_from: (original as usize != position).then_some(original),
                    width: page.width(),
                    height: page.height(),
                    selected: self.is_selected(index),
                }
            })
            .collect()
    }

    /// Distinct source file names in first-appearance order.
    pub fn loaded_files(&self) -> Vec<LoadedFile> {
        let mut files: Vec<LoadedFile> = Vec::new();
        for page in self.iter() {
            match files.iter_mut().find(|f| f.name == page.source_file_name) {
                Some(file) => file.pages += 1,
                None => files.push(LoadedFile {
                    name: page.source_file_name.clone(),
                    pages: 1,
                    digest: page.source.digest.clone(),
                }),
            }
        }
        files
    }

    /// Downscaled JPEG of the page at `index` for the grid view.
    pub fn thumbnail(&self, index: usize, config: &SessionConfig) -> Result<Vec<u8>> {
        let page = self.get(index).ok_or(BlattwerkError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        ImageProcessor::from_rgba(page.raster.clone())
            .fit_within(config.thumbnail_edge)
            .to_jpeg_bytes(config.thumbnail_quality)
    }

    /// Full-size JPEG of the first selected page, at export quality.
    pub fn preview_first_selected(&self, config: &SessionConfig) -> Result<Option<Vec<u8>>> {
        self.first_selected()
            .map(|page| encode_jpeg(&page.raster, config.jpeg_quality))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::types::SelectMode;

    use crate::test_support::{collection_of, image_record};

    #[test]
    fn moved_from_appears_only_for_displaced_pages() {
        let mut collection = collection_of(&["p0", "p1", "p2"]);
        collection.select(2, SelectMode::Replace).unwrap();
        collection.move_selected_to(1).unwrap();
        collection.select(0, SelectMode::Replace).unwrap();

        let rows = collection.summaries();
        let moved: Vec<Option<u32>> = rows.iter().map(|r| r.moved_from).collect();
        assert_eq!(moved, vec![Some(3), Some(1), Some(2)]);
        assert!(rows[0].selected && !rows[1].selected);

        collection.restore_original_order();
        assert!(collection.summaries().iter().all(|r| r.moved_from.is_none()));
    }

    #[test]
    fn summaries_serialize_to_json() {
        let collection = collection_of(&["only"]);
        let json = serde_json::to_value(collection.summaries()).unwrap();
        assert_eq!(json[0]["position"], 1);
        assert_eq!(json[0]["label"], "only");
        assert_eq!(json[0]["moved_from"], serde_json::Value::Null);
    }

    #[test]
    fn loaded_files_group_by_name() {
        let mut collection = collection_of(&["a.png", "b.png", "a.png"]);
        collection.select(1, SelectMode::Replace).unwrap();
        collection.duplicate_selected();

        let files = collection.loaded_files();
        let counts: Vec<(&str, usize)> = files.iter().map(|f| (f.name.as_str(), f.pages)).collect();
        assert_eq!(counts, vec![("a.png", 2), ("b.png", 1), ("b.png (copy)", 1)]);
        assert_eq!(files[0].digest.len(), 64);
    }

    #[test]
    fn thumbnail_fits_the_configured_edge() {
        let mut collection = PageCollection::new();
        collection.append(image_record("big", 400, 100));
        let config = SessionConfig {
            thumbnail_edge: 40,
            ..SessionConfig::default()
        };

        let jpeg = collection.thumbnail(0, &config).unwrap();
        let thumb = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (40, 10));
        assert!(matches!(
            collection.thumbnail(1, &config),
            Err(BlattwerkError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn preview_encodes_first_selected_page() {
        let mut collection = PageCollection::new();
        collection.append(image_record("small", 3, 3));
        collection.append(image_record("wide", 8, 2));
        let config = SessionConfig::default();

        assert!(collection.preview_first_selected(&config).unwrap().is_none());

        collection.select(1, SelectMode::Replace).unwrap();
        let jpeg = collection.preview_first_selected(&config).unwrap().unwrap();
        let preview = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((preview.width(), preview.height()), (8, 2));
    }
}
