// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The ordered page collection and its selection.
//
// Selection is a set of page identities. Indices are derived on demand from
// the current order, so reordering never shifts the selection onto the wrong
// pages, and deleted pages drop out of it on the next prune.

use std::collections::HashSet;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{PageId, SelectMode};
use blattwerk_document::ImageProcessor;
use image::RgbaImage;
use tracing::{debug, info};

use crate::record::PageRecord;

/// Result of [`PageCollection::delete_selected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Number of pages removed.
    pub removed: usize,
    /// The deletion emptied a non-empty collection.
    pub now_empty: bool,
}

/// Ordered sequence of pages plus the set of selected page identities.
#[derive(Debug, Default)]
pub struct PageCollection {
    pages: Vec<PageRecord>,
    selection: HashSet<PageId>,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in document order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn get(&self, index: usize) -> Option<&PageRecord> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    pub fn position_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id() == id)
    }

    // -- Selection ----------------------------------------------------------

    /// Selected indices, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| self.selection.contains(&page.id()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Selected pages in document order.
    pub fn selected_pages(&self) -> Vec<&PageRecord> {
        self.pages
            .iter()
            .filter(|page| self.selection.contains(&page.id()))
            .collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.pages
            .get(index)
            .is_some_and(|page| self.selection.contains(&page.id()))
    }

    /// The selected page nearest the front of the collection.
    pub fn first_selected(&self) -> Option<&PageRecord> {
        self.pages
            .iter()
            .find(|page| self.selection.contains(&page.id()))
    }

    /// Select the page at `index`.
    ///
    /// `Replace` makes it the only selected page; `Toggle` flips its
    /// membership.
    pub fn select(&mut self, index: usize, mode: SelectMode) -> Result<()> {
        let id = self
            .pages
            .get(index)
            .map(PageRecord::id)
            .ok_or(BlattwerkError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            })?;

        match mode {
            SelectMode::Replace => {
                self.selection.clear();
                self.selection.insert(id);
            }
            SelectMode::Toggle => {
                if !self.selection.remove(&id) {
                    self.selection.insert(id);
                }
            }
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection = self.pages.iter().map(PageRecord::id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop identities whose page no longer exists.
    fn prune_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let live: HashSet<PageId> = self.pages.iter().map(PageRecord::id).collect();
        self.selection.retain(|id| live.contains(id));
    }

    // -- Mutations ----------------------------------------------------------

    /// Push `record` to the end, stamping its original position.
    pub fn append(&mut self, mut record: PageRecord) -> usize {
        record.assign_original_position(self.next_position());
        self.pages.push(record);
        self.pages.len() - 1
    }

    /// Insert a copy of each selected page directly after its original.
    ///
    /// Returns the number of copies made. Clears the selection.
    pub fn duplicate_selected(&mut self) -> usize {
        let indices = self.selected_indices();
        // Back to front, so indices not yet visited stay valid.
        for &index in indices.iter().rev() {
            let copy = self.pages[index].duplicate(self.next_position());
            self.pages.insert(index + 1, copy);
        }
        self.selection.clear();
        info!(copies = indices.len(), total = self.pages.len(), "Pages duplicated");
        indices.len()
    }

    /// Turn every selected page a quarter clockwise. The selection is kept.
    pub fn rotate_selected(&mut self) -> usize {
        let mut rotated = 0;
        for page in self
            .pages
            .iter_mut()
            .filter(|page| self.selection.contains(&page.id()))
        {
            let raster = std::mem::replace(&mut page.raster, RgbaImage::new(0, 0));
            page.raster = ImageProcessor::from_rgba(raster)
                .rotate_clockwise()
                .into_rgba();
            rotated += 1;
        }
        debug!(rotated, "Pages rotated");
        rotated
    }

    /// Move the selected pages, as one block in their current relative order,
    /// so the block starts at 1-based `target`.
    ///
    /// `target` must lie in `1..=len`. A target past the end of the remaining
    /// pages appends the block. Clears the selection.
    pub fn move_selected_to(&mut self, target: usize) -> Result<()> {
        let len = self.pages.len();
        if target < 1 || target > len {
            return Err(BlattwerkError::InvalidPosition { target, len });
        }
        if self.selection.is_empty() {
            return Err(BlattwerkError::NothingSelected);
        }

        let (moving, mut remaining): (Vec<PageRecord>, Vec<PageRecord>) =
            std::mem::take(&mut self.pages)
                .into_iter()
                .partition(|page| self.selection.contains(&page.id()));

        let at = (target - 1).min(remaining.len());
        let moved = moving.len();
        remaining.splice(at..at, moving);
        self.pages = remaining;
        self.selection.clear();

        info!(moved, target, "Pages moved");
        Ok(())
    }

    /// Remove every selected page. Clears the selection.
    ///
    /// With nothing selected this is a no-op and never reports `now_empty`.
    pub fn delete_selected(&mut self) -> DeleteOutcome {
        if self.selection.is_empty() {
            return DeleteOutcome::default();
        }

        let before = self.pages.len();
        let selection = std::mem::take(&mut self.selection);
        self.pages.retain(|page| !selection.contains(&page.id()));
        let removed = before - self.pages.len();

        let outcome = DeleteOutcome {
            removed,
            now_empty: removed > 0 && self.pages.is_empty(),
        };
        info!(removed, remaining = self.pages.len(), "Pages deleted");
        outcome
    }

    /// Stable sort by original position. Clears the selection.
    pub fn restore_original_order(&mut self) {
        self.pages.sort_by_key(PageRecord::original_position);
        self.selection.clear();
        info!(pages = self.pages.len(), "Original order restored");
    }

    /// Remove every page and the selection.
    pub fn clear_all(&mut self) {
        let cleared = self.pages.len();
        self.pages.clear();
        self.selection.clear();
        info!(cleared, "Collection cleared");
    }

    /// Roll back to the first `len` pages.
    pub(crate) fn truncate_to(&mut self, len: usize) {
        self.pages.truncate(len);
        self.prune_selection();
    }

    fn next_position(&self) -> u32 {
        u32::try_from(self.pages.len() + 1).unwrap_or(u32::MAX)
    }
}
