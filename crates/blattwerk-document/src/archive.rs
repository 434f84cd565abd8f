// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ZIP bundling for per-page exports.

use std::io::{Cursor, Write};

use blattwerk_core::error::BlattwerkError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry name for the page at 0-based `index`: `page_001.pdf`, `page_002.pdf`, ...
///
/// Collections past 999 pages get wider numbers rather than wrapping.
pub fn sequence_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}_{:03}.{}", prefix, index + 1, extension)
}

/// Accumulates files into an in-memory ZIP archive.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    /// Archive whose entries carry the fixed ZIP epoch (1980-01-01), so equal
    /// input gives byte-identical output.
    pub fn new() -> Self {
        Self::with_timestamp(zip::DateTime::default())
    }

    /// Archive whose entries are stamped with `at` (local wall-clock time).
    /// Times outside the ZIP range fall back to the epoch.
    pub fn stamped(at: NaiveDateTime) -> Self {
        let stamp = u16::try_from(at.year())
            .ok()
            .and_then(|year| {
                zip::DateTime::from_date_and_time(
                    year,
                    at.month() as u8,
                    at.day() as u8,
                    at.hour() as u8,
                    at.minute() as u8,
                    at.second() as u8,
                )
                .ok()
            })
            .unwrap_or_default();
        Self::with_timestamp(stamp)
    }

    fn with_timestamp(stamp: zip::DateTime) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(stamp);
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: 0,
        }
    }

    /// Number of files added so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Add a file at the archive root.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<(), BlattwerkError> {
        self.writer
            .start_file(name, self.options)
            .map_err(|err| BlattwerkError::Archive(format!("cannot start {}: {}", name, err)))?;
        self.writer
            .write_all(data)
            .map_err(|err| BlattwerkError::Archive(format!("cannot write {}: {}", name, err)))?;
        self.entries += 1;
        debug!(name, bytes = data.len(), "Archive entry added");
        Ok(())
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, BlattwerkError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|err| BlattwerkError::Archive(format!("cannot finalise archive: {}", err)))?;
        let bytes = cursor.into_inner();
        info!(entries = self.entries, bytes = bytes.len(), "Archive compacted");
        Ok(bytes)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn sequence_names_are_zero_padded() {
        assert_eq!(sequence_name("page", 0, "pdf"), "page_001.pdf");
        assert_eq!(sequence_name("page", 41, "png"), "page_042.png");
        assert_eq!(sequence_name("page", 999, "png"), "page_1000.png");
    }

    #[test]
    fn entries_round_trip_in_insertion_order() {
        let mut builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
        builder.add_file("page_001.png", b"first").unwrap();
        builder.add_file("page_002.png", b"second").unwrap();
        assert_eq!(builder.len(), 2);
        let bytes = builder.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "page_001.png");

        let mut contents = Vec::new();
        archive
            .by_name("page_002.png")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"second");
    }

    #[test]
    fn unstamped_archives_are_byte_identical() {
        let build = || {
            let mut builder = ArchiveBuilder::new();
            builder.add_file("page_001.pdf", b"%PDF-1.5 stub").unwrap();
            builder.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn stamped_entries_differ_from_epoch_entries() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap();
        let build = |mut builder: ArchiveBuilder| {
            builder.add_file("page_001.png", b"x").unwrap();
            builder.finish().unwrap()
        };
        let stamped = build(ArchiveBuilder::stamped(at));
        let epoch = build(ArchiveBuilder::new());
        assert_ne!(stamped, epoch);
        assert_eq!(stamped.len(), epoch.len());

        let archive = zip::ZipArchive::new(Cursor::new(stamped)).unwrap();
        assert_eq!(archive.len(), 1);
    }
}
