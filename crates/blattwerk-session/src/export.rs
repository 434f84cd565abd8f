// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export pipeline: re-encode page rasters into a document or an archive.
//
// Exports only read the collection. The artifact is assembled entirely in
// memory and handed back whole, so a failure never leaves a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use blattwerk_core::config::SessionConfig;
use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::ExportKind;
use blattwerk_document::archive::sequence_name;
use blattwerk_document::image::{encode_jpeg, encode_png};
use blattwerk_document::{ArchiveBuilder, PdfWriter};
use tracing::{info, instrument, warn};

use crate::collection::PageCollection;
use crate::progress::{ProgressSink, ProgressTracker};
use crate::record::PageRecord;

/// A finished export: bytes plus a suggested file name and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir` under its suggested name.
    ///
    /// The bytes go to a hidden temporary file in `dir` that is renamed into
    /// place. On any failure the temporary file is removed, so readers never
    /// observe a half-written artifact.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let target = dir.join(&self.file_name);

        let mut staged = tempfile::Builder::new()
            .prefix(&format!(".{}.", self.file_name))
            .suffix(".partial")
            .tempfile_in(dir)?;
        staged.write_all(&self.bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|err| err.error)?;

        info!(path = %target.display(), bytes = self.bytes.len(), "Artifact saved");
        Ok(target)
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub artifact: Artifact,
    pub pages_written: usize,
    /// Pages that failed to encode and were left out.
    pub pages_skipped: usize,
}

/// Export `collection` as `kind`.
///
/// A selection export with nothing selected fails with `NothingSelected`,
/// even when the collection is empty. Every other kind returns `Ok(None)` for
/// an empty collection. Neither case reports any progress.
#[instrument(skip(collection, config, progress), fields(pages = collection.len()))]
pub async fn export(
    collection: &PageCollection,
    kind: ExportKind,
    config: &SessionConfig,
    progress: &mut dyn ProgressSink,
) -> Result<Option<ExportOutcome>> {
    let pages: Vec<&PageRecord> = match kind {
        ExportKind::Selection => {
            let selected = collection.selected_pages();
            if selected.is_empty() {
                return Err(BlattwerkError::NothingSelected);
            }
            selected
        }
        _ if collection.is_empty() => return Ok(None),
        _ => collection.iter().collect(),
    };

    let mut tracker = ProgressTracker::new(progress);
    tracker.report(5.0, "Starting export...");

    let encoded = if kind.is_archive() {
        export_archive(&pages, kind, config, &mut tracker).await?
    } else {
        export_document(&pages, config, &mut tracker).await?
    };

    tracker.report(100.0, "Export complete");

    let outcome = ExportOutcome {
        artifact: Artifact {
            file_name: config.file_name_for(kind).to_string(),
            mime_type: kind.mime_type(),
            bytes: encoded.bytes,
        },
        pages_written: encoded.written,
        pages_skipped: encoded.skipped,
    };
    info!(
        ?kind,
        written = outcome.pages_written,
        skipped = outcome.pages_skipped,
        bytes = outcome.artifact.bytes.len(),
        "Export finished"
    );
    Ok(Some(outcome))
}

struct Encoded {
    bytes: Vec<u8>,
    written: usize,
    skipped: usize,
}

fn page_progress(index: usize, total: usize) -> f32 {
    10.0 + 80.0 * index as f32 / total as f32
}

/// One PDF, one page per record, in the given order.
async fn export_document(
    pages: &[&PageRecord],
    config: &SessionConfig,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Encoded> {
    let total = pages.len();
    let mut writer = PdfWriter::new();
    let mut skipped = 0;
    let mut last_error = None;

    for (i, page) in pages.iter().enumerate() {
        tracker.report(
            page_progress(i, total),
            format!("Processing page {} of {}...", i + 1, total),
        );
        let added = encode_jpeg(&page.raster, config.jpeg_quality)
            .and_then(|jpeg| writer.add_jpeg_page(&jpeg, page.width(), page.height()));
        if let Err(err) = added {
            if err.is_fatal() {
                return Err(err);
            }
            warn!(page = i + 1, file = %page.source_file_name, error = %err, "Skipping page");
            skipped += 1;
            last_error = Some(err);
        }
        tokio::task::yield_now().await;
    }

    if writer.page_count() == 0 {
        return Err(last_error
            .unwrap_or_else(|| BlattwerkError::PdfError("no pages could be exported".into())));
    }

    tracker.report(90.0, "Finalizing PDF document...");
    tokio::task::yield_now().await;
    let written = writer.page_count();
    let bytes = writer.finish()?;
    Ok(Encoded {
        bytes,
        written,
        skipped,
    })
}

/// One archive entry per record.
///
/// Entries are numbered by pages written, so a skipped page leaves no gap:
/// `page_001`, `page_002`, ... in collection order.
async fn export_archive(
    pages: &[&PageRecord],
    kind: ExportKind,
    config: &SessionConfig,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Encoded> {
    let total = pages.len();
    let mut archive = if config.timestamp_archive_entries {
        ArchiveBuilder::stamped(chrono::Local::now().naive_local())
    } else {
        ArchiveBuilder::new()
    };
    let extension = if kind == ExportKind::PngArchive { "png" } else { "pdf" };
    let mut skipped = 0;
    let mut last_error = None;

    for (i, page) in pages.iter().enumerate() {
        tracker.report(
            page_progress(i, total),
            format!("Converting page {} of {}...", i + 1, total),
        );
        let entry = match kind {
            ExportKind::PngArchive => encode_png(&page.raster),
            _ => encode_jpeg(&page.raster, config.jpeg_quality)
                .and_then(|jpeg| PdfWriter::single_page(&jpeg, page.width(), page.height())),
        };
        match entry {
            Ok(data) => {
                let name = sequence_name(&config.page_name_prefix, archive.len(), extension);
                archive.add_file(&name, &data)?;
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(page = i + 1, file = %page.source_file_name, error = %err, "Skipping page");
                skipped += 1;
                last_error = Some(err);
            }
        }
        tokio::task::yield_now().await;
    }

    if archive.is_empty() {
        return Err(last_error
            .unwrap_or_else(|| BlattwerkError::Archive("no pages could be exported".into())));
    }

    tracker.report(90.0, "Compressing ZIP archive...");
    tokio::task::yield_now().await;
    let written = archive.len();
    let bytes = archive.finish()?;
    Ok(Encoded {
        bytes,
        written,
        skipped,
    })
}
