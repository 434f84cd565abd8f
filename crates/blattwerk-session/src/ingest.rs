// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ingestion pipeline: raw file bytes in, page records out.
//
// Files are processed strictly in the order supplied. A file's pages are
// staged and appended only after the whole file decoded, so a failure half
// way through a PDF leaves no partial pages behind. Per-file failures are
// logged and skipped; a fatal error rolls the collection back to its length
// before the batch and aborts.

use std::sync::Arc;

use blattwerk_core::config::SessionConfig;
use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::InputFormat;
use blattwerk_document::{ImageProcessor, PageRasterizer};
use image::RgbaImage;
use tracing::{debug, error, info, instrument, warn};

use crate::collection::PageCollection;
use crate::progress::{ProgressSink, ProgressTracker};
use crate::record::{PageRecord, SourceFile};

/// Share of the progress range spent on a PDF before its first page renders.
const STRUCTURE_SHARE: f32 = 0.1;

/// One file handed in by the platform (file dialog or drag and drop).
#[derive(Debug, Clone)]
pub struct IngestFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
    /// Declared MIME type; when absent the extension of `name` decides.
    pub mime_type: Option<String>,
}

impl IngestFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    pub fn with_mime(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn format(&self) -> Option<InputFormat> {
        InputFormat::resolve(self.mime_type.as_deref(), &self.name)
    }
}

/// Why a file contributed no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the MIME type nor the extension names a supported format.
    Unsupported,
    /// The file was recognised but could not be decoded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub name: String,
    pub reason: SkipReason,
}

/// Aggregate result of one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub pages_added: usize,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Decode `files` and append their pages to `collection`.
///
/// Emits no progress when `files` is empty.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn ingest(
    collection: &mut PageCollection,
    files: Vec<IngestFile>,
    rasterizer: &dyn PageRasterizer,
    config: &SessionConfig,
    progress: &mut dyn ProgressSink,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();
    if files.is_empty() {
        return Ok(report);
    }

    let total = files.len();
    let start_len = collection.len();
    let mut tracker = ProgressTracker::new(progress);
    tracker.report(5.0, format!("Loading {} file(s)...", total));

    let share = 80.0 / total as f32;
    for (i, file) in files.into_iter().enumerate() {
        let base = 5.0 + share * i as f32;
        tracker.report(
            base,
            format!("Processing {} ({}/{})...", file.name, i + 1, total),
        );

        let Some(format) = file.format() else {
            debug!(file = %file.name, "Skipping unsupported file");
            report.skipped.push(SkippedFile {
                name: file.name,
                reason: SkipReason::Unsupported,
            });
            continue;
        };

        let staged = match format {
            InputFormat::Pdf => {
                rasterize_pdf(&file, rasterizer, config.raster_scale, base, share, &mut tracker)
                    .await
            }
            _ => decode_image(&file, format).await,
        };

        match staged {
            Ok(pages) => {
                let source = Arc::new(SourceFile::new(file.name, format, file.bytes));
                let count = pages.len();
                for (raster, page_number) in pages {
                    collection.append(PageRecord::new(raster, Arc::clone(&source), page_number));
                }
                report.pages_added += count;
                report.files_loaded += 1;
                info!(file = %source.name, pages = count, "File ingested");
            }
            Err(err) if err.is_fatal() => {
                collection.truncate_to(start_len);
                error!(file = %file.name, error = %err, "Ingestion aborted");
                return Err(err);
            }
            Err(err) => {
                warn!(file = %file.name, error = %err, "Skipping file that failed to load");
                report.skipped.push(SkippedFile {
                    name: file.name,
                    reason: SkipReason::Failed(err.to_string()),
                });
            }
        }
    }

    tracker.report(90.0, "Arranging pages...");
    tokio::task::yield_now().await;
    tracker.report(100.0, format!("{} pages loaded", report.pages_added));

    info!(
        pages_added = report.pages_added,
        skipped = report.skipped.len(),
        "Ingestion complete"
    );
    Ok(report)
}

/// Render every page of a PDF, in ascending page order.
async fn rasterize_pdf(
    file: &IngestFile,
    rasterizer: &dyn PageRasterizer,
    scale: f32,
    base: f32,
    share: f32,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Vec<(RgbaImage, Option<u32>)>> {
    let page_count = rasterizer.page_count(&file.bytes)?;
    tracker.report(
        base + share * STRUCTURE_SHARE,
        format!("Loaded {} ({} pages)", file.name, page_count),
    );

    let mut pages = Vec::with_capacity(page_count as usize);
    for page_number in 1..=page_count {
        let raster = rasterizer.render_page(&file.bytes, page_number, scale)?;
        if raster.width() == 0 || raster.height() == 0 {
            return Err(BlattwerkError::Rasterize(format!(
                "page {} of {} rendered empty",
                page_number, file.name
            )));
        }
        pages.push((raster, Some(page_number)));

        let done = page_number as f32 / page_count as f32;
        tracker.report(
            base + share * (STRUCTURE_SHARE + (1.0 - STRUCTURE_SHARE) * done),
            format!(
                "Rendering page {}/{} of {}...",
                page_number, page_count, file.name
            ),
        );
        tokio::task::yield_now().await;
    }
    Ok(pages)
}

async fn decode_image(
    file: &IngestFile,
    format: InputFormat,
) -> Result<Vec<(RgbaImage, Option<u32>)>> {
    let raster = ImageProcessor::from_bytes(&file.bytes, format)?.into_rgba();
    tokio::task::yield_now().await;
    Ok(vec![(raster, None)])
}
