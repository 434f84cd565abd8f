// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk: page collection, selection, ingestion and export.
//
// A `Session` owns one `PageCollection`. Platform glue feeds it files and
// user commands; long-running commands report through a `ProgressSink` and
// hand back finished `Artifact`s.

pub mod collection;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod progress;
pub mod record;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use collection::{DeleteOutcome, PageCollection};
pub use export::{Artifact, ExportOutcome, export};
pub use ingest::{IngestFile, IngestReport, SkipReason, SkippedFile, ingest};
pub use progress::{NoProgress, ProgressSink};
pub use record::{PageRecord, SourceFile};
pub use session::{Command, CommandOutcome, Session};
pub use view::{LoadedFile, PageSummary};
