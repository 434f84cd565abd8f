// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress side channel for long-running operations.

use blattwerk_core::types::Progress;
use tokio::sync::mpsc::UnboundedSender;

/// Receives progress events from ingestion and export.
pub trait ProgressSink {
    fn report(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressSink for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Forward events to a channel. A closed receiver is ignored.
impl ProgressSink for UnboundedSender<Progress> {
    fn report(&mut self, progress: Progress) {
        let _ = self.send(progress);
    }
}

/// Collect events in memory.
impl ProgressSink for Vec<Progress> {
    fn report(&mut self, progress: Progress) {
        self.push(progress);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Wraps a sink so the reported percentage never decreases and never
/// exceeds 100.
pub(crate) struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: u8,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: 0 }
    }

    pub(crate) fn report(&mut self, percent: f32, message: impl Into<String>) {
        let clamped = if percent.is_finite() {
            percent.clamp(0.0, 100.0).round() as u8
        } else {
            self.last
        };
        self.last = clamped.max(self.last);
        self.sink.report(Progress::new(self.last, message));
    }
}
