// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session controller: the single owner of the collection. Platform glue
// turns menu items, buttons and drops into `Command`s and hands them here.

use blattwerk_core::config::SessionConfig;
use blattwerk_core::error::Result;
use blattwerk_core::types::{ExportKind, SelectMode, Theme, ViewMode};
use blattwerk_document::PageRasterizer;
use tracing::{debug, info};

use crate::collection::{DeleteOutcome, PageCollection};
use crate::export::{ExportOutcome, export};
use crate::ingest::{IngestFile, IngestReport, ingest};
use crate::progress::ProgressSink;

/// A user command.
#[derive(Debug, Clone)]
pub enum Command {
    Open(Vec<IngestFile>),
    ClearAll,
    SaveUnified,
    SaveSelected,
    ExportPdfArchive,
    ExportPngArchive,
    SelectAll,
    ClearSelection,
    Select { index: usize, mode: SelectMode },
    DeleteSelected,
    Duplicate,
    Rotate,
    /// 1-based target position.
    MoveToPosition(usize),
    RestoreOriginalOrder,
    ToggleViewMode,
    ToggleTheme,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::ClearAll => "clear-all",
            Self::SaveUnified => "save-unified",
            Self::SaveSelected => "save-selected",
            Self::ExportPdfArchive => "export-pdf-archive",
            Self::ExportPngArchive => "export-png-archive",
            Self::SelectAll => "select-all",
            Self::ClearSelection => "clear-selection",
            Self::Select { .. } => "select",
            Self::DeleteSelected => "delete-selected",
            Self::Duplicate => "duplicate",
            Self::Rotate => "rotate",
            Self::MoveToPosition(_) => "move-to-position",
            Self::RestoreOriginalOrder => "restore-original-order",
            Self::ToggleViewMode => "toggle-view-mode",
            Self::ToggleTheme => "toggle-theme",
        }
    }
}

/// What a command did, for the UI to react to.
#[derive(Debug)]
pub enum CommandOutcome {
    Ingested(IngestReport),
    /// `None` when there was nothing to export.
    Exported(Option<ExportOutcome>),
    Deleted(DeleteOutcome),
    Duplicated(usize),
    Rotated(usize),
    ViewMode(ViewMode),
    Theme(Theme),
    /// The collection or selection changed; redraw.
    Updated,
}

/// One editing session. Nothing here outlives the process.
pub struct Session {
    collection: PageCollection,
    config: SessionConfig,
    rasterizer: Box<dyn PageRasterizer>,
    view_mode: ViewMode,
    theme: Theme,
}

impl Session {
    pub fn new(rasterizer: Box<dyn PageRasterizer>) -> Self {
        Self {
            collection: PageCollection::new(),
            config: SessionConfig::default(),
            rasterizer,
            view_mode: ViewMode::default(),
            theme: Theme::default(),
        }
    }

    /// Start a session with custom settings, rejecting invalid ones.
    pub fn with_config(rasterizer: Box<dyn PageRasterizer>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(rasterizer)
        })
    }

    pub fn collection(&self) -> &PageCollection {
        &self.collection
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Run `command` to completion.
    ///
    /// Validation errors leave the session untouched.
    pub async fn dispatch(
        &mut self,
        command: Command,
        progress: &mut dyn ProgressSink,
    ) -> Result<CommandOutcome> {
        debug!(command = command.name(), "Dispatching command");
        let outcome = match command {
            Command::Open(files) => CommandOutcome::Ingested(
                ingest(
                    &mut self.collection,
                    files,
                    self.rasterizer.as_ref(),
                    &self.config,
                    progress,
                )
                .await?,
            ),
            Command::ClearAll => {
                self.collection.clear_all();
                CommandOutcome::Updated
            }
            Command::SaveUnified => self.export(ExportKind::Unified, progress).await?,
            Command::SaveSelected => self.export(ExportKind::Selection, progress).await?,
            Command::ExportPdfArchive => self.export(ExportKind::PdfArchive, progress).await?,
            Command::ExportPngArchive => self.export(ExportKind::PngArchive, progress).await?,
            Command::SelectAll => {
                self.collection.select_all();
                CommandOutcome::Updated
            }
            Command::ClearSelection => {
                self.collection.clear_selection();
                CommandOutcome::Updated
            }
            Command::Select { index, mode } => {
                self.collection.select(index, mode)?;
                CommandOutcome::Updated
            }
            Command::DeleteSelected => CommandOutcome::Deleted(self.collection.delete_selected()),
            Command::Duplicate => CommandOutcome::Duplicated(self.collection.duplicate_selected()),
            Command::Rotate => CommandOutcome::Rotated(self.collection.rotate_selected()),
            Command::MoveToPosition(target) => {
                self.collection.move_selected_to(target)?;
                CommandOutcome::Updated
            }
            Command::RestoreOriginalOrder => {
                self.collection.restore_original_order();
                CommandOutcome::Updated
            }
            Command::ToggleViewMode => {
                self.view_mode = self.view_mode.toggled();
                info!(view_mode = ?self.view_mode, "View mode changed");
                CommandOutcome::ViewMode(self.view_mode)
            }
            Command::ToggleTheme => {
                self.theme = self.theme.toggled();
                info!(theme = ?self.theme, "Theme changed");
                CommandOutcome::Theme(self.theme)
            }
        };
        Ok(outcome)
    }

    async fn export(
        &self,
        kind: ExportKind,
        progress: &mut dyn ProgressSink,
    ) -> Result<CommandOutcome> {
        let outcome = export(&self.collection, kind, &self.config, progress).await?;
        Ok(CommandOutcome::Exported(outcome))
    }
}
