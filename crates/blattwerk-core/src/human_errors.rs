// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the dialogs shown by the shell.
//
// Every technical error is mapped to a short heading and a suggestion. The
// severity drives how the dialog is presented.

use crate::error::BlattwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing happened; the user needs to change the request.
    Notice,
    /// Part of the work was skipped, the rest went through.
    Warning,
    /// The operation was aborted.
    Failure,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `BlattwerkError` into a `HumanError` for the shell's dialogs.
pub fn humanize_error(err: &BlattwerkError) -> HumanError {
    match err {
        BlattwerkError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "Open PDF, JPEG, PNG, BMP or TIFF files. (File type: {detail})"
            ),
            severity: Severity::Warning,
        },

        BlattwerkError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. The other files were loaded; try a different copy of this one.".into(),
            severity: Severity::Warning,
        },

        BlattwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Warning,
        },

        BlattwerkError::Rasterize(_) => HumanError {
            message: "A PDF page couldn't be drawn.".into(),
            suggestion: "The file may use features the renderer doesn't understand. Try printing it to a new PDF first.".into(),
            severity: Severity::Warning,
        },

        BlattwerkError::RasterizerUnavailable(_) => HumanError {
            message: "PDF files can't be opened right now.".into(),
            suggestion: "The PDF renderer is missing. Reinstall the application, or open images instead.".into(),
            severity: Severity::Failure,
        },

        BlattwerkError::Archive(_) => HumanError {
            message: "The ZIP file couldn't be created.".into(),
            suggestion: "Try the export again. If this keeps happening, export fewer pages at a time.".into(),
            severity: Severity::Failure,
        },

        BlattwerkError::InvalidPosition { len, .. } => HumanError {
            message: "Please enter a valid position.".into(),
            suggestion: format!("Choose a position between 1 and {len}."),
            severity: Severity::Notice,
        },

        BlattwerkError::IndexOutOfRange { .. } => HumanError {
            message: "That page no longer exists.".into(),
            suggestion: "The page list changed. Click the page again.".into(),
            severity: Severity::Notice,
        },

        BlattwerkError::NothingSelected => HumanError {
            message: "No pages selected.".into(),
            suggestion: "Select pages first, then try again.".into(),
            severity: Severity::Notice,
        },

        BlattwerkError::InvalidConfig(detail) => HumanError {
            message: "The settings aren't valid.".into(),
            suggestion: format!("Default settings will be used instead. ({detail})"),
            severity: Severity::Notice,
        },

        BlattwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to write there.".into(),
                    suggestion: "Choose a different folder and save again.".into(),
                    severity: Severity::Failure,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Failure,
                }
            }
        }

        BlattwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Failure,
        },
    }
}
