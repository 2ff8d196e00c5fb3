//! Per-session state for interactive callers.
//!
//! A front-end keeps the most recent result (and the name of the file it came
//! from) so that previewing and exporting do not re-run the pipeline. That
//! state lives in a [`Session`] value owned by the caller and passed to its
//! display code; the extraction pipeline itself never sees it.

use crate::export::{export_docx, ExportOptions};
use crate::error::BanglaOcrError;

/// The latest successful conversion of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord {
    /// Name of the uploaded file, as the user supplied it.
    pub file_name: String,
    /// The extracted, normalised text.
    pub text: String,
}

/// State scoped to one user session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    latest: Option<ConversionRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a successful conversion, replacing any earlier one.
    pub fn record(&mut self, file_name: impl Into<String>, text: impl Into<String>) {
        self.latest = Some(ConversionRecord {
            file_name: file_name.into(),
            text: text.into(),
        });
    }

    pub fn latest(&self) -> Option<&ConversionRecord> {
        self.latest.as_ref()
    }

    /// Forget the current result.
    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// Download name for the Word export of the latest result.
    pub fn export_file_name(&self) -> Option<String> {
        self.latest
            .as_ref()
            .map(|record| converted_file_name(&record.file_name))
    }

    /// Export the latest result, or `None` when nothing has been converted yet.
    pub fn export_latest(
        &self,
        options: &ExportOptions,
    ) -> Option<Result<Vec<u8>, BanglaOcrError>> {
        self.latest
            .as_ref()
            .map(|record| export_docx(&record.text, options))
    }
}

/// `scan.pdf` → `scan_converted.docx`.
///
/// Every `.pdf` occurrence is replaced. Names without one get the suffix
/// appended.
pub fn converted_file_name(file_name: &str) -> String {
    if file_name.contains(".pdf") {
        file_name.replace(".pdf", "_converted.docx")
    } else {
        format!("{file_name}_converted.docx")
    }
}
