//! Word export: turn extracted text into a `.docx` document.
//!
//! The layout is deliberately plain. An optional title comes first, then
//! every non-blank line of the text becomes one paragraph, verbatim and in
//! order. Blank lines (including the page separators) produce nothing.

use crate::error::BanglaOcrError;
use docx_rs::{Docx, Paragraph, Run, RunFonts, Style, StyleType};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

/// MIME type of the exported document.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const TITLE_STYLE: &str = "Title";

/// Options for [`export_docx`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Title paragraph placed before the text. Default: "Converted Bangla Document".
    pub title: Option<String>,
    /// Font applied to every run, for both Latin and complex-script text. Default: Arial.
    pub font: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: Some("Converted Bangla Document".to_string()),
            font: "Arial".to_string(),
        }
    }
}

/// Split `text` into the paragraphs that will be exported.
///
/// Lines are split on `'\n'` only; a line is dropped when it is empty after
/// trimming and kept untrimmed otherwise.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n').filter(|line| !line.trim().is_empty()).collect()
}

/// Build the in-memory document for `text`.
pub fn build_document(text: &str, options: &ExportOptions) -> Docx {
    let fonts = || {
        RunFonts::new()
            .ascii(&options.font)
            .hi_ansi(&options.font)
            .cs(&options.font)
    };

    let mut docx = Docx::new();

    if let Some(ref title) = options.title {
        docx = docx
            .add_style(
                Style::new(TITLE_STYLE, StyleType::Paragraph)
                    .name(TITLE_STYLE)
                    .size(56),
            )
            .add_paragraph(
                Paragraph::new()
                    .style(TITLE_STYLE)
                    .add_run(Run::new().add_text(title).fonts(fonts())),
            );
    }

    for line in paragraphs(text) {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line).fonts(fonts())));
    }

    docx
}

/// Export `text` as `.docx` bytes.
pub fn export_docx(text: &str, options: &ExportOptions) -> Result<Vec<u8>, BanglaOcrError> {
    let mut cursor = Cursor::new(Vec::new());
    build_document(text, options)
        .build()
        .pack(&mut cursor)
        .map_err(|e| BanglaOcrError::ExportFailed(e.to_string()))?;

    let bytes = cursor.into_inner();
    debug!("Exported {} paragraphs → {} bytes", paragraphs(text).len(), bytes.len());
    Ok(bytes)
}

/// Export `text` and write the document to `path`.
pub fn write_docx(
    text: &str,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<(), BanglaOcrError> {
    let bytes = export_docx(text, options)?;
    write_atomic(path.as_ref(), &bytes)?;
    info!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Write `bytes` to `path` via a temp file in the same directory plus a rename,
/// so readers never see a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BanglaOcrError> {
    let write_failed = |source: std::io::Error| BanglaOcrError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
