//! Error types for the bangla-ocr library.
//!
//! Every failure is fatal to the request that produced it: there is no
//! per-page recovery and no partial output. The extraction pipeline can only
//! fail in two ways, and [`BanglaOcrError`] groups its variants accordingly:
//!
//! * **Render failures**: the buffer could not be turned into page images
//!   (not a PDF, corrupt, over the configured limits, PDFium missing).
//!   See [`BanglaOcrError::is_render_failure`].
//!
//! * **Recognition failures**: tesseract could not be run, exited with an
//!   error, or exceeded the per-page timeout.
//!   See [`BanglaOcrError::is_recognition_failure`].
//!
//! The remaining variants belong to the surrounding layers (export, file
//! I/O, configuration).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// All errors returned by the bangla-ocr library.
#[derive(Debug, Error)]
pub enum BanglaOcrError {
    // ── Render failures ───────────────────────────────────────────────────
    /// The buffer was empty.
    #[error("Input is empty: expected the bytes of a PDF document")]
    EmptyInput,

    /// No `%PDF` header in the first 1024 bytes of the buffer.
    #[error("Input is not a PDF document (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The buffer is larger than `max_input_bytes`.
    #[error("Input is {size} bytes, above the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    /// The document has more pages than `max_pages`.
    #[error("Document has {pages} pages, above the configured limit of {limit}")]
    TooManyPages { pages: usize, limit: usize },

    /// PDFium could not parse the document.
    #[error("PDF is corrupt or unsupported: {detail}")]
    CorruptPdf { detail: String },

    /// The document is encrypted.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// PDFium failed on a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The PDFium library could not be loaded.
    #[error(
        "Failed to bind to the PDFium library: {0}\n\
Install libpdfium or point --pdfium-lib / BANGLA_OCR_PDFIUM_LIB at the directory containing it."
    )]
    RendererUnavailable(String),

    // ── Recognition failures ──────────────────────────────────────────────
    /// The tesseract executable could not be started.
    #[error(
        "Failed to run tesseract '{program}': {detail}\n\
Install tesseract or point --tesseract / BANGLA_OCR_TESSERACT at the executable."
    )]
    RecognizerUnavailable { program: String, detail: String },

    /// A language pack required for mixed Bangla/English recognition is missing.
    #[error("Tesseract language pack '{language}' is not installed (found: {installed})")]
    MissingLanguagePack { language: String, installed: String },

    /// Recognition of a page returned an error.
    #[error("Recognition failed for page {page}: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    /// Recognition of a page exceeded the configured timeout.
    #[error("Recognition of page {page} timed out after {timeout:?}")]
    RecognitionTimeout { page: usize, timeout: Duration },

    // ── Export errors ─────────────────────────────────────────────────────
    /// The Word document could not be assembled.
    #[error("Failed to build Word document: {0}")]
    ExportFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input file.
    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BanglaOcrError {
    /// True when the input could not be turned into page images.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::NotAPdf { .. }
                | Self::InputTooLarge { .. }
                | Self::TooManyPages { .. }
                | Self::CorruptPdf { .. }
                | Self::PasswordRequired
                | Self::RasterisationFailed { .. }
                | Self::RendererUnavailable(_)
        )
    }

    /// True when recognition of a page failed or could not be attempted.
    pub fn is_recognition_failure(&self) -> bool {
        matches!(
            self,
            Self::RecognizerUnavailable { .. }
                | Self::MissingLanguagePack { .. }
                | Self::RecognitionFailed { .. }
                | Self::RecognitionTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = BanglaOcrError::NotAPdf {
            magic: b"PK\x03\x04".to_vec(),
        };
        assert!(e.to_string().contains("not a PDF"), "got: {e}");
        assert!(e.is_render_failure());
        assert!(!e.is_recognition_failure());
    }

    #[test]
    fn too_many_pages_display() {
        let e = BanglaOcrError::TooManyPages {
            pages: 900,
            limit: 500,
        };
        let msg = e.to_string();
        assert!(msg.contains("900"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn timeout_is_recognition_failure() {
        let e = BanglaOcrError::RecognitionTimeout {
            page: 3,
            timeout: Duration::from_secs(120),
        };
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("120s"));
        assert!(e.is_recognition_failure());
        assert!(!e.is_render_failure());
    }

    #[test]
    fn sub_second_timeout_keeps_its_precision() {
        let e = BanglaOcrError::RecognitionTimeout {
            page: 1,
            timeout: Duration::from_millis(250),
        };
        assert!(e.to_string().ends_with("timed out after 250ms"), "{e}");
    }

    #[test]
    fn missing_backend_classification() {
        let render = BanglaOcrError::RendererUnavailable("libpdfium.so not found".into());
        assert!(render.is_render_failure());

        let ocr = BanglaOcrError::RecognizerUnavailable {
            program: "tesseract".into(),
            detail: "No such file or directory".into(),
        };
        assert!(ocr.is_recognition_failure());
        assert!(ocr.to_string().contains("tesseract"));
    }

    #[test]
    fn export_errors_are_neither_class() {
        let e = BanglaOcrError::ExportFailed("zip".into());
        assert!(!e.is_render_failure());
        assert!(!e.is_recognition_failure());
    }
}
