//! # bangla-ocr
//!
//! Extract text from scanned Bangla (and English) PDFs with tesseract, repair
//! it with Unicode NFC normalisation, and export it to Word.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Input      check signature and size limit
//!  ├─ 2. Render     rasterise every page via PDFium (spawn_blocking)
//!  ├─ 3. Recognize  tesseract -l ben+eng --oem 1 --psm 6, one page at a time
//!  ├─ 4. Normalize  NFC: compose split vowel signs (ে + া → ো)
//!  └─ 5. Assemble   page texts in order, each followed by a blank line
//! ```
//!
//! The text can then be handed to [`export::export_docx`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bangla_ocr::{export_docx, ExportOptions, ExtractionConfig, Extractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Extractor::from_config(ExtractionConfig::default())?;
//!     let pdf = std::fs::read("scan.pdf")?;
//!     let text = extractor.extract_text(&pdf).await?;
//!     std::fs::write("scan_converted.docx", export_docx(&text, &ExportOptions::default())?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bangla-ocr` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirements
//!
//! - `libpdfium` on the library search path, or a directory passed as
//!   [`RendererLocation::Directory`]
//! - `tesseract` 4+ with the `ben` and `eng` language packs

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, RendererLocation, TesseractLocation};
pub use error::BanglaOcrError;
pub use export::{export_docx, write_docx, ExportOptions, DOCX_MIME_TYPE};
pub use extract::Extractor;
pub use output::{ExtractionOutput, ExtractionStats, PageText, PAGE_SEPARATOR};
pub use pipeline::normalize::normalize_page_text;
pub use pipeline::recognize::{Recognizer, TesseractRecognizer};
pub use pipeline::render::{PageImage, PageRenderer, PdfiumRenderer, RenderOptions};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{converted_file_name, ConversionRecord, Session};
