//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and a backend (renderer, recognizer) can be swapped
//! without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ recognize ──▶ normalize
//! (bytes)   (pdfium)   (PNG)      (tesseract)   (NFC)
//! ```
//!
//! 1. [`input`]     — validate the buffer (signature, size limit)
//! 2. [`render`]    — rasterise every page; runs in `spawn_blocking` because
//!    PDFium is not async-safe
//! 3. [`encode`]    — PNG-encode a page for the recognizer's stdin
//! 4. [`recognize`] — run tesseract in the fixed `ben+eng` / `--psm 6` mode
//! 5. [`normalize`] — compose split vowel signs and other decomposed
//!    sequences (NFC)

pub mod encode;
pub mod input;
pub mod normalize;
pub mod recognize;
pub mod render;
