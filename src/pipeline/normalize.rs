//! Unicode normalisation of recognized text.
//!
//! Tesseract's Bangla model frequently emits a vowel sign as its canonical
//! decomposition, e.g. `ে` + `া` (U+09C7 U+09BE) instead of `ো` (U+09CB).
//! Many fonts and editors render the two-code-point form as a dotted circle
//! next to a detached sign. Canonical composition (NFC) folds such sequences
//! back into the precomposed character wherever Unicode defines one.
//!
//! NFC is the only transformation applied. Zero-width joiners and
//! non-joiners are meaningful in Bangla conjuncts and are left untouched.

use unicode_normalization::UnicodeNormalization;

/// Normalise one page of recognized text to NFC.
pub fn normalize_page_text(text: &str) -> String {
    text.nfc().collect()
}
