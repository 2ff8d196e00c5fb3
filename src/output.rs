//! Result types produced by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Text appended after every page in the assembled result.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Everything one extraction run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// All page texts in page order, each followed by [`PAGE_SEPARATOR`].
    pub text: String,
    /// Per-page results, in page order.
    pub pages: Vec<PageText>,
    pub stats: ExtractionStats,
}

/// The recognized and NFC-normalised text of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    pub text: String,
    /// Character (not byte) count of `text`.
    pub chars: usize,
    /// Wall-clock recognition time for this page.
    pub duration_ms: u64,
}

/// Timing and size figures for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub total_pages: usize,
    pub total_chars: usize,
    pub render_duration_ms: u64,
    pub recognition_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Concatenate page texts in order, appending the separator after each one.
///
/// Empty pages still contribute their separator, so the result always holds
/// exactly `pages.len()` separator-terminated segments.
pub fn assemble_text(pages: &[PageText]) -> String {
    let capacity = pages
        .iter()
        .map(|p| p.text.len() + PAGE_SEPARATOR.len())
        .sum();
    let mut text = String::with_capacity(capacity);
    for page in pages {
        text.push_str(&page.text);
        text.push_str(PAGE_SEPARATOR);
    }
    text
}
