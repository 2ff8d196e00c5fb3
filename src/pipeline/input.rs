//! Input validation: reject buffers that can never render before PDFium sees them.
//!
//! PDFium reports a malformed buffer as a generic load failure. Checking the
//! `%PDF` header and the configured size limit up front gives callers a
//! precise error and keeps oversize uploads out of the renderer entirely.

use crate::error::BanglaOcrError;
use std::path::Path;
use tracing::debug;

/// PDF header signature.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// PDF readers accept the header anywhere in the first 1024 bytes.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

/// Validate that `bytes` looks like a PDF no larger than `max_bytes`.
pub fn validate_pdf_bytes(bytes: &[u8], max_bytes: usize) -> Result<(), BanglaOcrError> {
    if bytes.is_empty() {
        return Err(BanglaOcrError::EmptyInput);
    }
    if bytes.len() > max_bytes {
        return Err(BanglaOcrError::InputTooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    let Some(offset) = header_offset(bytes) else {
        let magic = bytes[..bytes.len().min(PDF_MAGIC.len())].to_vec();
        return Err(BanglaOcrError::NotAPdf { magic });
    };
    debug!(
        "Input buffer accepted: {} bytes, header at offset {}",
        bytes.len(),
        offset
    );
    Ok(())
}

fn header_offset(bytes: &[u8]) -> Option<usize> {
    bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)]
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
}

/// Read a local file into memory.
///
/// The pipeline itself only ever sees byte buffers; this helper exists for
/// callers (the CLI, tests) that start from a path.
pub async fn read_pdf_file(path: &Path) -> Result<Vec<u8>, BanglaOcrError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| BanglaOcrError::FileReadFailed {
            path: path.to_path_buf(),
            source: e,
        })
}
