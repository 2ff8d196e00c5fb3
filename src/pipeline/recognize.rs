//! Character recognition: run tesseract over one rendered page.
//!
//! The recognition mode is fixed, not configurable:
//!
//! | setting | value | meaning |
//! |---------|-------|---------|
//! | `-l`    | `ben+eng` | Bangla and English models loaded together, so mixed-script lines work |
//! | `--oem` | `1` | LSTM engine only |
//! | `--psm` | `6` | assume a single uniform block of text; no column detection |
//!
//! The page is streamed to tesseract's stdin as PNG and the text read back
//! from stdout, so no temporary files are involved. The child process is
//! killed if the caller drops the future (e.g. on a timeout).

use crate::config::{ExtractionConfig, TesseractLocation};
use crate::error::BanglaOcrError;
use crate::pipeline::encode::encode_png;
use crate::pipeline::render::PageImage;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Language models loaded for every page.
pub const LANGUAGES: &str = "ben+eng";

/// Tesseract OCR engine mode: LSTM only.
pub const ENGINE_MODE: u8 = 1;

/// Tesseract page segmentation mode: single uniform block of text.
pub const PAGE_SEGMENTATION_MODE: u8 = 6;

/// A backend that turns one page image into text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize the text on `page`. The returned string is raw recognizer
    /// output; normalisation happens in the pipeline.
    async fn recognize(&self, page: &PageImage) -> Result<String, BanglaOcrError>;

    /// Check that the backend can run at all. Called once at startup by
    /// callers that want to fail fast.
    async fn verify(&self) -> Result<(), BanglaOcrError> {
        Ok(())
    }
}

/// [`Recognizer`] that shells out to the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractRecognizer {
    pub fn new(location: &TesseractLocation, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            program: location.program(),
            tessdata_dir,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.tesseract, config.tessdata_dir.clone())
    }

    /// Arguments for recognizing one PNG read from stdin.
    pub fn recognition_args(&self) -> Vec<OsString> {
        let mut args = self.common_args();
        args.extend(
            [
                "stdin".to_string(),
                "stdout".to_string(),
                "-l".to_string(),
                LANGUAGES.to_string(),
                "--oem".to_string(),
                ENGINE_MODE.to_string(),
                "--psm".to_string(),
                PAGE_SEGMENTATION_MODE.to_string(),
                // Tesseract ends each page with a form feed by default.
                "-c".to_string(),
                "page_separator=".to_string(),
            ]
            .map(OsString::from),
        );
        args
    }

    fn common_args(&self) -> Vec<OsString> {
        match &self.tessdata_dir {
            Some(dir) => vec!["--tessdata-dir".into(), dir.clone().into_os_string()],
            None => Vec::new(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn unavailable(&self, e: std::io::Error) -> BanglaOcrError {
        BanglaOcrError::RecognizerUnavailable {
            program: self.program_name(),
            detail: e.to_string(),
        }
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, page: &PageImage) -> Result<String, BanglaOcrError> {
        let page_num = page.page_num();
        let png = encode_png(&page.image).map_err(|e| BanglaOcrError::RecognitionFailed {
            page: page_num,
            detail: format!("PNG encoding failed: {}", e),
        })?;

        let mut child = Command::new(&self.program)
            .args(self.recognition_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.unavailable(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BanglaOcrError::Internal("tesseract stdin not captured".into()))?;
        let writer = tokio::spawn(async move {
            stdin.write_all(&png).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| BanglaOcrError::RecognitionFailed {
                page: page_num,
                detail: format!("waiting for tesseract: {}", e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("Page {}: tesseract stderr: {}", page_num, stderr.trim());
        }

        if !output.status.success() {
            warn!("Page {}: tesseract exited with {}", page_num, output.status);
            return Err(BanglaOcrError::RecognitionFailed {
                page: page_num,
                detail: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        // A write error after a successful exit means tesseract stopped reading
        // early; its output cannot be trusted.
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(BanglaOcrError::RecognitionFailed {
                    page: page_num,
                    detail: format!("writing page image to tesseract: {}", e),
                })
            }
            Err(e) => {
                return Err(BanglaOcrError::Internal(format!(
                    "tesseract stdin task panicked: {}",
                    e
                )))
            }
        }

        String::from_utf8(output.stdout).map_err(|e| BanglaOcrError::RecognitionFailed {
            page: page_num,
            detail: format!("tesseract produced invalid UTF-8: {}", e),
        })
    }

    /// Run `tesseract --list-langs` and check every model in [`LANGUAGES`] is installed.
    async fn verify(&self) -> Result<(), BanglaOcrError> {
        let mut args = self.common_args();
        args.push("--list-langs".into());

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(BanglaOcrError::RecognizerUnavailable {
                program: self.program_name(),
                detail: format!(
                    "--list-langs exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // Tesseract 3.x prints the list on stderr, later versions on stdout.
        let listing = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let installed = parse_language_list(&listing);
        check_languages(&installed)?;

        info!("tesseract ready: {} installed", LANGUAGES);
        Ok(())
    }
}

/// Extract language codes from `tesseract --list-langs` output.
pub fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("List of available languages"))
        .filter(|l| !l.contains(' '))
        .map(str::to_string)
        .collect()
}

/// Ensure each language in [`LANGUAGES`] appears in `installed`.
pub fn check_languages(installed: &[String]) -> Result<(), BanglaOcrError> {
    for language in LANGUAGES.split('+') {
        if !installed.iter().any(|l| l == language) {
            return Err(BanglaOcrError::MissingLanguagePack {
                language: language.to_string(),
                installed: installed.join(", "),
            });
        }
    }
    Ok(())
}
