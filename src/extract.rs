//! Extraction entry points: PDF bytes in, normalised text out.
//!
//! An [`Extractor`] owns the two resolved backends (renderer and recognizer)
//! and the configuration. Build it once at startup and reuse it for every
//! request; each call to [`Extractor::extract`] is independent and keeps no
//! state between requests.
//!
//! The run is strictly sequential: render everything, then recognize pages
//! one after another in page order. The first failure ends the request and
//! no partial text is returned.

use crate::config::ExtractionConfig;
use crate::error::BanglaOcrError;
use crate::output::{assemble_text, ExtractionOutput, ExtractionStats, PageText};
use crate::pipeline::input::validate_pdf_bytes;
use crate::pipeline::normalize::normalize_page_text;
use crate::pipeline::recognize::{Recognizer, TesseractRecognizer};
use crate::pipeline::render::{render_pages, PageRenderer, PdfiumRenderer, RenderOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The extraction pipeline with its backends resolved.
pub struct Extractor {
    renderer: Arc<dyn PageRenderer>,
    recognizer: Arc<dyn Recognizer>,
    config: ExtractionConfig,
}

impl Extractor {
    /// Locate PDFium and tesseract as described by `config`.
    ///
    /// Fails with [`BanglaOcrError::RendererUnavailable`] when the PDFium
    /// library cannot be loaded. Tesseract is only checked by
    /// [`Extractor::verify_backends`].
    pub fn from_config(config: ExtractionConfig) -> Result<Self, BanglaOcrError> {
        let renderer = PdfiumRenderer::bind(&config.renderer)?;
        let recognizer = TesseractRecognizer::from_config(&config);
        Ok(Self::with_backends(
            Arc::new(renderer),
            Arc::new(recognizer),
            config,
        ))
    }

    /// Assemble an extractor from explicit backends.
    pub fn with_backends(
        renderer: Arc<dyn PageRenderer>,
        recognizer: Arc<dyn Recognizer>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            renderer,
            recognizer,
            config,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Fail fast if the recognizer cannot run (missing binary, missing
    /// language pack).
    pub async fn verify_backends(&self) -> Result<(), BanglaOcrError> {
        self.recognizer.verify().await
    }

    /// Extract the text of every page, in order, each followed by a blank line.
    pub async fn extract_text(&self, pdf: &[u8]) -> Result<String, BanglaOcrError> {
        Ok(self.extract(pdf).await?.text)
    }

    /// Blocking wrapper around [`Extractor::extract_text`].
    ///
    /// Creates a temporary tokio runtime internally; do not call from
    /// inside an async context.
    pub fn extract_text_blocking(&self, pdf: &[u8]) -> Result<String, BanglaOcrError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| BanglaOcrError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.extract_text(pdf))
    }

    /// Run the full pipeline and return the text with per-page details.
    ///
    /// # Errors
    /// - a render failure ([`BanglaOcrError::is_render_failure`]) when the
    ///   buffer is not a PDF, exceeds a limit, or PDFium cannot rasterise it
    /// - a recognition failure ([`BanglaOcrError::is_recognition_failure`])
    ///   when any page fails or times out
    pub async fn extract(&self, pdf: &[u8]) -> Result<ExtractionOutput, BanglaOcrError> {
        let total_start = Instant::now();
        info!("Starting extraction: {} bytes", pdf.len());

        // ── Step 1: Validate input ───────────────────────────────────────────
        validate_pdf_bytes(pdf, self.config.max_input_bytes)?;

        // ── Step 2: Rasterise pages ──────────────────────────────────────────
        let render_start = Instant::now();
        let rendered = render_pages(
            Arc::clone(&self.renderer),
            pdf,
            RenderOptions::from(&self.config),
        )
        .await?;
        let render_duration_ms = render_start.elapsed().as_millis() as u64;
        let total_pages = rendered.len();
        info!("Rendered {} pages in {}ms", total_pages, render_duration_ms);

        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_extraction_start(total_pages);
        }

        // ── Step 3: Recognize and normalise, one page at a time ──────────────
        let recognition_start = Instant::now();
        let mut pages = Vec::with_capacity(total_pages);

        for page in rendered {
            let page_num = page.page_num();
            if let Some(cb) = cb {
                cb.on_page_start(page_num, total_pages);
            }

            let page_start = Instant::now();
            let raw = match tokio::time::timeout(
                self.config.page_timeout,
                self.recognizer.recognize(&page),
            )
            .await
            {
                Ok(Ok(raw)) => raw,
                Ok(Err(e)) => return Err(self.page_failed(page_num, total_pages, e)),
                Err(_) => {
                    let e = BanglaOcrError::RecognitionTimeout {
                        page: page_num,
                        timeout: self.config.page_timeout,
                    };
                    return Err(self.page_failed(page_num, total_pages, e));
                }
            };
            // The image is no longer needed once the page is recognized.
            drop(page);

            let text = normalize_page_text(&raw);
            let chars = text.chars().count();
            let duration_ms = page_start.elapsed().as_millis() as u64;
            debug!(
                "Page {}/{}: {} chars in {}ms",
                page_num, total_pages, chars, duration_ms
            );

            if let Some(cb) = cb {
                cb.on_page_complete(page_num, total_pages, chars);
            }

            pages.push(PageText {
                page_num,
                text,
                chars,
                duration_ms,
            });
        }
        let recognition_duration_ms = recognition_start.elapsed().as_millis() as u64;

        // ── Step 4: Assemble ─────────────────────────────────────────────────
        let text = assemble_text(&pages);

        let stats = ExtractionStats {
            total_pages,
            total_chars: pages.iter().map(|p| p.chars).sum(),
            render_duration_ms,
            recognition_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction complete: {} pages, {} chars, {}ms total",
            total_pages, stats.total_chars, stats.total_duration_ms
        );

        if let Some(cb) = cb {
            cb.on_extraction_complete(total_pages);
        }

        Ok(ExtractionOutput { text, pages, stats })
    }

    fn page_failed(
        &self,
        page_num: usize,
        total_pages: usize,
        error: BanglaOcrError,
    ) -> BanglaOcrError {
        warn!("Page {}/{} failed: {}", page_num, total_pages, error);
        if let Some(cb) = self.config.progress_callback.as_ref() {
            cb.on_page_error(page_num, total_pages, &error.to_string());
        }
        error
    }
}
