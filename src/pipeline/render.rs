//! PDF rasterisation: turn a PDF buffer into one `DynamicImage` per page.
//!
//! ## Why spawn_blocking?
//!
//! PDFium is a blocking C++ library that keeps thread-local state and is not
//! safe to drive from async code. [`render_pages`] moves the whole render onto
//! Tokio's blocking pool so the runtime's worker threads never stall on it.
//!
//! ## Binding
//!
//! A `Pdfium` handle is neither `Send` nor `Sync`, so it never leaves the
//! blocking thread that renders. [`PdfiumRenderer`] keeps only the
//! [`RendererLocation`]; [`PdfiumRenderer::bind`] loads the library once at
//! startup to surface a missing PDFium early, and every render binds its own
//! handle inside the blocking closure. Renders are serialised process-wide.

use crate::config::{ExtractionConfig, RendererLocation};
use crate::error::BanglaOcrError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// PDFium initialises and tears down process-global state with each handle,
/// so at most one handle may be alive at a time.
static PDFIUM_LOCK: Mutex<()> = Mutex::new(());

/// One rasterised page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 0-indexed position in the document.
    pub index: usize,
    pub image: DynamicImage,
}

impl PageImage {
    /// 1-indexed page number, as shown to users.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }
}

/// Render settings taken from [`ExtractionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub max_rendered_pixels: u32,
    pub max_pages: usize,
}

impl From<&ExtractionConfig> for RenderOptions {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            dpi: config.dpi,
            max_rendered_pixels: config.max_rendered_pixels,
            max_pages: config.max_pages,
        }
    }
}

impl RenderOptions {
    /// PDF user space is 72 units per inch.
    pub fn scale_factor(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

/// A backend that rasterises every page of a PDF, in page order.
///
/// Implementations must return exactly one image per page, ordered by page
/// index, or an error. Partial results are never returned.
pub trait PageRenderer: Send + Sync {
    fn render(&self, pdf: &[u8], options: &RenderOptions)
        -> Result<Vec<PageImage>, BanglaOcrError>;
}

/// Rasterise `pdf` on Tokio's blocking pool.
pub async fn render_pages(
    renderer: Arc<dyn PageRenderer>,
    pdf: &[u8],
    options: RenderOptions,
) -> Result<Vec<PageImage>, BanglaOcrError> {
    let bytes = pdf.to_vec();

    tokio::task::spawn_blocking(move || renderer.render(&bytes, &options))
        .await
        .map_err(|e| BanglaOcrError::Internal(format!("Render task panicked: {}", e)))?
}

// ── PDFium backend ───────────────────────────────────────────────────────

/// [`PageRenderer`] backed by PDFium.
#[derive(Debug, Clone)]
pub struct PdfiumRenderer {
    location: RendererLocation,
}

impl PdfiumRenderer {
    /// Check that PDFium loads from `location` and remember where it is.
    pub fn bind(location: &RendererLocation) -> Result<Self, BanglaOcrError> {
        drop(load_bindings(location)?);
        info!("Found PDFium ({:?})", location);
        Ok(Self {
            location: location.clone(),
        })
    }

    pub fn location(&self) -> &RendererLocation {
        &self.location
    }
}

fn load_bindings(
    location: &RendererLocation,
) -> Result<Box<dyn PdfiumLibraryBindings>, BanglaOcrError> {
    match location {
        RendererLocation::System => Pdfium::bind_to_system_library(),
        RendererLocation::Directory(dir) => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        }
    }
    .map_err(|e| BanglaOcrError::RendererUnavailable(format!("{:?}", e)))
}

impl PageRenderer for PdfiumRenderer {
    fn render(
        &self,
        pdf: &[u8],
        options: &RenderOptions,
    ) -> Result<Vec<PageImage>, BanglaOcrError> {
        let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let pdfium = Pdfium::new(load_bindings(&self.location)?);

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    BanglaOcrError::PasswordRequired
                } else {
                    BanglaOcrError::CorruptPdf { detail: err_str }
                }
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        if total_pages > options.max_pages {
            return Err(BanglaOcrError::TooManyPages {
                pages: total_pages,
                limit: options.max_pages,
            });
        }

        let max_px = options.max_rendered_pixels as i32;
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(options.scale_factor())
            .set_maximum_width(max_px)
            .set_maximum_height(max_px);

        let mut results = Vec::with_capacity(total_pages);

        for idx in 0..total_pages {
            let page = pages
                .get(idx as u16)
                .map_err(|e| BanglaOcrError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?;

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                BanglaOcrError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );

            results.push(PageImage { index: idx, image });
        }

        Ok(results)
    }
}
