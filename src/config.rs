//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour that is allowed to vary lives in
//! [`ExtractionConfig`], built via its [`ExtractionConfigBuilder`]. What is
//! *not* here is deliberate: the recognition language set, engine mode,
//! layout mode and normalisation form are fixed constants of the pipeline
//! (see [`crate::pipeline::recognize`]).
//!
//! Backend locations ([`RendererLocation`], [`TesseractLocation`]) are
//! resolved once, when an [`crate::Extractor`] is built from the config.

use crate::error::BanglaOcrError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a PDF extraction.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use bangla_ocr::ExtractionConfig;
/// use std::time::Duration;
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .max_pages(50)
///     .page_timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Where to find the PDFium library. Default: system search.
    pub renderer: RendererLocation,

    /// Where to find the `tesseract` executable. Default: `PATH` lookup.
    pub tesseract: TesseractLocation,

    /// Directory holding `ben.traineddata` / `eng.traineddata`, passed to
    /// tesseract as `--tessdata-dir`. Default: tesseract's own default.
    pub tessdata_dir: Option<PathBuf>,

    /// Rendering DPI used when rasterising each page. Range: 72–600. Default: 200.
    ///
    /// Tesseract's LSTM models are trained on text around 30 px x-height;
    /// 200 DPI puts ordinary 10–12 pt Bangla print in that range.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 6000.
    ///
    /// Caps memory for oversized pages (posters, engineering drawings)
    /// independently of DPI.
    pub max_rendered_pixels: u32,

    /// Documents with more pages are rejected before rendering. Default: 500.
    pub max_pages: usize,

    /// Buffers larger than this are rejected before rendering. Default: 100 MiB.
    pub max_input_bytes: usize,

    /// Upper bound on recognition time for a single page. Default: 120 s.
    pub page_timeout: Duration,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            renderer: RendererLocation::default(),
            tesseract: TesseractLocation::default(),
            tessdata_dir: None,
            dpi: 200,
            max_rendered_pixels: 6000,
            max_pages: 500,
            max_input_bytes: 100 * 1024 * 1024,
            page_timeout: Duration::from_secs(120),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("renderer", &self.renderer)
            .field("tesseract", &self.tesseract)
            .field("tessdata_dir", &self.tessdata_dir)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_pages", &self.max_pages)
            .field("max_input_bytes", &self.max_input_bytes)
            .field("page_timeout", &self.page_timeout)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn renderer(mut self, location: RendererLocation) -> Self {
        self.config.renderer = location;
        self
    }

    pub fn tesseract(mut self, location: TesseractLocation) -> Self {
        self.config.tesseract = location;
        self
    }

    pub fn tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tessdata_dir = Some(dir.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n;
        self
    }

    pub fn max_input_bytes(mut self, n: usize) -> Self {
        self.config.max_input_bytes = n;
        self
    }

    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.config.page_timeout = timeout;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, BanglaOcrError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(BanglaOcrError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.max_pages == 0 {
            return Err(BanglaOcrError::InvalidConfig("max_pages must be ≥ 1".into()));
        }
        if c.max_input_bytes == 0 {
            return Err(BanglaOcrError::InvalidConfig(
                "max_input_bytes must be ≥ 1".into(),
            ));
        }
        if c.page_timeout.is_zero() {
            return Err(BanglaOcrError::InvalidConfig(
                "page_timeout must be non-zero".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Backend locations ────────────────────────────────────────────────────

/// How to locate the PDFium shared library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererLocation {
    /// Let the dynamic loader search the system library path. (default)
    #[default]
    System,
    /// Load the platform-named library (`libpdfium.so`, `libpdfium.dylib`,
    /// `pdfium.dll`) from this directory.
    Directory(PathBuf),
}

/// How to locate the `tesseract` executable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TesseractLocation {
    /// Run `tesseract` from `PATH`. (default)
    #[default]
    System,
    /// Run the executable at this path.
    Executable(PathBuf),
}

impl TesseractLocation {
    /// The program name or path handed to the process spawner.
    pub fn program(&self) -> PathBuf {
        match self {
            TesseractLocation::System => PathBuf::from("tesseract"),
            TesseractLocation::Executable(p) => p.clone(),
        }
    }
}
