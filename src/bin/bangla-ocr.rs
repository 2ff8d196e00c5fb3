//! CLI binary for bangla-ocr.
//!
//! A thin shim over the library crate: maps flags to `ExtractionConfig`,
//! runs the extraction under a progress bar, and writes the Word document
//! and/or the plain text.

use anyhow::{Context, Result};
use bangla_ocr::export::write_atomic;
use bangla_ocr::pipeline::input::read_pdf_file;
use bangla_ocr::{
    write_docx, ExportOptions, ExtractionConfig, ExtractionProgressCallback, Extractor,
    ProgressCallback, RendererLocation, Session, TesseractLocation,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while PDFium renders, then a bar
/// with one log line per recognized page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Rasterising pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Take the bar off screen when the run fails outside any page callback
    /// (e.g. PDFium rejects the file), so the error is not printed under a
    /// still-ticking spinner.
    fn fail(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Recognizing");
        self.bar.reset_eta();
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.bar
            .set_message(format!("Processing Page {page_num} of {total_pages}..."));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total_pages,
            red(error.lines().next().unwrap_or(error)),
        ));
        self.bar.abandon();
    }

    fn on_extraction_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages recognized",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert to scan_converted.docx next to the input
  bangla-ocr scan.pdf

  # Choose the Word file name and also keep the plain text
  bangla-ocr scan.pdf -o book.docx --text book.txt

  # Print the text only
  bangla-ocr scan.pdf --no-docx --print

  # Check that PDFium and tesseract (ben + eng) are usable
  bangla-ocr --check

ENVIRONMENT VARIABLES:
  BANGLA_OCR_PDFIUM_DIR   Directory containing libpdfium (default: system search)
  BANGLA_OCR_TESSERACT    Path to the tesseract executable (default: PATH)
  TESSDATA_PREFIX         Read by tesseract itself when --tessdata-dir is not given
  RUST_LOG                Log filter, e.g. bangla_ocr=debug
"#;

/// OCR scanned Bangla/English PDFs into Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "bangla-ocr",
    version,
    about = "OCR scanned Bangla/English PDFs into Unicode-correct text and Word documents",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to convert.
    #[arg(required_unless_present = "check")]
    input: Option<PathBuf>,

    /// Word output path. Default: <input>_converted.docx next to the input.
    #[arg(short, long, env = "BANGLA_OCR_OUTPUT")]
    output: Option<PathBuf>,

    /// Do not write a Word document.
    #[arg(long, env = "BANGLA_OCR_NO_DOCX")]
    no_docx: bool,

    /// Also write the extracted text to this file.
    #[arg(long, env = "BANGLA_OCR_TEXT")]
    text: Option<PathBuf>,

    /// Print the extracted text to stdout.
    #[arg(long)]
    print: bool,

    /// Print structured JSON (text, pages, stats) to stdout.
    #[arg(long, conflicts_with = "print")]
    json: bool,

    /// Title paragraph of the Word document; pass an empty string for none.
    #[arg(long, env = "BANGLA_OCR_TITLE", default_value = "Converted Bangla Document")]
    title: String,

    /// Font used in the Word document.
    #[arg(long, env = "BANGLA_OCR_FONT", default_value = "Arial")]
    font: String,

    /// Directory containing the PDFium shared library.
    #[arg(long, env = "BANGLA_OCR_PDFIUM_DIR")]
    pdfium_dir: Option<PathBuf>,

    /// Path to the tesseract executable.
    #[arg(long, env = "BANGLA_OCR_TESSERACT")]
    tesseract: Option<PathBuf>,

    /// Directory containing ben.traineddata and eng.traineddata.
    #[arg(long, env = "BANGLA_OCR_TESSDATA_DIR")]
    tessdata_dir: Option<PathBuf>,

    /// Rendering DPI (72–600).
    #[arg(long, env = "BANGLA_OCR_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Reject documents with more pages than this.
    #[arg(long, env = "BANGLA_OCR_MAX_PAGES", default_value_t = 500)]
    max_pages: usize,

    /// Reject input files larger than this many MiB.
    #[arg(long, env = "BANGLA_OCR_MAX_INPUT_MB", default_value_t = 100)]
    max_input_mb: usize,

    /// Per-page recognition timeout in seconds.
    #[arg(long, env = "BANGLA_OCR_PAGE_TIMEOUT", default_value_t = 120)]
    page_timeout: u64,

    /// Verify the rendering and recognition backends, then exit.
    #[arg(long)]
    check: bool,

    /// Disable the progress bar.
    #[arg(long, env = "BANGLA_OCR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BANGLA_OCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BANGLA_OCR_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; -v always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.check;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve backends once ────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn ExtractionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;
    let extractor = Extractor::from_config(config).context("Failed to load PDFium")?;

    if cli.check {
        extractor
            .verify_backends()
            .await
            .context("Recognizer check failed")?;
        if !cli.quiet {
            eprintln!("{} PDFium and tesseract (ben+eng) are ready", green("✔"));
        }
        return Ok(());
    }

    let input = cli
        .input
        .clone()
        .context("An input PDF is required unless --check is given")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let pdf = read_pdf_file(&input).await?;
    let output = match extractor.extract(&pdf).await {
        Ok(output) => output,
        Err(e) => {
            if let Some(ref cb) = cli_progress {
                cb.fail();
            }
            return Err(e).with_context(|| format!("Conversion of {} failed", input.display()));
        }
    };

    let mut session = Session::new();
    session.record(display_name(&input), output.text.clone());

    // ── Write results ────────────────────────────────────────────────────
    if let Some(ref text_path) = cli.text {
        write_atomic(text_path, output.text.as_bytes())
            .with_context(|| format!("Failed to write {}", text_path.display()))?;
    }

    let docx_path = if cli.no_docx {
        None
    } else {
        let path = match cli.output {
            Some(ref p) => p.clone(),
            None => default_docx_path(&input, &session)?,
        };
        let options = ExportOptions {
            title: Some(cli.title.clone()).filter(|t| !t.trim().is_empty()),
            font: cli.font.clone(),
        };
        write_docx(&output.text, &path, &options)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        Some(path)
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.print {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} pages  {} chars  {}ms",
            green("✔"),
            output.stats.total_pages,
            output.stats.total_chars,
            output.stats.total_duration_ms,
        );
        if let Some(path) = docx_path {
            eprintln!("   →  {}", bold(&path.display().to_string()));
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .max_pages(cli.max_pages)
        .max_input_bytes(cli.max_input_mb.saturating_mul(1024 * 1024))
        .page_timeout(Duration::from_secs(cli.page_timeout));

    if let Some(ref dir) = cli.pdfium_dir {
        builder = builder.renderer(RendererLocation::Directory(dir.clone()));
    }
    if let Some(ref exe) = cli.tesseract {
        builder = builder.tesseract(TesseractLocation::Executable(exe.clone()));
    }
    if let Some(ref dir) = cli.tessdata_dir {
        builder = builder.tessdata_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<dir>/scan.pdf` → `<dir>/scan_converted.docx`.
fn default_docx_path(input: &Path, session: &Session) -> Result<PathBuf> {
    let name = session
        .export_file_name()
        .context("No conversion recorded in this session")?;
    Ok(input.with_file_name(name))
}
