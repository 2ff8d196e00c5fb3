//! Pipeline integration tests with in-process backends.
//!
//! These tests swap PDFium and tesseract for deterministic fakes so the
//! ordering, normalisation, failure and progress guarantees of the
//! extraction pipeline can be checked without any native dependency.

use async_trait::async_trait;
use bangla_ocr::{
    export::build_document, BanglaOcrError, ExportOptions, ExtractionConfig,
    ExtractionProgressCallback, Extractor, PageImage, PageRenderer, Recognizer, RenderOptions,
    PAGE_SEPARATOR,
};
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FAKE_PDF: &[u8] = b"%PDF-1.7\n% fake document for tests\n";

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Renders `pages` blank images and counts how often it was asked to.
struct FakeRenderer {
    pages: usize,
    calls: AtomicUsize,
}

impl FakeRenderer {
    fn new(pages: usize) -> Arc<Self> {
        Arc::new(Self {
            pages,
            calls: AtomicUsize::new(0),
        })
    }
}

impl PageRenderer for FakeRenderer {
    fn render(
        &self,
        _pdf: &[u8],
        options: &RenderOptions,
    ) -> Result<Vec<PageImage>, BanglaOcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.pages > options.max_pages {
            return Err(BanglaOcrError::TooManyPages {
                pages: self.pages,
                limit: options.max_pages,
            });
        }
        Ok((0..self.pages)
            .map(|index| PageImage {
                index,
                image: DynamicImage::new_luma8(8, 8),
            })
            .collect())
    }
}

/// Always fails the way PDFium does on a damaged file.
struct CorruptRenderer;

impl PageRenderer for CorruptRenderer {
    fn render(
        &self,
        _pdf: &[u8],
        _options: &RenderOptions,
    ) -> Result<Vec<PageImage>, BanglaOcrError> {
        Err(BanglaOcrError::CorruptPdf {
            detail: "PdfiumLibraryInternalError(FormatError)".into(),
        })
    }
}

/// Returns a scripted text per page index and records the order of calls.
struct ScriptedRecognizer {
    texts: Vec<String>,
    fail_on_page: Option<usize>,
    delay: Option<Duration>,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedRecognizer {
    fn new(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            fail_on_page: None,
            delay: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, page_num: usize) -> Self {
        self.fail_on_page = Some(page_num);
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn seen(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self, page: &PageImage) -> Result<String, BanglaOcrError> {
        self.seen.lock().unwrap().push(page.page_num());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_page == Some(page.page_num()) {
            return Err(BanglaOcrError::RecognitionFailed {
                page: page.page_num(),
                detail: "tesseract exited with exit status: 1".into(),
            });
        }
        Ok(self.texts[page.index].clone())
    }
}

/// Records every progress event as a compact string.
#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ExtractionProgressCallback for EventLog {
    fn on_extraction_start(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("start {total_pages}"));
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.0
            .lock()
            .unwrap()
            .push(format!("page {page_num}/{total_pages}"));
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        self.0
            .lock()
            .unwrap()
            .push(format!("done {page_num}/{total_pages} {chars}"));
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, _error: &str) {
        self.0
            .lock()
            .unwrap()
            .push(format!("error {page_num}/{total_pages}"));
    }

    fn on_extraction_complete(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("complete {total_pages}"));
    }
}

fn extractor(
    renderer: Arc<dyn PageRenderer>,
    recognizer: Arc<dyn Recognizer>,
    config: ExtractionConfig,
) -> Extractor {
    Extractor::with_backends(renderer, recognizer, config)
}

// ── Ordering ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_appear_in_page_order() {
    let texts = ["পৃষ্ঠা এক", "page two", "পৃষ্ঠা তিন", "page four", "পৃষ্ঠা পাঁচ"];
    let recognizer = Arc::new(ScriptedRecognizer::new(&texts));
    let ex = extractor(
        FakeRenderer::new(texts.len()),
        recognizer.clone(),
        ExtractionConfig::default(),
    );

    let text = ex.extract_text(FAKE_PDF).await.unwrap();

    let segments: Vec<&str> = text.split_terminator(PAGE_SEPARATOR).collect();
    assert_eq!(segments, texts.to_vec());
    assert_eq!(recognizer.seen(), vec![1, 2, 3, 4, 5]);

    let positions: Vec<usize> = texts.iter().map(|t| text.find(t).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn empty_pages_keep_their_segment() {
    let texts = ["first", "", "", "last"];
    let ex = extractor(
        FakeRenderer::new(texts.len()),
        Arc::new(ScriptedRecognizer::new(&texts)),
        ExtractionConfig::default(),
    );

    let output = ex.extract(FAKE_PDF).await.unwrap();

    assert_eq!(output.text, "first\n\n\n\n\n\nlast\n\n");
    assert_eq!(output.text.split_terminator(PAGE_SEPARATOR).count(), 4);
    assert_eq!(output.pages.len(), 4);
    assert_eq!(output.pages[1].chars, 0);
    assert_eq!(output.stats.total_pages, 4);
}

#[tokio::test]
async fn single_blank_page_yields_only_separator() {
    let ex = extractor(
        FakeRenderer::new(1),
        Arc::new(ScriptedRecognizer::new(&[""])),
        ExtractionConfig::default(),
    );
    assert_eq!(ex.extract_text(FAKE_PDF).await.unwrap(), "\n\n");
}

// ── Normalisation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn recognized_text_is_nfc_composed() {
    // "কোন" with the o-kar split into its two halves, plus "বৌ" with a split au-kar.
    let broken = "\u{0995}\u{09C7}\u{09BE}\u{09A8} \u{09AC}\u{09C7}\u{09D7}";
    let ex = extractor(
        FakeRenderer::new(1),
        Arc::new(ScriptedRecognizer::new(&[broken])),
        ExtractionConfig::default(),
    );

    let output = ex.extract(FAKE_PDF).await.unwrap();

    assert_eq!(output.pages[0].text, "\u{0995}\u{09CB}\u{09A8} \u{09AC}\u{09CC}");
    assert_eq!(output.pages[0].chars, 6);
    assert!(!output.text.contains('\u{09BE}'));
}

// ── Render failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn non_pdf_buffer_is_a_render_failure() {
    let renderer = FakeRenderer::new(3);
    let recognizer = Arc::new(ScriptedRecognizer::new(&["a", "b", "c"]));
    let ex = extractor(
        renderer.clone(),
        recognizer.clone(),
        ExtractionConfig::default(),
    );

    let err = ex
        .extract_text(b"\x89PNG\r\n\x1a\nnot a pdf at all")
        .await
        .unwrap_err();

    assert!(err.is_render_failure(), "got {err:?}");
    assert!(matches!(err, BanglaOcrError::NotAPdf { .. }));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    assert!(recognizer.seen().is_empty());
}

#[tokio::test]
async fn empty_buffer_is_a_render_failure() {
    let ex = extractor(
        FakeRenderer::new(1),
        Arc::new(ScriptedRecognizer::new(&["x"])),
        ExtractionConfig::default(),
    );
    let err = ex.extract_text(b"").await.unwrap_err();
    assert!(matches!(err, BanglaOcrError::EmptyInput));
}

#[tokio::test]
async fn corrupt_pdf_never_reaches_recognizer() {
    let recognizer = Arc::new(ScriptedRecognizer::new(&["x"]));
    let log = Arc::new(EventLog::default());
    let config = ExtractionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let ex = extractor(Arc::new(CorruptRenderer), recognizer.clone(), config);

    let err = ex.extract(FAKE_PDF).await.unwrap_err();

    assert!(err.is_render_failure());
    assert!(recognizer.seen().is_empty());
    assert!(log.events().is_empty(), "no progress before pages exist");
}

#[tokio::test]
async fn input_size_limit_is_enforced() {
    let renderer = FakeRenderer::new(1);
    let config = ExtractionConfig::builder()
        .max_input_bytes(16)
        .build()
        .unwrap();
    let ex = extractor(
        renderer.clone(),
        Arc::new(ScriptedRecognizer::new(&["x"])),
        config,
    );

    let err = ex.extract(FAKE_PDF).await.unwrap_err();

    assert!(matches!(err, BanglaOcrError::InputTooLarge { limit: 16, .. }));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn page_limit_is_forwarded_to_renderer() {
    let config = ExtractionConfig::builder().max_pages(2).build().unwrap();
    let ex = extractor(
        FakeRenderer::new(3),
        Arc::new(ScriptedRecognizer::new(&["a", "b", "c"])),
        config,
    );

    let err = ex.extract(FAKE_PDF).await.unwrap_err();

    assert!(matches!(
        err,
        BanglaOcrError::TooManyPages { pages: 3, limit: 2 }
    ));
    assert!(err.is_render_failure());
}

// ── Recognition failures ─────────────────────────────────────────────────────

#[tokio::test]
async fn recognition_failure_aborts_whole_request() {
    let recognizer = Arc::new(ScriptedRecognizer::new(&["one", "two", "three"]).failing_on(2));
    let log = Arc::new(EventLog::default());
    let config = ExtractionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let ex = extractor(FakeRenderer::new(3), recognizer.clone(), config);

    let err = ex.extract_text(FAKE_PDF).await.unwrap_err();

    assert!(err.is_recognition_failure());
    assert!(matches!(err, BanglaOcrError::RecognitionFailed { page: 2, .. }));
    assert_eq!(recognizer.seen(), vec![1, 2], "page 3 must not be attempted");
    assert_eq!(
        log.events(),
        vec!["start 3", "page 1/3", "done 1/3 3", "page 2/3", "error 2/3"]
    );
}

#[tokio::test]
async fn slow_page_times_out() {
    let recognizer = Arc::new(ScriptedRecognizer::new(&["one", "two"]).slow(Duration::from_secs(5)));
    let config = ExtractionConfig::builder()
        .page_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let ex = extractor(FakeRenderer::new(2), recognizer.clone(), config);

    let err = ex.extract(FAKE_PDF).await.unwrap_err();

    match &err {
        BanglaOcrError::RecognitionTimeout { page, timeout } => {
            assert_eq!(*page, 1);
            assert_eq!(*timeout, Duration::from_millis(50));
        }
        other => panic!("expected RecognitionTimeout, got {other:?}"),
    }
    assert!(err.to_string().contains("50ms"));
    assert!(err.is_recognition_failure());
    assert_eq!(recognizer.seen(), vec![1]);
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_reports_every_page_in_order() {
    let log = Arc::new(EventLog::default());
    let config = ExtractionConfig::builder()
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let ex = extractor(
        FakeRenderer::new(2),
        Arc::new(ScriptedRecognizer::new(&["কো", "abc"])),
        config,
    );

    ex.extract(FAKE_PDF).await.unwrap();

    assert_eq!(
        log.events(),
        vec![
            "start 2",
            "page 1/2",
            "done 1/2 2",
            "page 2/2",
            "done 2/2 3",
            "complete 2"
        ]
    );
}

// ── Blocking wrapper ─────────────────────────────────────────────────────────

#[test]
fn blocking_wrapper_outside_runtime() {
    let ex = extractor(
        FakeRenderer::new(2),
        Arc::new(ScriptedRecognizer::new(&["এক", "দুই"])),
        ExtractionConfig::default(),
    );
    let text = ex.extract_text_blocking(FAKE_PDF).unwrap();
    assert_eq!(text, "এক\n\nদুই\n\n");
}

// ── Hand-off to the exporter ─────────────────────────────────────────────────

#[tokio::test]
async fn extracted_lines_become_docx_paragraphs() {
    let texts = ["প্রথম লাইন\nদ্বিতীয় লাইন\n", "", "English line\n"];
    let ex = extractor(
        FakeRenderer::new(texts.len()),
        Arc::new(ScriptedRecognizer::new(&texts)),
        ExtractionConfig::default(),
    );
    let text = ex.extract_text(FAKE_PDF).await.unwrap();

    let options = ExportOptions {
        title: None,
        ..Default::default()
    };
    let docx = build_document(&text, &options);
    let expected = bangla_ocr::export::paragraphs(&text);

    assert_eq!(expected, vec!["প্রথম লাইন", "দ্বিতীয় লাইন", "English line"]);
    assert_eq!(docx.document.children.len(), expected.len());
}
