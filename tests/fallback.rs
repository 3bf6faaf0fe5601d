//! Fallback behaviour against real documents, using the pure-Rust secondary
//! reader so no system libraries are required.

mod common;

use common::{blank_pdf, squash, text_pdf};
use pdfsift::pipeline::content_stream::ContentStreamReader;
use pdfsift::pipeline::ocr::OcrTier;
use pdfsift::pipeline::pdfium::PdfiumReader;
use pdfsift::pipeline::tier::TextLayerTier;
use pdfsift::{ExtractionConfig, Method, PdfExtractor, TextLayerReader, Tier, NO_TEXT_MESSAGE};
use std::sync::Arc;

/// A primary tier that can never bind PDFium.
fn unbound_primary() -> Arc<dyn Tier> {
    Arc::new(TextLayerTier::new(
        Method::Primary,
        Arc::new(PdfiumReader::new(Some("/nonexistent/pdfium".into()))),
    ))
}

fn secondary() -> Arc<dyn Tier> {
    Arc::new(TextLayerTier::new(
        Method::Secondary,
        Arc::new(ContentStreamReader),
    ))
}

fn no_ocr() -> ExtractionConfig {
    ExtractionConfig::builder().ocr_enabled(false).build().unwrap()
}

#[tokio::test]
async fn secondary_reads_generated_text_layer() {
    let ex = PdfExtractor::with_tiers(vec![secondary()], no_ocr());
    let r = ex.extract_bytes(text_pdf(&["Hello World!"])).await.unwrap();

    assert!(r.success, "unexpected failure: {:?}", r.error);
    assert_eq!(r.method, Method::Secondary);
    assert_eq!(r.num_pages, 1);
    assert!(squash(&r.text).contains("HelloWorld!"));
    assert_eq!(r.total_chars, r.text.chars().count());
}

#[tokio::test]
async fn three_page_document_reports_three_pages() {
    let ex = PdfExtractor::with_tiers(vec![secondary()], no_ocr());
    let r = ex
        .extract_bytes(text_pdf(&["Page one", "Page two", "Page three"]))
        .await
        .unwrap();

    assert!(r.success);
    assert_eq!(r.num_pages, 3);
    assert_eq!(r.pages.len(), 3);
    assert!(squash(&r.pages[1].text).contains("Pagetwo"));
    assert_eq!(r.pages[2].page_num, 3);
}

#[tokio::test]
async fn unbound_primary_falls_through_to_secondary() {
    common::init_tracing();
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary()], no_ocr());
    let r = ex.extract_bytes(text_pdf(&["fallback works"])).await.unwrap();

    assert!(r.success);
    assert_eq!(r.method, Method::Secondary);
    assert!(r.error.is_none());
}

#[tokio::test]
async fn empty_page_keeps_its_record() {
    let ex = PdfExtractor::with_tiers(vec![secondary()], no_ocr());
    let r = ex
        .extract_bytes(text_pdf(&["first", "", "third"]))
        .await
        .unwrap();

    assert!(r.success);
    assert_eq!(r.num_pages, 3);
    assert_eq!(r.pages[1].char_count, 0);
    assert_eq!(r.pages[1].text, "");
}

#[tokio::test]
async fn blank_document_without_ocr_is_logical_failure() {
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary()], no_ocr());
    let r = ex.extract_bytes(blank_pdf(2)).await.unwrap();

    assert!(!r.success);
    assert_eq!(r.method, Method::None);
    assert_eq!(r.num_pages, 2);
    assert_eq!(r.text, "");
    assert_eq!(r.error.as_deref(), Some(NO_TEXT_MESSAGE));
}

#[tokio::test]
async fn garbage_input_fails_every_tier_without_erroring() {
    common::init_tracing();
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary()], no_ocr());
    let r = ex
        .extract_bytes(b"definitely not a pdf".to_vec())
        .await
        .unwrap();

    assert!(!r.success);
    assert_eq!(r.method, Method::None);
    assert_eq!(r.num_pages, 0);
    let err = r.error.unwrap();
    assert!(err.starts_with("no extractable text: pdf-extract"), "{err}");
}

#[tokio::test]
async fn extraction_is_idempotent() {
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary()], no_ocr());
    let pdf = text_pdf(&["same every time", "twice"]);
    let a = ex.extract_bytes(pdf.clone()).await.unwrap();
    let b = ex.extract_bytes(pdf).await.unwrap();
    assert_eq!(a.text, b.text);
    assert_eq!(a.method, b.method);
}

#[tokio::test]
async fn path_source_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, text_pdf(&["on disk"])).unwrap();

    let ex = PdfExtractor::with_tiers(vec![secondary()], no_ocr());
    let r = ex.extract_path(&path).await.unwrap();
    assert!(squash(&r.text).contains("ondisk"));
}

#[tokio::test]
async fn pdfium_bind_failure_is_reported_by_single_tier_run() {
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary()], no_ocr());
    let r = ex
        .extract_with_tier(Method::Primary, text_pdf(&["text"]))
        .await
        .unwrap();

    assert!(!r.success);
    assert_eq!(r.method, Method::Primary);
    assert!(r.error.unwrap().contains("PDFium"));
}

/// OCR is simulated by a shell script that "recognises" a prepared
/// three-page text PDF, so the OCR output paginates differently from the
/// one-page scan.
#[cfg(unix)]
#[tokio::test]
async fn blank_scan_escalates_to_ocr_and_uses_its_pagination() {
    common::init_tracing();
    let fixtures = tempfile::tempdir().unwrap();
    let recognised = fixtures.path().join("recognised.pdf");
    std::fs::write(&recognised, text_pdf(&["Scanned", "Invoice", "Total"])).unwrap();

    let scratch = tempfile::tempdir().unwrap();
    let script = format!(r#"cp '{}' "$1""#, recognised.display());
    let config = ExtractionConfig::builder()
        .ocr_program("sh")
        .ocr_args(["-c", script.as_str()])
        .scratch_dir(scratch.path())
        .build()
        .unwrap();

    let readers: Vec<Arc<dyn TextLayerReader>> = vec![Arc::new(ContentStreamReader)];
    let ocr: Arc<dyn Tier> = Arc::new(OcrTier::new(config.clone(), readers));
    let ex = PdfExtractor::with_tiers(vec![unbound_primary(), secondary(), ocr], config);

    let r = ex.extract_bytes(blank_pdf(1)).await.unwrap();
    assert!(r.success, "unexpected failure: {:?}", r.error);
    assert_eq!(r.method, Method::Ocr);
    assert_eq!(r.num_pages, 3);
    assert!(squash(&r.text).contains("Invoice"));
    assert!(std::fs::read_dir(scratch.path()).unwrap().next().is_none());
}
