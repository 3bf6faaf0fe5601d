//! End-to-end tests against the real engines.
//!
//! These need a PDFium shared library (`PDFIUM_LIB_PATH` or the system
//! search path) and `ocrmypdf` with Tesseract on `PATH`. They are gated
//! behind `PDFSIFT_E2E` so they do not run in CI unless requested.
//!
//! Run with:
//!   PDFSIFT_E2E=1 PDFIUM_LIB_PATH=/opt/pdfium/lib cargo test --test e2e -- --nocapture

mod common;

use common::{blank_pdf, squash, text_pdf};
use pdfsift::{ExtractionConfig, Method, PdfExtractor};

/// Skip this test unless PDFSIFT_E2E is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("PDFSIFT_E2E").is_err() {
            println!("SKIP: set PDFSIFT_E2E=1 to run e2e tests");
            return;
        }
    }};
}

fn default_extractor() -> PdfExtractor {
    common::init_tracing();
    PdfExtractor::new(ExtractionConfig::default())
}

#[tokio::test]
async fn test_primary_reads_three_page_document() {
    e2e_skip_unless_enabled!();

    let r = default_extractor()
        .extract_bytes(text_pdf(&["Alpha page", "Beta page", "Gamma page"]))
        .await
        .expect("extraction");

    assert!(r.success, "error: {:?}", r.error);
    assert_eq!(r.method, Method::Primary);
    assert_eq!(r.num_pages, 3);
    assert!(squash(&r.pages[1].text).contains("Betapage"));
}

#[tokio::test]
async fn test_primary_and_secondary_agree_on_simple_text() {
    e2e_skip_unless_enabled!();

    let ex = default_extractor();
    let pdf = text_pdf(&["Quarterly report"]);
    let primary = ex.extract_with_tier(Method::Primary, pdf.clone()).await.unwrap();
    let secondary = ex.extract_with_tier(Method::Secondary, pdf).await.unwrap();

    assert_eq!(squash(&primary.text), squash(&secondary.text));
}

#[tokio::test]
async fn test_ocr_recognises_rendered_text() {
    e2e_skip_unless_enabled!();

    // --force-ocr rasterises every page, so a large-font text page works as
    // a stand-in for a scan.
    let r = default_extractor()
        .extract_with_tier(Method::Ocr, text_pdf(&["OCR WORKS"]))
        .await
        .unwrap();

    assert!(r.success, "error: {:?}", r.error);
    assert_eq!(r.method, Method::Ocr);
    assert!(squash(&r.text).to_uppercase().contains("OCR"));
}

#[tokio::test]
async fn test_blank_document_exhausts_all_tiers() {
    e2e_skip_unless_enabled!();

    let r = default_extractor()
        .extract_bytes(blank_pdf(1))
        .await
        .unwrap();

    assert!(!r.success);
    assert_eq!(r.method, Method::None);
    assert!(r.error.unwrap().starts_with("no extractable text"));
}

#[tokio::test]
async fn test_ocr_timeout_is_logical_failure() {
    e2e_skip_unless_enabled!();

    let config = ExtractionConfig::builder()
        .ocr_program("sh")
        .ocr_args(["-c", "sleep 30"])
        .ocr_timeout_secs(1)
        .build()
        .unwrap();
    let r = PdfExtractor::new(config)
        .extract_bytes(blank_pdf(1))
        .await
        .unwrap();

    assert!(!r.success);
    assert_eq!(
        r.error.as_deref(),
        Some("no extractable text: OCR timed out after 1s")
    );
}
