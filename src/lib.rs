//! # pdfsift
//!
//! Extract plain text from PDF documents with a tiered fallback.
//!
//! ## Why tiers?
//!
//! No single text-layer reader handles every PDF in the wild. PDFium is fast
//! and accurate on well-formed files; pdf-extract interprets content streams
//! itself and recovers text on some files PDFium returns blank for; scanned
//! documents have no text layer at all and need OCR. Rather than guess up
//! front, this crate tries the cheap readers first and escalates only when
//! they come back empty or fail.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      load a path, URL or upload into memory
//!  ├─ 2. Primary    PDFium text layer (spawn_blocking)
//!  ├─ 3. Secondary  pdf-extract content streams (spawn_blocking, panic-safe)
//!  ├─ 4. OCR        ocrmypdf into a scratch copy, then re-read its text layer
//!  └─ 5. Result     first non-empty text + per-page records
//! ```
//!
//! A tier that fails never aborts the request; "no text anywhere" is a
//! well-formed [`ExtractionResult`] with `success == false`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsift::{ExtractionConfig, PdfExtractor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = PdfExtractor::new(ExtractionConfig::default());
//!     let result = extractor.extract_path("scan.pdf").await?;
//!     println!("{} pages via {}", result.num_pages, result.method);
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables [`cli`] and the `pdfsift` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | on      | Enables [`server`] and the `pdfsift-server` binary (axum + tower-http) |
//!
//! Disable both when using only the library:
//! ```toml
//! pdfsift = { version = "0.3", default-features = false }
//! ```
//!
//! ## Runtime requirements
//!
//! | Tier | Needs |
//! |------|-------|
//! | primary   | a PDFium shared library (`PDFIUM_LIB_PATH` or the system search path) |
//! | secondary | nothing |
//! | ocr       | `ocrmypdf` (and Tesseract) on `PATH` |
//!
//! Missing pieces only disable the tier that needs them.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_OCR_TIMEOUT_SECS};
pub use error::{ExtractError, TierError};
pub use extract::PdfExtractor;
pub use output::{CompactOutput, ExtractionResult, Method, PageText, NO_TEXT_MESSAGE};
pub use pipeline::input::{PdfDocument, PdfSource};
pub use pipeline::tier::{TextLayerReader, Tier};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
