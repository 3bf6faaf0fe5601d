//! Pipeline stages for tiered PDF text extraction.
//!
//! Each submodule owns one concern. The engines are hidden behind
//! [`tier::TextLayerReader`] and [`tier::Tier`] so the orchestrator in
//! [`crate::extract`] only ever sees an ordered list of tiers.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ tier 1 ──▶ tier 2 ──▶ tier 3 ──▶ result
//! (path/URL) (pdfium) (pdf-extract) (ocrmypdf + re-read)
//!               │          │            │
//!               └──────────┴────────────┴──▶ postprocess (per page)
//! ```
//!
//! 1. [`input`]: load a path, URL or upload into memory; input checks
//! 2. [`pdfium`]: primary text layer via PDFium
//! 3. [`content_stream`]: secondary text layer via pdf-extract
//! 4. [`ocr`]: external OCR into a scratch copy, then a text-layer re-read
//! 5. [`postprocess`]: deterministic whitespace cleanup of every page

pub mod content_stream;
pub mod input;
pub mod ocr;
pub mod pdfium;
pub mod postprocess;
pub mod tier;
