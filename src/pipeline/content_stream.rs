//! Secondary text-layer reader: pdf-extract's content-stream interpreter.
//!
//! Pure Rust, so it works where PDFium is not installed, and its glyph
//! positioning heuristics differ enough from PDFium's that it recovers text
//! on some files the primary reader returns blank for. The parser panics on
//! certain malformed documents; those panics are caught here and reported as
//! an ordinary tier failure.

use crate::error::TierError;
use crate::pipeline::tier::TextLayerReader;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

const ENGINE: &str = "pdf-extract";

/// Reads the text layer by interpreting page content streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentStreamReader;

impl TextLayerReader for ContentStreamReader {
    fn engine(&self) -> &'static str {
        ENGINE
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, TierError> {
        match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf)
        })) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(TierError::Open {
                engine: ENGINE,
                detail: e.to_string(),
            }),
            Err(_) => {
                warn!("pdf-extract panicked while parsing document");
                Err(TierError::Panicked { engine: ENGINE })
            }
        }
    }
}
