//! The capabilities every tier implements.
//!
//! A [`TextLayerReader`] is a blocking engine binding: bytes in, one string
//! per page out. A [`Tier`] is what the orchestrator sequences; it owns the
//! async plumbing (blocking pool, subprocesses, timeouts) around an engine.

use crate::error::TierError;
use crate::output::Method;
use crate::pipeline::input::PdfDocument;
use crate::pipeline::postprocess::normalise_page_text;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A blocking text-layer engine.
pub trait TextLayerReader: Send + Sync {
    /// Short engine name used in logs and errors.
    fn engine(&self) -> &'static str;

    /// Read the embedded text layer, returning raw page strings in page order.
    ///
    /// Pages without text yield empty strings; an `Err` means the whole
    /// document could not be read by this engine.
    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, TierError>;
}

/// One strategy in the fallback chain.
#[async_trait]
pub trait Tier: Send + Sync {
    /// The method recorded when this tier's text is returned.
    fn method(&self) -> Method;

    /// Attempt extraction, returning normalised page strings in page order.
    async fn attempt(&self, document: &PdfDocument) -> Result<Vec<String>, TierError>;
}

/// Run a reader on the blocking pool and normalise what it returns.
pub async fn read_normalised(
    reader: Arc<dyn TextLayerReader>,
    bytes: Arc<[u8]>,
) -> Result<Vec<String>, TierError> {
    let engine = reader.engine();
    let raw = tokio::task::spawn_blocking(move || reader.read_pages(&bytes))
        .await
        .map_err(|e| TierError::Join(format!("{engine}: {e}")))??;

    let pages: Vec<String> = raw.iter().map(|p| normalise_page_text(p)).collect();
    for (i, page) in pages.iter().enumerate() {
        debug!(engine, page = i + 1, chars = page.chars().count(), "page read");
    }
    Ok(pages)
}

/// A tier that reads the document's existing text layer with one engine.
pub struct TextLayerTier {
    method: Method,
    reader: Arc<dyn TextLayerReader>,
}

impl TextLayerTier {
    pub fn new(method: Method, reader: Arc<dyn TextLayerReader>) -> Self {
        Self { method, reader }
    }
}

#[async_trait]
impl Tier for TextLayerTier {
    fn method(&self) -> Method {
        self.method
    }

    async fn attempt(&self, document: &PdfDocument) -> Result<Vec<String>, TierError> {
        read_normalised(Arc::clone(&self.reader), document.bytes()).await
    }
}
