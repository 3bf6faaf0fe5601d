//! The extraction orchestrator.
//!
//! [`PdfExtractor`] holds an ordered list of tiers and walks it for each
//! request, returning the first non-empty text. A tier that fails is logged
//! and skipped; its error only reaches the caller if it was the last tier
//! attempted. The extractor is immutable once built and is meant to be
//! constructed once per process and shared (`Arc<PdfExtractor>`).

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, TierError};
use crate::output::{ExtractionResult, Method};
use crate::pipeline::content_stream::ContentStreamReader;
use crate::pipeline::input::{self, PdfDocument, PdfSource};
use crate::pipeline::ocr::OcrTier;
use crate::pipeline::pdfium::PdfiumReader;
use crate::pipeline::tier::{TextLayerReader, TextLayerTier, Tier};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tiered text extractor.
///
/// # Example
/// ```rust,no_run
/// use pdfsift::{ExtractionConfig, PdfExtractor};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = PdfExtractor::new(ExtractionConfig::default());
/// let result = extractor.extract_path("invoice.pdf").await?;
/// if result.success {
///     println!("{} ({} pages via {})", result.text, result.num_pages, result.method);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PdfExtractor {
    tiers: Vec<Arc<dyn Tier>>,
    config: ExtractionConfig,
}

impl PdfExtractor {
    /// Build the default chain: PDFium, then pdf-extract, then OCR (unless
    /// disabled). OCR output is re-read with PDFium first, then pdf-extract.
    pub fn new(config: ExtractionConfig) -> Self {
        let primary: Arc<dyn TextLayerReader> =
            Arc::new(PdfiumReader::new(config.pdfium_library_path.clone()));
        let secondary: Arc<dyn TextLayerReader> = Arc::new(ContentStreamReader);

        let mut tiers: Vec<Arc<dyn Tier>> = vec![
            Arc::new(TextLayerTier::new(Method::Primary, Arc::clone(&primary))),
            Arc::new(TextLayerTier::new(Method::Secondary, Arc::clone(&secondary))),
        ];
        if config.ocr_enabled {
            tiers.push(Arc::new(OcrTier::new(
                config.clone(),
                vec![primary, secondary],
            )));
        }
        Self::with_tiers(tiers, config)
    }

    /// Build an extractor over an explicit chain, tried in the given order.
    pub fn with_tiers(tiers: Vec<Arc<dyn Tier>>, config: ExtractionConfig) -> Self {
        Self { tiers, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Methods of the configured tiers, in chain order.
    pub fn available_methods(&self) -> Vec<Method> {
        self.tiers.iter().map(|t| t.method()).collect()
    }

    /// Run the full fallback chain.
    ///
    /// # Errors
    /// Only input errors (missing, unreadable or empty source). Tier failures
    /// and "no text anywhere" come back as `Ok` with `success == false`.
    pub async fn extract(&self, source: impl Into<PdfSource>) -> Result<ExtractionResult, ExtractError> {
        let document = PdfDocument::load(source.into()).await?;
        Ok(self.extract_document(&document).await)
    }

    /// Run the full fallback chain on a local file.
    pub async fn extract_path(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<ExtractionResult, ExtractError> {
        self.extract(PdfSource::Path(path.as_ref().to_path_buf())).await
    }

    /// Run the full fallback chain on an in-memory buffer.
    pub async fn extract_bytes(&self, bytes: Vec<u8>) -> Result<ExtractionResult, ExtractError> {
        self.extract(PdfSource::Bytes(bytes)).await
    }

    /// Resolve a path or `http(s)://` URL, then run the full chain.
    pub async fn extract_input(&self, input_str: &str) -> Result<ExtractionResult, ExtractError> {
        let source = input::resolve_input(input_str, self.config.download_timeout_secs).await?;
        self.extract(source).await
    }

    /// Run the chain on an already loaded document.
    pub async fn extract_document(&self, document: &PdfDocument) -> ExtractionResult {
        let started = Instant::now();
        info!(
            "Extracting {} ({} bytes, {} tiers)",
            document.label(),
            document.len(),
            self.tiers.len()
        );

        let mut last_pages = 0usize;
        let mut last_error: Option<String> = None;

        for tier in &self.tiers {
            let method = tier.method();
            match self.run_tier(tier.as_ref(), document).await {
                Ok(result) if result.success => {
                    info!(
                        "Extracted {} chars from {} pages via {} in {:.1?}",
                        result.total_chars,
                        result.num_pages,
                        method,
                        started.elapsed()
                    );
                    return self.finish(result);
                }
                Ok(result) => {
                    debug!("Tier {} found no text, escalating", method);
                    last_pages = result.num_pages;
                    last_error = None;
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                }
            }
        }

        warn!(
            "No text extracted from {} after {} tiers",
            document.label(),
            self.tiers.len()
        );
        self.finish(ExtractionResult::exhausted(last_pages, last_error.as_deref()))
    }

    /// Run exactly one tier, with no fallback.
    ///
    /// # Errors
    /// [`ExtractError::UnknownTier`] when the chain has no tier for `method`,
    /// plus the input errors of [`Self::extract`].
    pub async fn extract_with_tier(
        &self,
        method: Method,
        source: impl Into<PdfSource>,
    ) -> Result<ExtractionResult, ExtractError> {
        let tier = self
            .tiers
            .iter()
            .find(|t| t.method() == method)
            .ok_or_else(|| ExtractError::UnknownTier {
                name: method.to_string(),
                available: self.available_names(),
            })?;

        let document = PdfDocument::load(source.into()).await?;
        let result = match self.run_tier(tier.as_ref(), &document).await {
            Ok(result) => result,
            Err(e) => ExtractionResult::tier_failed(method, e.to_string()),
        };
        Ok(self.finish(result))
    }

    /// Synchronous wrapper around [`Self::extract`].
    ///
    /// Creates a temporary tokio runtime internally; do not call from within
    /// an async context.
    pub fn extract_sync(&self, source: impl Into<PdfSource>) -> Result<ExtractionResult, ExtractError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.extract(source))
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    async fn run_tier(&self, tier: &dyn Tier, document: &PdfDocument) -> Result<ExtractionResult, TierError> {
        let method = tier.method();
        let cb = self.config.progress_callback.as_ref();
        let started = Instant::now();

        info!("Trying tier {}", method);
        if let Some(cb) = cb {
            cb.on_tier_start(method);
        }

        match tier.attempt(document).await {
            Ok(pages) => {
                let result = ExtractionResult::from_pages(method, pages);
                if let Some(cb) = cb {
                    for page in &result.pages {
                        cb.on_page(method, page.page_num, page.char_count);
                    }
                    cb.on_tier_complete(method, result.total_chars);
                }
                info!(
                    "Tier {} returned {} pages, {} chars in {:.1?}",
                    method,
                    result.num_pages,
                    result.total_chars,
                    started.elapsed()
                );
                Ok(result)
            }
            Err(e) => {
                warn!("Tier {} failed: {}", method, e);
                if let Some(cb) = cb {
                    cb.on_tier_failed(method, &e.to_string());
                }
                Err(e)
            }
        }
    }

    fn finish(&self, result: ExtractionResult) -> ExtractionResult {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_extraction_complete(&result);
        }
        result
    }

    fn available_names(&self) -> String {
        self.available_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for PdfExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfExtractor")
            .field("tiers", &self.available_methods())
            .field("config", &self.config)
            .finish()
    }
}
