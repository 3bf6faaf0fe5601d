//! Error types for the pdfsift library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`]: **Fatal**: extraction cannot start or the caller
//!   asked for something that does not exist (missing file, empty upload,
//!   unknown tier). Returned as `Err(ExtractError)` from the top-level
//!   extraction functions.
//!
//! * [`TierError`]: **Non-fatal**: a single tier failed (corrupt xref,
//!   PDFium not installed, OCR timed out) but the next tier may still
//!   succeed. The orchestrator logs it and moves on; only the failure of the
//!   last tier attempted is copied into [`crate::output::ExtractionResult::error`].
//!
//! "Nothing found" is neither: it is a well-formed result with
//! `success = false`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsift library.
///
/// Tier-level failures use [`TierError`] and never escape the orchestrator.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file or upload contained zero bytes.
    #[error("Input '{input}' is empty")]
    EmptyInput { input: String },

    /// The input is neither a readable path nor a valid HTTP/HTTPS URL.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Request errors ────────────────────────────────────────────────────
    /// A single-tier run named a tier that is not configured.
    #[error("Unknown extraction tier '{name}' (expected one of: {available})")]
    UnknownTier { name: String, available: String },

    /// Every tier ran and none produced text.
    ///
    /// Only returned by [`crate::output::ExtractionResult::into_result`];
    /// the extraction functions themselves report this as `success = false`.
    #[error("No text could be extracted from PDF ({num_pages} pages): {detail}")]
    NoText { num_pages: usize, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (I/O on scratch space, task join failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True for errors caused by what the caller supplied rather than by us.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractError::FileNotFound { .. }
                | ExtractError::PermissionDenied { .. }
                | ExtractError::EmptyInput { .. }
                | ExtractError::InvalidInput { .. }
                | ExtractError::DownloadFailed { .. }
                | ExtractError::DownloadTimeout { .. }
        )
    }
}

/// A recoverable failure of one extraction tier.
#[derive(Debug, Clone, Error)]
pub enum TierError {
    /// The engine could not open or parse the document.
    #[error("{engine}: failed to open PDF: {detail}")]
    Open { engine: &'static str, detail: String },

    /// The engine opened the document but failed on a page.
    #[error("{engine}: page {page}: {detail}")]
    Page {
        engine: &'static str,
        page: usize,
        detail: String,
    },

    /// The engine panicked on malformed input.
    #[error("{engine}: parser panicked (malformed document)")]
    Panicked { engine: &'static str },

    /// The PDFium shared library could not be loaded.
    #[error("failed to bind PDFium library: {0}")]
    Bind(String),

    /// The OCR program could not be started.
    #[error("failed to start OCR program '{program}': {detail}")]
    OcrSpawn { program: String, detail: String },

    /// The OCR program ran but exited unsuccessfully.
    #[error("OCR program exited with {status}: {stderr}")]
    OcrFailed { status: String, stderr: String },

    /// The OCR program exceeded its wall-clock budget and was killed.
    #[error("OCR timed out after {secs}s")]
    OcrTimeout { secs: u64 },

    /// Scratch space for OCR could not be prepared.
    #[error("OCR scratch space: {0}")]
    Scratch(String),

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Join(String),
}
