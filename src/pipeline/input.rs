//! Input resolution: turn a path, URL or upload into document bytes.
//!
//! Every tier works on an in-memory buffer. PDFium and pdf-extract both load
//! from a byte slice and the OCR tier writes its own scratch copy, so once an
//! input is loaded nothing else touches the caller's file. Input checks
//! (missing, unreadable, empty) happen here, before any tier runs. The
//! `%PDF` header is deliberately not checked: an odd or damaged file is left
//! to the tiers, which fail one by one and yield a logical failure.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a PDF comes from.
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An in-memory buffer, e.g. an HTTP upload.
    Bytes(Vec<u8>),
}

impl From<PathBuf> for PdfSource {
    fn from(p: PathBuf) -> Self {
        PdfSource::Path(p)
    }
}

impl From<&Path> for PdfSource {
    fn from(p: &Path) -> Self {
        PdfSource::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(b: Vec<u8>) -> Self {
        PdfSource::Bytes(b)
    }
}

/// A loaded document, owned by exactly one extraction call.
///
/// Cloning is cheap; the bytes are shared so they can be moved onto the
/// blocking pool without copying.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    bytes: Arc<[u8]>,
    label: String,
}

impl PdfDocument {
    /// Wrap a buffer that has already been read.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>, label: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            label: label.into(),
        }
    }

    /// Load a source, applying the input checks.
    pub async fn load(source: PdfSource) -> Result<Self, ExtractError> {
        match source {
            PdfSource::Path(path) => load_path(&path).await,
            PdfSource::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(ExtractError::EmptyInput {
                        input: "<bytes>".to_string(),
                    });
                }
                Ok(Self::from_bytes(bytes, "<bytes>"))
            }
        }
    }

    /// Shared handle on the raw bytes.
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Human-readable origin used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }
}

async fn load_path(path: &Path) -> Result<PdfDocument, ExtractError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ if path.is_dir() => ExtractError::InvalidInput {
            input: path.display().to_string(),
            reason: "is a directory".to_string(),
        },
        _ => ExtractError::Internal(format!("reading '{}': {}", path.display(), e)),
    })?;

    if bytes.is_empty() {
        return Err(ExtractError::EmptyInput {
            input: path.display().to_string(),
        });
    }

    debug!("Loaded local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(PdfDocument::from_bytes(bytes, path.display().to_string()))
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a command-line argument to a source.
///
/// URLs are downloaded into memory; anything else is taken as a path and
/// checked later by [`PdfDocument::load`].
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<PdfSource, ExtractError> {
    if input.trim().is_empty() {
        return Err(ExtractError::InvalidInput {
            input: input.to_string(),
            reason: "no path or URL given".to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await.map(PdfSource::Bytes)
    } else {
        Ok(PdfSource::Path(PathBuf::from(input)))
    }
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, ExtractError> {
    info!("Downloading PDF from: {}", url);

    let failed = |reason: String| ExtractError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if bytes.is_empty() {
        return Err(ExtractError::EmptyInput {
            input: url.to_string(),
        });
    }

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// True when an upload filename carries a `.pdf` extension (any case).
pub fn has_pdf_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}
