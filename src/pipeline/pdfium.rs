//! Primary text-layer reader: PDFium via `pdfium-render`.
//!
//! The shared library is bound when a document is read rather than at start
//! up, so a host without PDFium still serves requests; the tier simply fails
//! and the orchestrator moves on. Lookup order is the configured directory,
//! then `PDFIUM_LIB_PATH`, then the system library search path.
//!
//! PDFium keeps global state and is not re-entrant, so reads are serialised
//! behind a process-wide lock. Callers run this on the blocking pool.

use crate::error::TierError;
use crate::pipeline::tier::TextLayerReader;
use once_cell::sync::Lazy;
use pdfium_render::prelude::{Pdfium, PdfiumError, PdfiumLibraryBindings};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

const ENGINE: &str = "pdfium";

static PDFIUM_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Reads the embedded text layer with PDFium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumReader {
    library_dir: Option<PathBuf>,
}

impl PdfiumReader {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self { library_dir }
    }

    fn library_dir(&self) -> Option<PathBuf> {
        self.library_dir
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from))
    }

    fn bind(&self) -> Result<Pdfium, TierError> {
        let bindings: Box<dyn PdfiumLibraryBindings> = match self.library_dir() {
            Some(dir) => {
                let lib = Pdfium::pdfium_platform_library_name_at_path(&dir);
                debug!("Binding PDFium from {}", lib.display());
                Pdfium::bind_to_library(&lib)
                    .map_err(|e| TierError::Bind(format!("{}: {:?}", lib.display(), e)))?
            }
            None => Pdfium::bind_to_system_library()
                .map_err(|e| TierError::Bind(format!("system library: {:?}", e)))?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl TextLayerReader for PdfiumReader {
    fn engine(&self) -> &'static str {
        ENGINE
    }

    fn read_pages(&self, pdf: &[u8]) -> Result<Vec<String>, TierError> {
        let _guard = PDFIUM_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| TierError::Open {
                engine: ENGINE,
                detail: describe(&e),
            })?;

        let pages = document.pages();
        info!("PDF loaded: {} pages", pages.len());

        let mut out = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| TierError::Page {
                engine: ENGINE,
                page: idx + 1,
                detail: describe(&e),
            })?;
            out.push(text.all());
        }
        Ok(out)
    }
}

fn describe(e: &PdfiumError) -> String {
    format!("{:?}", e)
}
