//! OCR escalation: run an external OCR program to inject a text layer, then
//! re-read the result with the text-layer readers.
//!
//! ## Scratch space
//!
//! Each attempt gets its own `TempDir` holding `input.pdf` and `output.pdf`.
//! The directory is owned by the attempt and removed when it goes out of
//! scope, which covers success, program failure, timeout and early returns
//! alike.
//!
//! ## Timeout
//!
//! The child is spawned with `kill_on_drop`; when the wall-clock budget runs
//! out the wait future is dropped, which kills the process before the
//! scratch directory is removed. On unix the child leads its own process
//! group and the whole group is killed, so helpers it started (tesseract,
//! ghostscript) do not outlive the attempt.

use crate::config::ExtractionConfig;
use crate::error::TierError;
use crate::output::Method;
use crate::pipeline::input::PdfDocument;
use crate::pipeline::tier::{read_normalised, TextLayerReader, Tier};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Lines of OCR stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// The OCR tier.
pub struct OcrTier {
    config: ExtractionConfig,
    readers: Vec<Arc<dyn TextLayerReader>>,
}

impl OcrTier {
    /// `readers` are tried in order on the OCR output until one succeeds.
    pub fn new(config: ExtractionConfig, readers: Vec<Arc<dyn TextLayerReader>>) -> Self {
        Self { config, readers }
    }

    fn scratch(&self) -> Result<TempDir, TierError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfsift-ocr-");
        let dir = match self.config.scratch_dir {
            Some(ref dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        };
        dir.map_err(|e| TierError::Scratch(e.to_string()))
    }

    async fn run_program(&self, scratch: &TempDir, pdf: &[u8]) -> Result<Vec<u8>, TierError> {
        let input = scratch.path().join("input.pdf");
        let output = scratch.path().join("output.pdf");

        tokio::fs::write(&input, pdf)
            .await
            .map_err(|e| TierError::Scratch(format!("writing OCR input: {e}")))?;

        let program = &self.config.ocr_program;
        let mut cmd = Command::new(program);
        cmd.args(self.config.ocr_command_args(&input, &output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        let child = cmd.spawn().map_err(|e| TierError::OcrSpawn {
            program: program.clone(),
            detail: e.to_string(),
        })?;
        let _group = ProcessGroup(child.id());

        let secs = self.config.ocr_timeout_secs;
        let started = Instant::now();
        let out = tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output())
            .await
            .map_err(|_| {
                warn!("OCR exceeded {}s, killing {}", secs, program);
                TierError::OcrTimeout { secs }
            })?
            .map_err(|e| TierError::OcrSpawn {
                program: program.clone(),
                detail: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&out.stderr);
        debug!("{} finished in {:.1?}: {}", program, started.elapsed(), stderr.trim());

        if !out.status.success() {
            return Err(TierError::OcrFailed {
                status: out.status.to_string(),
                stderr: stderr_tail(&stderr),
            });
        }

        tokio::fs::read(&output)
            .await
            .map_err(|e| TierError::Scratch(format!("reading OCR output: {e}")))
    }
}

#[async_trait]
impl Tier for OcrTier {
    fn method(&self) -> Method {
        Method::Ocr
    }

    async fn attempt(&self, document: &PdfDocument) -> Result<Vec<String>, TierError> {
        let scratch = self.scratch()?;
        debug!("OCR scratch: {}", scratch.path().display());

        let ocr_pdf: Arc<[u8]> = self.run_program(&scratch, &document.bytes()).await?.into();
        info!("OCR produced {} bytes, re-reading text layer", ocr_pdf.len());

        let mut last_err = TierError::Open {
            engine: "ocr",
            detail: "no text-layer reader configured".to_string(),
        };
        for reader in &self.readers {
            match read_normalised(Arc::clone(reader), Arc::clone(&ocr_pdf)).await {
                Ok(pages) => return Ok(pages),
                Err(e) => {
                    warn!("Re-reading OCR output with {} failed: {}", reader.engine(), e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

/// Kills the OCR child's process group when dropped.
///
/// Dropped when `run_program` returns, before the attempt's scratch
/// directory is removed.
struct ProcessGroup(Option<u32>);

impl Drop for ProcessGroup {
    #[cfg(unix)]
    fn drop(&mut self) {
        if let Some(pgid) = self.0.and_then(|id| libc::pid_t::try_from(id).ok()) {
            // ESRCH once every member has exited.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }

    #[cfg(not(unix))]
    fn drop(&mut self) {}
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
