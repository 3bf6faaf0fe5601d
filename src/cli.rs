//! Command-line plumbing shared by the `pdfsift` and `pdfsift-server` binaries.
//!
//! Both binaries accept the same extraction flags; they are declared once
//! here and flattened into each binary's own `Parser`.

use crate::config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_OCR_TIMEOUT_SECS};
use crate::error::ExtractError;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Flags that map onto [`ExtractionConfig`].
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractionArgs {
    /// Skip the OCR tier entirely.
    #[arg(long, env = "PDFSIFT_NO_OCR")]
    pub no_ocr: bool,

    /// Wall-clock limit for the OCR process, in seconds.
    #[arg(long, env = "PDFSIFT_OCR_TIMEOUT", default_value_t = DEFAULT_OCR_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub ocr_timeout: u64,

    /// OCR executable.
    #[arg(long, env = "PDFSIFT_OCR_PROGRAM", default_value = "ocrmypdf")]
    pub ocr_program: String,

    /// Tesseract language(s) for OCR, e.g. `eng` or `eng+deu`.
    #[arg(long, env = "PDFSIFT_OCR_LANGUAGE")]
    pub ocr_language: Option<String>,

    /// Directory for OCR scratch files (default: system temp dir).
    #[arg(long, env = "PDFSIFT_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Directory containing the PDFium shared library.
    #[arg(
        long,
        env = "PDFSIFT_PDFIUM_LIB",
        long_help = "Directory containing libpdfium. When unset, PDFIUM_LIB_PATH is consulted, \
          then the system library search path. Without PDFium the primary tier is skipped."
    )]
    pub pdfium_lib: Option<PathBuf>,

    /// HTTP download timeout in seconds, for URL inputs.
    #[arg(long, env = "PDFSIFT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    pub download_timeout: u64,
}

impl ExtractionArgs {
    /// Map the flags onto a config builder.
    pub fn builder(&self) -> ExtractionConfigBuilder {
        let mut builder = ExtractionConfig::builder()
            .ocr_enabled(!self.no_ocr)
            .ocr_timeout_secs(self.ocr_timeout)
            .ocr_program(self.ocr_program.clone())
            .download_timeout_secs(self.download_timeout);

        if let Some(ref lang) = self.ocr_language {
            builder = builder.ocr_language(lang.clone());
        }
        if let Some(ref dir) = self.scratch_dir {
            builder = builder.scratch_dir(dir.clone());
        }
        if let Some(ref dir) = self.pdfium_lib {
            builder = builder.pdfium_library_path(dir.clone());
        }
        builder
    }

    pub fn to_config(&self) -> Result<ExtractionConfig, ExtractError> {
        self.builder().build()
    }
}

/// Install a plain-text subscriber writing to stderr.
///
/// `RUST_LOG` overrides `default_filter`.
pub fn init_stderr_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        extraction: ExtractionArgs,
    }

    #[test]
    fn defaults_produce_default_config() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        let config = cli.extraction.to_config().unwrap();
        assert!(config.ocr_enabled);
        assert_eq!(config.ocr_timeout_secs, 120);
        assert_eq!(config.ocr_program, "ocrmypdf");
        assert!(config.ocr_language.is_none());
    }

    #[test]
    fn flags_reach_the_config() {
        let cli = TestCli::try_parse_from([
            "test",
            "--no-ocr",
            "--ocr-timeout",
            "30",
            "--ocr-language",
            "deu",
            "--pdfium-lib",
            "/opt/pdfium",
        ])
        .unwrap();
        let config = cli.extraction.to_config().unwrap();
        assert!(!config.ocr_enabled);
        assert_eq!(config.ocr_timeout_secs, 30);
        assert_eq!(config.ocr_language.as_deref(), Some("deu"));
        assert_eq!(config.pdfium_library_path, Some(PathBuf::from("/opt/pdfium")));
    }

    #[test]
    fn zero_timeout_is_rejected_by_clap() {
        assert!(TestCli::try_parse_from(["test", "--ocr-timeout", "0"]).is_err());
    }
}
