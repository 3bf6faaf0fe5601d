//! Configuration for the tiered extractor.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. The binaries map their flags
//! onto the builder; library users set only what they care about and rely on
//! the defaults for the rest.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default OCR wall-clock budget.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 120;

/// Configuration for a [`crate::PdfExtractor`].
///
/// # Example
/// ```rust
/// use pdfsift::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .ocr_timeout_secs(60)
///     .ocr_language("eng+deu")
///     .build()
///     .unwrap();
/// assert!(config.ocr_enabled);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Append the OCR tier to the fallback chain. Default: true.
    pub ocr_enabled: bool,

    /// Hard wall-clock limit for the OCR process in seconds. Default: 120.
    ///
    /// On expiry the child is killed and the tier counts as failed.
    pub ocr_timeout_secs: u64,

    /// OCR executable. Default: `ocrmypdf`.
    pub ocr_program: String,

    /// Arguments placed before `[-l LANG] <input> <output>`.
    /// Default: `--force-ocr --verbose 1`.
    pub ocr_args: Vec<String>,

    /// Tesseract language string passed as `-l`, e.g. `eng+fra`.
    pub ocr_language: Option<String>,

    /// Directory in which per-request OCR scratch directories are created.
    /// If None, the system temp directory is used.
    pub scratch_dir: Option<PathBuf>,

    /// Directory containing the PDFium shared library.
    /// If None, `PDFIUM_LIB_PATH` is consulted, then the system library.
    pub pdfium_library_path: Option<PathBuf>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            ocr_timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
            ocr_program: "ocrmypdf".to_string(),
            ocr_args: vec![
                "--force-ocr".to_string(),
                "--verbose".to_string(),
                "1".to_string(),
            ],
            ocr_language: None,
            scratch_dir: None,
            pdfium_library_path: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("ocr_enabled", &self.ocr_enabled)
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .field("ocr_program", &self.ocr_program)
            .field("ocr_args", &self.ocr_args)
            .field("ocr_language", &self.ocr_language)
            .field("scratch_dir", &self.scratch_dir)
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full OCR argument vector for the given input and output paths.
    pub fn ocr_command_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.ocr_args.iter().map(Into::into).collect();
        if let Some(ref lang) = self.ocr_language {
            args.push("-l".into());
            args.push(lang.into());
        }
        args.push(input.as_os_str().to_owned());
        args.push(output.as_os_str().to_owned());
        args
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl fmt::Debug for ExtractionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ExtractionConfigBuilder {
    pub fn ocr_enabled(mut self, v: bool) -> Self {
        self.config.ocr_enabled = v;
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs;
        self
    }

    pub fn ocr_program(mut self, program: impl Into<String>) -> Self {
        self.config.ocr_program = program.into();
        self
    }

    pub fn ocr_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ocr_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = Some(lang.into());
        self
    }

    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = Some(dir.into());
        self
    }

    pub fn pdfium_library_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(dir.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.ocr_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "OCR timeout must be at least 1 second".into(),
            ));
        }
        if c.ocr_enabled && c.ocr_program.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR program must not be empty when OCR is enabled".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "Download timeout must be at least 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
