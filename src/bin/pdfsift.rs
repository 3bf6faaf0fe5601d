//! CLI binary for pdfsift.
//!
//! Extracts one PDF and prints exactly one JSON line on stdout. Everything
//! else (logs, progress, engine noise) goes to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsift::cli::{init_stderr_tracing, ExtractionArgs};
use pdfsift::pipeline::input::resolve_input;
use pdfsift::{
    CompactOutput, ExtractError, ExtractionProgressCallback, ExtractionResult, Method,
    PdfExtractor, ProgressCallback,
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner naming the current tier plus one stderr line
/// per page read.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Loading");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Clear the spinner when extraction never got far enough to complete.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_tier_start(&self, method: Method) {
        self.bar.set_prefix(format!("Trying {method}"));
        self.bar.set_message(match method {
            Method::Ocr => "running OCR, this can take a while…",
            _ => "reading text layer…",
        });
    }

    fn on_page(&self, _method: Method, page_num: usize, char_count: usize) {
        let mark = if char_count > 0 { green("✓") } else { dim("·") };
        self.bar.println(format!(
            "  {} Page {:>3}  {}",
            mark,
            page_num,
            dim(&format!("{char_count:>6} chars")),
        ));
    }

    fn on_tier_complete(&self, method: Method, total_chars: usize) {
        if total_chars == 0 {
            self.bar
                .println(format!("{} {} found no text", cyan("⚠"), bold(method.as_str())));
        }
    }

    fn on_tier_failed(&self, method: Method, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("{} {} failed: {}", red("✗"), bold(method.as_str()), red(&msg)));
    }

    fn on_extraction_complete(&self, result: &ExtractionResult) {
        self.bar.finish_and_clear();
        if result.success {
            eprintln!(
                "{} {} chars from {} pages via {}",
                green("✔"),
                bold(&result.total_chars.to_string()),
                result.num_pages,
                bold(result.method.as_str())
            );
        } else {
            eprintln!(
                "{} {}",
                red("✘"),
                result.error.as_deref().unwrap_or("no extractable text")
            );
        }
    }
}

// ── Stdout guard ─────────────────────────────────────────────────────────────

/// Reserve the real stdout for the JSON payload.
///
/// The process's fd 1 is pointed at stderr so that anything an engine prints
/// lands there; the returned writer is a duplicate of the original stdout.
#[cfg(unix)]
fn claim_stdout() -> io::Result<Box<dyn Write>> {
    use std::fs::File;
    use std::os::unix::io::FromRawFd;

    const STDOUT_FD: i32 = 1;
    const STDERR_FD: i32 = 2;

    io::stdout().flush()?;
    let saved = unsafe { libc::dup(STDOUT_FD) };
    if saved < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::dup2(STDERR_FD, STDOUT_FD) } < 0 {
        let err = io::Error::last_os_error();
        unsafe { libc::close(saved) };
        return Err(err);
    }
    // SAFETY: `saved` is a freshly duplicated descriptor owned by nobody else.
    Ok(Box::new(unsafe { File::from_raw_fd(saved) }))
}

#[cfg(not(unix))]
fn claim_stdout() -> io::Result<Box<dyn Write>> {
    Ok(Box::new(io::stdout()))
}

// ── Arguments ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract with the full fallback chain (compact JSON on stdout)
  pdfsift invoice.pdf

  # Full record with per-page text and the method used
  pdfsift --full invoice.pdf | jq .method

  # Only the pdf-extract tier, no fallback
  pdfsift --tier secondary invoice.pdf

  # Extract from a URL, OCR in German
  pdfsift --ocr-language deu https://example.com/scan.pdf

OUTPUT:
  Default:  {"text": "...", "numPages": 3}
  --full:   {"success", "method", "text", "num_pages", "total_chars", "pages", "error"?}
  If the input cannot be read, the record carries an "error" field and the
  exit code is still 0.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Directory containing libpdfium (primary tier)
  PDFSIFT_*               Every flag has a PDFSIFT_ fallback, see --help
  RUST_LOG                Override the log filter (logs go to stderr)

TIERS:
  primary     PDFium text layer
  secondary   pdf-extract content-stream reader
  ocr         ocrmypdf --force-ocr, then the text layer of its output
"#;

/// Extract plain text from a PDF with a PDFium → pdf-extract → OCR fallback.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsift",
    version,
    about = "Extract plain text from a PDF with a PDFium → pdf-extract → OCR fallback",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Run a single tier instead of the fallback chain.
    #[arg(long, env = "PDFSIFT_TIER", value_enum, default_value = "auto")]
    tier: TierArg,

    /// Print the full result record instead of `{text, numPages}`.
    #[arg(long, env = "PDFSIFT_FULL")]
    full: bool,

    #[command(flatten)]
    extraction: ExtractionArgs,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFSIFT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSIFT_VERBOSE")]
    verbose: bool,

    /// Suppress everything on stderr except errors.
    #[arg(short, long, env = "PDFSIFT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TierArg {
    Auto,
    Primary,
    Secondary,
    Ocr,
}

impl TierArg {
    fn method(self) -> Option<Method> {
        match self {
            TierArg::Auto => None,
            TierArg::Primary => Some(Method::Primary),
            TierArg::Secondary => Some(Method::Secondary),
            TierArg::Ocr => Some(Method::Ocr),
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // Usage errors (including a missing <INPUT>) exit 1 with no JSON.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let mut out = claim_stdout().context("Failed to reserve stdout")?;

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    init_stderr_tracing(filter);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let line = runtime.block_on(run(&cli))?;

    writeln!(out, "{line}").context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Run one extraction and render the JSON line to print.
async fn run(cli: &Cli) -> Result<String> {
    let show_progress = !cli.quiet && !cli.no_progress;
    let spinner = show_progress.then(CliProgressCallback::new);

    let mut builder = cli.extraction.builder();
    if let Some(ref cb) = spinner {
        builder = builder.progress_callback(Arc::clone(cb) as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;
    let extractor = PdfExtractor::new(config);

    let outcome = match resolve_input(&cli.input, cli.extraction.download_timeout).await {
        Ok(source) => match cli.tier.method() {
            None => extractor.extract(source).await,
            Some(method) => extractor.extract_with_tier(method, source).await,
        },
        Err(e) => Err(e),
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if let Some(ref cb) = spinner {
                cb.abandon();
            }
            if e.is_input_error() {
                return render_input_error(&e);
            }
            return Err(e).context("Extraction failed");
        }
    };

    if cli.full {
        serde_json::to_string(&result).context("Failed to serialise result")
    } else {
        serde_json::to_string(&result.compact()).context("Failed to serialise result")
    }
}

fn render_input_error(e: &ExtractError) -> Result<String> {
    tracing::error!("{e}");
    serde_json::to_string(&CompactOutput::input_error(e)).context("Failed to serialise error")
}
