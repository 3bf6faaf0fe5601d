//! HTTP service binary for pdfsift.
//!
//! Builds one extractor at start-up and serves it with axum.

use anyhow::{Context, Result};
use clap::Parser;
use pdfsift::cli::ExtractionArgs;
use pdfsift::server::{create_router, AppState, DEFAULT_MAX_UPLOAD_MB};
use pdfsift::PdfExtractor;
use std::net::SocketAddr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Serve PDF text extraction over HTTP.
#[derive(Parser, Debug)]
#[command(name = "pdfsift-server", version, about = "Serve PDF text extraction over HTTP")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "PDFSIFT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PDFSIFT_PORT", default_value_t = 5001)]
    port: u16,

    /// Largest accepted upload, in megabytes.
    #[arg(long, env = "PDFSIFT_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_upload_mb: u64,

    #[command(flatten)]
    extraction: ExtractionArgs,

    /// Emit logs as JSON lines.
    #[arg(long, env = "PDFSIFT_JSON_LOGS")]
    json_logs: bool,
}

/// Megabytes to bytes, saturating at the platform's `usize`.
fn upload_limit_bytes(mb: u64) -> usize {
    usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pdfsift=debug,tower_http=info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = args
        .extraction
        .to_config()
        .context("Invalid configuration")?;
    let extractor = PdfExtractor::new(config);
    tracing::info!(methods = ?extractor.available_methods(), "Extractor ready");

    let router = create_router(AppState::new(extractor), upload_limit_bytes(args.max_upload_mb));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, max_upload_mb = args.max_upload_mb, "PDF extraction service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
