//! CLI binary for textpress.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServerConfig`, constructs the optional speech-to-text service, and
//! serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use textpress::web::{router, AppState};
use textpress::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port (5000)
  textpress

  # Serve on a custom port
  textpress --port 8080
  PORT=8080 textpress

  # Keep scratch files on a specific volume
  textpress --scratch-dir /var/tmp/textpress

  # Enable audio transcription (requires building with --features audio)
  textpress --whisper-model ~/models/ggml-small.bin

ROUTES:
  GET  /            Upload form
  POST /pdf-to-txt  Convert an uploaded PDF to plain text
  POST /transcribe  Transcribe an uploaded WAV recording (audio builds only)

ENVIRONMENT VARIABLES:
  PORT                     Port to listen on (same as --port)
  TEXTPRESS_SCRATCH_DIR    Scratch directory for in-flight uploads
  TEXTPRESS_WHISPER_MODEL  Path to a Whisper GGML model file
  RUST_LOG                 Log filter (overrides --verbose/--quiet)
"#;

/// Web form that turns uploaded PDFs (and optionally audio) into plain text.
#[derive(Parser, Debug)]
#[command(
    name = "textpress",
    version,
    about = "Web form that turns uploaded PDFs (and optionally audio) into plain text",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory where uploads are staged while a request is in flight.
    #[arg(long, env = "TEXTPRESS_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Maximum accepted upload size in MiB.
    #[arg(long, default_value_t = 25)]
    max_upload_mb: usize,

    /// Path to a Whisper GGML model; enables the /transcribe route.
    #[cfg(feature = "audio")]
    #[arg(long, env = "TEXTPRESS_WHISPER_MODEL")]
    whisper_model: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug,hyper=info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ServerConfig::builder()
        .bind_addr(cli.bind)
        .port(cli.port)
        .max_upload_bytes(cli.max_upload_mb * 1024 * 1024);
    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;
    if let Ok(json) = serde_json::to_string(&config) {
        tracing::debug!("Configuration: {json}");
    }

    std::fs::create_dir_all(&config.scratch_dir).with_context(|| {
        format!(
            "Failed to create scratch directory {}",
            config.scratch_dir.display()
        )
    })?;
    info!("Scratch directory: {}", config.scratch_dir.display());

    // ── Speech-to-text service ───────────────────────────────────────────
    // A model that fails to load is not fatal: the server still serves the
    // PDF route, and /transcribe reports the model as unavailable.
    let transcriber = load_transcriber(&cli);
    if transcriber.is_some() {
        info!("Audio transcription enabled");
    }

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = config.socket_addr();
    let app = router(AppState::new(config, transcriber));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

#[cfg(feature = "audio")]
fn load_transcriber(cli: &Cli) -> Option<textpress::SharedTranscriber> {
    use std::sync::Arc;
    use textpress::extract::audio::WhisperTranscriber;
    use tracing::error;

    let path = cli.whisper_model.as_deref()?;
    match WhisperTranscriber::load(path) {
        Ok(t) => Some(Arc::new(t)),
        Err(e) => {
            error!("Speech model failed to initialize: {e}");
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn load_transcriber(_cli: &Cli) -> Option<textpress::SharedTranscriber> {
    None
}
