//! # textpress
//!
//! A self-hosted web form that accepts an uploaded PDF (and, with the `audio`
//! feature, a WAV recording) and returns the extracted text on a rendered
//! HTML page.
//!
//! All real conversion work is delegated: PDF text extraction to the
//! [`pdf_extract`] crate, speech-to-text to a Whisper model behind the
//! [`extract::Transcriber`] trait. What this crate owns is the request
//! lifecycle around those calls.
//!
//! ## Request Lifecycle
//!
//! ```text
//! multipart upload
//!  │
//!  ├─ 1. Validate  field present, filename non-empty, extension matches route
//!  ├─ 2. Spool     bytes → opaque temp file in the scratch directory
//!  ├─ 3. Convert   pdf-extract / whisper (CPU-bound, spawn_blocking)
//!  ├─ 4. Cleanup   scratch file removed on drop — every exit path
//!  └─ 5. Render    result page with extracted text OR an error message
//! ```
//!
//! Requests are independent: no state survives a request, and scratch files
//! are named with random identifiers so identical uploads never collide.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textpress::{web, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let app = web::router(web::AppState::new(config, None));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `textpress` binary (clap + anyhow + tracing-subscriber) |
//! | `audio` | off     | Whisper-backed `/transcribe` route (whisper-rs + hound + rubato) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod spool;
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServerConfig, ServerConfigBuilder};
pub use convert::{pdf_to_text, transcribe_audio, UploadKind};
pub use error::TextpressError;
pub use extract::{SharedTranscriber, Transcriber};
pub use spool::SpooledUpload;
