//! Conversion backends.
//!
//! Each submodule wraps exactly one third-party conversion library behind a
//! path-in, text-out function. Keeping the backends separate from the
//! request lifecycle means they can be tested (and mocked) without an HTTP
//! server in sight.
//!
//! 1. [`pdf`]   — text extraction via pdf-extract; runs in `spawn_blocking`
//!    because parsing is CPU-bound
//! 2. [`audio`] — Whisper speech-to-text behind the [`Transcriber`] trait
//!    (`audio` feature only)

pub mod pdf;

#[cfg(feature = "audio")]
pub mod audio;

use crate::error::TextpressError;
use std::path::Path;
use std::sync::Arc;

/// A speech-to-text backend.
///
/// The server holds at most one, constructed once at startup and injected
/// into the handlers — there is no global model state. Implementations are
/// called from `spawn_blocking`, so `transcribe` may block freely.
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `path` into plain text.
    ///
    /// Language is auto-detected; the transcript is best-effort and returned
    /// in segment order.
    fn transcribe(&self, path: &Path) -> Result<String, TextpressError>;
}

/// Shared handle to the server's transcriber, if one is configured.
pub type SharedTranscriber = Arc<dyn Transcriber>;
