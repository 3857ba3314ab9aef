//! Error types for textpress.
//!
//! A single enum covers every way a conversion request can fail. All
//! variants are terminal for their request: the web layer catches the error
//! at the handler boundary and embeds its message in the rendered page, so
//! no request error ever surfaces as a raw process failure. Nothing is
//! retried.

use thiserror::Error;

/// All errors produced while handling a conversion request.
#[derive(Debug, Error)]
pub enum TextpressError {
    // ── Upload validation ─────────────────────────────────────────────────
    /// The multipart request carried no file part under the expected field.
    #[error("No file was uploaded: the request has no '{field}' file part.")]
    MissingFile { field: &'static str },

    /// The field was present but the browser sent an empty filename
    /// (typically: the form was submitted with no file selected).
    #[error("No file was selected for '{field}'.")]
    EmptyFilename { field: &'static str },

    /// The uploaded filename does not carry the extension the route expects.
    #[error("Invalid file type for '{filename}': expected a {expected} file.")]
    InvalidFileType {
        filename: String,
        expected: &'static str,
    },

    /// The multipart body itself could not be read or parsed.
    #[error("Malformed upload request: {detail}")]
    Multipart { detail: String },

    // ── Conversion ────────────────────────────────────────────────────────
    /// The extraction or transcription library failed on the staged file.
    #[error("Conversion failed: {detail}")]
    Conversion { detail: String },

    /// The speech-to-text model is not loaded, so `/transcribe` cannot run.
    #[error(
        "The speech-to-text model is not available on this server.\n\
         Start textpress with --whisper-model <PATH> (requires the `audio` feature)."
    )]
    ModelUnavailable,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Staging the uploaded bytes in the scratch directory failed.
    #[error("Failed to stage the upload on disk: {source}")]
    Spool {
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
