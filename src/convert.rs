//! The conversion request lifecycle.
//!
//! One entry point per route, both following the same shape: validate the
//! filename, spool the bytes into the scratch directory, run the backend,
//! return the text. The [`SpooledUpload`] guard is held across the backend
//! call and dropped on the way out, so the scratch file is gone before the
//! caller sees the result — on the error paths too.
//!
//! No retries, no shared state: each call is independent and leaves nothing
//! behind.

use crate::config::ServerConfig;
use crate::error::TextpressError;
use crate::extract;
use crate::extract::SharedTranscriber;
use crate::spool::SpooledUpload;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The two kinds of upload the server accepts, one per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Audio,
}

impl UploadKind {
    /// Name of the multipart form field this kind is read from.
    pub fn form_field(self) -> &'static str {
        match self {
            UploadKind::Pdf => "pdf_file",
            UploadKind::Audio => "audio_file",
        }
    }

    /// Human-readable description of the accepted type, used in error text.
    pub fn expected(self) -> &'static str {
        match self {
            UploadKind::Pdf => ".pdf",
            UploadKind::Audio => ".wav",
        }
    }

    fn accepts_extension(self, ext: &str) -> bool {
        match self {
            UploadKind::Pdf => ext == "pdf",
            // The decoding stack is WAV-only; see the audio backend.
            UploadKind::Audio => ext == "wav" || ext == "wave",
        }
    }
}

/// Validate a user-supplied filename against the route's expected type.
///
/// The filename is only ever inspected, never used as a path — the scratch
/// file gets an opaque name.
pub fn validate_filename(kind: UploadKind, filename: &str) -> Result<(), TextpressError> {
    if filename.is_empty() {
        return Err(TextpressError::EmptyFilename {
            field: kind.form_field(),
        });
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !kind.accepts_extension(&ext) {
        return Err(TextpressError::InvalidFileType {
            filename: filename.to_string(),
            expected: kind.expected(),
        });
    }

    Ok(())
}

/// Convert one uploaded PDF to text.
///
/// # Errors
/// [`TextpressError::EmptyFilename`] / [`TextpressError::InvalidFileType`]
/// before any disk I/O; [`TextpressError::Spool`] if staging fails;
/// [`TextpressError::Conversion`] if extraction fails. In every case the
/// scratch file is removed before this function returns.
pub async fn pdf_to_text(
    config: &ServerConfig,
    filename: &str,
    bytes: &[u8],
) -> Result<String, TextpressError> {
    validate_filename(UploadKind::Pdf, filename)?;

    let spooled = SpooledUpload::stage(&config.scratch_dir, filename, bytes)?;
    let text = extract::pdf::extract_text(spooled.path()).await?;

    info!(
        "Converted '{}' ({} bytes) to {} chars of text",
        filename,
        bytes.len(),
        text.len()
    );
    Ok(text)
    // `spooled` drops here: the scratch file is removed on success and on
    // every `?` above that fired after staging.
}

/// Transcribe one uploaded WAV recording.
///
/// Fails with [`TextpressError::ModelUnavailable`] when no transcriber was
/// configured at startup. Inference runs on the blocking pool; the spool
/// guard is held until it finishes.
pub async fn transcribe_audio(
    config: &ServerConfig,
    transcriber: Option<&SharedTranscriber>,
    filename: &str,
    bytes: &[u8],
) -> Result<String, TextpressError> {
    let transcriber = transcriber.ok_or(TextpressError::ModelUnavailable)?;
    validate_filename(UploadKind::Audio, filename)?;

    let spooled = SpooledUpload::stage(&config.scratch_dir, filename, bytes)?;
    let path = spooled.path().to_path_buf();
    let transcriber = Arc::clone(transcriber);

    let transcript = tokio::task::spawn_blocking(move || transcriber.transcribe(&path))
        .await
        .map_err(|e| TextpressError::Internal(format!("Transcription task panicked: {e}")))??;

    info!(
        "Transcribed '{}' ({} bytes) to {} chars",
        filename,
        bytes.len(),
        transcript.len()
    );
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_config(dir: &Path) -> ServerConfig {
        ServerConfig::builder()
            .scratch_dir(dir)
            .build()
            .expect("valid test config")
    }

    #[test]
    fn pdf_filenames_are_checked_case_insensitively() {
        assert!(validate_filename(UploadKind::Pdf, "report.pdf").is_ok());
        assert!(validate_filename(UploadKind::Pdf, "REPORT.PDF").is_ok());
        assert!(validate_filename(UploadKind::Pdf, "archive.Pdf").is_ok());
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let err = validate_filename(UploadKind::Pdf, "notes.docx").unwrap_err();
        assert!(matches!(err, TextpressError::InvalidFileType { .. }));

        let err = validate_filename(UploadKind::Pdf, "no_extension").unwrap_err();
        assert!(matches!(err, TextpressError::InvalidFileType { .. }));
    }

    #[test]
    fn empty_filename_is_its_own_error() {
        let err = validate_filename(UploadKind::Pdf, "").unwrap_err();
        assert!(matches!(err, TextpressError::EmptyFilename { .. }));
    }

    #[test]
    fn audio_accepts_wav_variants_only() {
        assert!(validate_filename(UploadKind::Audio, "memo.wav").is_ok());
        assert!(validate_filename(UploadKind::Audio, "memo.WAVE").is_ok());
        assert!(validate_filename(UploadKind::Audio, "memo.mp3").is_err());
    }

    #[tokio::test]
    async fn invalid_type_creates_no_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());

        let err = pdf_to_text(&config, "notes.txt", b"hello")
            .await
            .unwrap_err();
        assert!(matches!(err, TextpressError::InvalidFileType { .. }));
        // Validation happens before staging, so nothing was written at all.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_extraction_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());

        let err = pdf_to_text(&config, "broken.pdf", b"not a pdf at all")
            .await
            .unwrap_err();
        assert!(matches!(err, TextpressError::Conversion { .. }));
        assert_eq!(
            std::fs::read_dir(&config.scratch_dir).unwrap().count(),
            0,
            "scratch dir must be empty after a failed conversion"
        );
    }

    #[tokio::test]
    async fn transcribe_without_model_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());

        let err = transcribe_audio(&config, None, "memo.wav", b"RIFF")
            .await
            .unwrap_err();
        assert!(matches!(err, TextpressError::ModelUnavailable));
    }

    struct FixedTranscriber(&'static str);

    impl crate::extract::Transcriber for FixedTranscriber {
        fn transcribe(&self, path: &Path) -> Result<String, TextpressError> {
            assert!(path.exists(), "spool file must exist during transcription");
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn transcribe_uses_the_injected_backend_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(dir.path());
        let t: SharedTranscriber = Arc::new(FixedTranscriber("hello from the mock"));

        let transcript = transcribe_audio(&config, Some(&t), "memo.wav", b"RIFF....WAVE")
            .await
            .unwrap();
        assert_eq!(transcript, "hello from the mock");
        assert_eq!(std::fs::read_dir(&config.scratch_dir).unwrap().count(), 0);
    }
}
