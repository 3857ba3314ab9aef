//! PDF text extraction via the pdf-extract crate.
//!
//! ## Why spawn_blocking?
//!
//! pdf-extract parses and decodes the whole document synchronously on the
//! calling thread. Inside an axum handler that would stall a Tokio worker
//! for the duration of the parse, so the work is moved onto the blocking
//! thread pool.
//!
//! The output is the library's own page-order concatenation, returned
//! unmodified: callers comparing against direct pdf-extract output must see
//! identical text.

use crate::error::TextpressError;
use std::path::Path;
use tracing::debug;

/// Extract the text content of the PDF at `path`.
///
/// Pages are concatenated in source order. The text may be empty for PDFs
/// without a text layer (scanned documents).
pub async fn extract_text(path: &Path) -> Result<String, TextpressError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || extract_text_blocking(&path))
        .await
        .map_err(|e| TextpressError::Internal(format!("Extraction task panicked: {e}")))?
}

fn extract_text_blocking(path: &Path) -> Result<String, TextpressError> {
    let bytes = std::fs::read(path).map_err(|e| TextpressError::Conversion {
        detail: format!("Failed to read staged file: {e}"),
    })?;

    // Check the magic bytes before handing the buffer to the parser, so the
    // user sees a meaningful message rather than a parser-internal one.
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(TextpressError::Conversion {
            detail: "The file is not a valid PDF (missing %PDF header).".into(),
        });
    }

    let text =
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| TextpressError::Conversion {
            detail: e.to_string(),
        })?;

    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn rejects_non_pdf_bytes() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"this is plain text, not a pdf").unwrap();

        let err = extract_text(f.path()).await.unwrap_err();
        assert!(
            err.to_string().contains("%PDF"),
            "expected magic-byte error, got: {err}"
        );
    }

    #[tokio::test]
    async fn rejects_truncated_header() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();

        let err = extract_text(f.path()).await.unwrap_err();
        assert!(matches!(err, TextpressError::Conversion { .. }));
    }

    #[tokio::test]
    async fn corrupt_pdf_surfaces_library_detail() {
        // Valid magic, garbage body: the parser itself must fail, and its
        // message must be carried through.
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.4\ngarbage garbage garbage").unwrap();

        let err = extract_text(f.path()).await.unwrap_err();
        match err {
            TextpressError::Conversion { detail } => assert!(!detail.is_empty()),
            other => panic!("expected Conversion, got: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_a_conversion_error() {
        let err = extract_text(Path::new("/nonexistent/gone.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, TextpressError::Conversion { .. }));
    }
}
