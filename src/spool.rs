//! Scratch-file staging for uploaded bytes.
//!
//! ## Why a temp file at all?
//!
//! The conversion backends are path-oriented: pdf-extract wants bytes we can
//! re-read, and Whisper decodes from a file on disk. Staging the upload in a
//! [`tempfile::NamedTempFile`] gives the backends a real path while tying
//! the file's lifetime to the [`SpooledUpload`] guard — the file is removed
//! when the guard drops, on success, on error, and on panic-unwind alike.
//!
//! ## Why not name the file after the upload?
//!
//! The user-supplied filename is untrusted: used as a path component it is a
//! traversal hazard, and two concurrent uploads of `scan.pdf` would race on
//! the same path. The on-disk name is therefore a random identifier; only
//! the extension is preserved (it is validated against an allow-list before
//! we get here).

use crate::error::TextpressError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// An upload staged on disk for the duration of one request.
///
/// Dropping the guard deletes the file.
pub struct SpooledUpload {
    file: NamedTempFile,
}

impl SpooledUpload {
    /// Write `bytes` to a uniquely-named file inside `scratch_dir`.
    ///
    /// The directory is created if it does not exist yet.
    pub fn stage(
        scratch_dir: &Path,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<Self, TextpressError> {
        std::fs::create_dir_all(scratch_dir).map_err(|e| TextpressError::Spool { source: e })?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&extension_suffix(original_filename))
            .tempfile_in(scratch_dir)
            .map_err(|e| TextpressError::Spool { source: e })?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| TextpressError::Spool { source: e })?;

        debug!(
            "Staged {} bytes from '{}' at {}",
            bytes.len(),
            original_filename,
            file.path().display()
        );

        Ok(Self { file })
    }

    /// Path of the staged file, valid until the guard drops.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Lower-cased extension of the original filename, dot included, or an empty
/// string when there is none.
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_writes_the_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let spooled = SpooledUpload::stage(dir.path(), "doc.pdf", b"%PDF-1.4 test").unwrap();
        let on_disk = std::fs::read(spooled.path()).unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 test");
    }

    #[test]
    fn staged_name_is_not_the_upload_name() {
        let dir = tempfile::tempdir().unwrap();
        let spooled = SpooledUpload::stage(dir.path(), "../../etc/passwd.pdf", b"x").unwrap();
        // Must stay inside the scratch dir and keep only the extension.
        assert_eq!(spooled.path().parent().unwrap(), dir.path());
        let name = spooled.path().file_name().unwrap().to_string_lossy();
        assert!(!name.contains("passwd"), "got: {name}");
        assert!(name.ends_with(".pdf"), "got: {name}");
    }

    #[test]
    fn identical_filenames_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = SpooledUpload::stage(dir.path(), "scan.pdf", b"a").unwrap();
        let b = SpooledUpload::stage(dir.path(), "scan.pdf", b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"a");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let spooled = SpooledUpload::stage(dir.path(), "doc.pdf", b"x").unwrap();
            spooled.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_scratch_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("scratch");
        let spooled = SpooledUpload::stage(&nested, "doc.pdf", b"x").unwrap();
        assert!(spooled.path().starts_with(&nested));
    }

    #[test]
    fn extension_suffix_handles_odd_names() {
        assert_eq!(extension_suffix("doc.PDF"), ".pdf");
        assert_eq!(extension_suffix("archive.tar.gz"), ".gz");
        assert_eq!(extension_suffix("no_extension"), "");
        assert_eq!(extension_suffix(""), "");
    }
}
