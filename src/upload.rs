//! Local file choice and the upload collaborator.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiError;

/// What a file input accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Audio,
}

impl FileKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Image => &["png", "jpg", "jpeg", "gif", "webp"],
            FileKind::Audio => &["mp3", "wav", "ogg", "flac", "m4a"],
        }
    }

    /// Path segment of the upload endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Audio => "audio",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("unsupported {kind} file type: {path}")]
    Unsupported { path: PathBuf, kind: &'static str },
}

/// A validated local file waiting to be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChosenFile {
    path: PathBuf,
    kind: FileKind,
}

impl ChosenFile {
    /// Validate `path` as a file of `kind`.
    pub fn open(path: impl AsRef<Path>, kind: FileKind) -> Result<Self, UploadError> {
        let path = path.as_ref().to_path_buf();
        let meta = fs::metadata(&path).map_err(|_| UploadError::NotFound(path.clone()))?;
        if !meta.is_file() {
            return Err(UploadError::NotAFile(path));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !kind.extensions().contains(&ext.as_str()) {
            return Err(UploadError::Unsupported {
                path,
                kind: kind.as_str(),
            });
        }
        Ok(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// MIME type derived from the extension.
    pub fn content_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "ogg" => "audio/ogg",
            "flac" => "audio/flac",
            "m4a" => "audio/mp4",
            _ => "application/octet-stream",
        }
    }
}

/// Share of an upload sent so far, written by the worker and read by the UI.
#[derive(Clone, Debug, Default)]
pub struct UploadProgress(Arc<AtomicU8>);

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sent` of `total` bytes. An empty body counts as done.
    pub fn set(&self, sent: u64, total: u64) {
        let percent = if total == 0 {
            100
        } else {
            (sent.min(total) * 100 / total) as u8
        };
        self.0.store(percent, Ordering::Relaxed);
    }

    pub fn percent(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Request body reader that reports every chunk to an `UploadProgress`.
pub struct ProgressReader<R> {
    inner: R,
    sent: u64,
    total: u64,
    progress: UploadProgress,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, total: u64, progress: UploadProgress) -> Self {
        progress.set(0, total);
        Self {
            inner,
            sent: 0,
            total,
            progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.sent += n as u64;
        self.progress.set(self.sent, self.total);
        Ok(n)
    }
}

/// Uploads a chosen file and returns the URL the API will serve it from.
pub trait Uploader: Send + Sync {
    fn upload(&self, file: &ChosenFile, progress: &UploadProgress) -> Result<String, ApiError>;
}

/// Upload `file` if present. `None` means "keep the current cover".
pub fn upload_if_chosen(
    uploader: &dyn Uploader,
    file: Option<&ChosenFile>,
    progress: &UploadProgress,
) -> Result<Option<String>, ApiError> {
    match file {
        Some(file) => {
            let url = uploader.upload(file, progress)?;
            tracing::debug!(file = %file.file_name(), %url, "uploaded file");
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_accepts_image() {
        let file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        let chosen = ChosenFile::open(file.path(), FileKind::Image).unwrap();
        assert_eq!(chosen.content_type(), "image/png");
        assert!(chosen.file_name().ends_with(".PNG"));
    }

    #[test]
    fn test_open_rejects_wrong_kind() {
        let file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        let err = ChosenFile::open(file.path(), FileKind::Image).unwrap_err();
        assert!(matches!(err, UploadError::Unsupported { kind: "image", .. }));
    }

    #[test]
    fn test_progress_reader_reports_percentage() {
        let progress = UploadProgress::new();
        let mut reader = ProgressReader::new(io::Cursor::new(vec![7u8; 200]), 200, progress.clone());
        assert_eq!(progress.percent(), 0);

        let mut chunk = [0u8; 50];
        reader.read_exact(&mut chunk).unwrap();
        assert_eq!(progress.percent(), 25);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest.len(), 150);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_progress_of_empty_body_is_complete() {
        let progress = UploadProgress::new();
        progress.set(0, 0);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_open_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ChosenFile::open(dir.path().join("nope.png"), FileKind::Image),
            Err(UploadError::NotFound(_))
        ));
        assert!(matches!(
            ChosenFile::open(dir.path(), FileKind::Image),
            Err(UploadError::NotAFile(_))
        ));
    }
}
