//! File sources feeding the add flow.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use unify_core::{detect_content_type, Error, FileBlob, FileSource, Result};

/// A file on the local filesystem.
///
/// The media type is detected from magic bytes, then the extension.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component of the path, if it is valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

#[async_trait]
impl FileSource for LocalFile {
    async fn read(&self) -> Result<FileBlob> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| Error::FileRead(format!("{}: {}", self.path.display(), e)))?;

        let file_name = self.file_name().map(str::to_string);
        let mime_type = detect_content_type(file_name.as_deref().unwrap_or_default(), &bytes);
        debug!(
            subsystem = "file_source",
            path = %self.path.display(),
            mime_type = %mime_type,
            byte_len = bytes.len(),
            "local file read"
        );

        Ok(FileBlob::new(file_name, mime_type, bytes))
    }
}

/// A file already held in memory, with a caller-declared media type.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    blob: FileBlob,
}

impl InMemoryFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            blob: FileBlob::new(Some(file_name.into()), mime_type, bytes),
        }
    }

    pub fn from_blob(blob: FileBlob) -> Self {
        Self { blob }
    }
}

#[async_trait]
impl FileSource for InMemoryFile {
    async fn read(&self) -> Result<FileBlob> {
        Ok(self.blob.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_file_detects_pdf() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contract.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n").unwrap();

        let blob = LocalFile::new(&path).read().await.unwrap();
        assert_eq!(blob.mime_type, "application/pdf");
        assert_eq!(blob.file_name.as_deref(), Some("contract.pdf"));
        assert!(!blob.is_empty());
    }

    #[tokio::test]
    async fn local_file_missing_is_file_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFile::new(tmp.path().join("missing.png"))
            .read()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileRead(_)));
    }

    #[tokio::test]
    async fn in_memory_file_returns_declared_blob() {
        let source = InMemoryFile::new("scan.png", "image/png", vec![1, 2, 3]);
        let blob = source.read().await.unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.bytes, vec![1, 2, 3]);
    }
}
