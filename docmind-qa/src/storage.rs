//! Durable storage for index artifacts and extracted document text.
//!
//! One artifact pair per document identifier, named deterministically:
//! `<root>/<doc_id>.index` holds the serialized [`VectorIndex`](crate::VectorIndex)
//! and `<root>/<doc_id>.txt` the extracted text for collaborators that need it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::{QaError, Result};

/// Durable storage for per-document index artifacts.
///
/// Absent artifacts are a normal outcome (a question may arrive before an
/// upload finishes), so loads return `Ok(None)` rather than an error. I/O
/// failures surface as [`QaError::Persistence`].
#[async_trait]
pub trait IndexStorage: Send + Sync {
    /// Persist the serialized index for a document, overwriting any previous
    /// artifact.
    async fn save_index(&self, document_id: &str, bytes: &[u8]) -> Result<()>;

    /// Load the serialized index for a document, or `None` if no artifact
    /// exists.
    async fn load_index(&self, document_id: &str) -> Result<Option<Vec<u8>>>;

    /// Persist the extracted text for a document.
    async fn save_text(&self, document_id: &str, text: &str) -> Result<()>;

    /// Load the extracted text for a document, or `None` if absent.
    async fn load_text(&self, document_id: &str) -> Result<Option<String>>;

    /// Remove everything stored for a document. Removing a document that has
    /// no artifacts is a no-op, not an error.
    async fn delete(&self, document_id: &str) -> Result<()>;
}

/// Filesystem-backed [`IndexStorage`] rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FsIndexStorage {
    root: PathBuf,
}

impl FsIndexStorage {
    /// Create a storage handle rooted at `root`. The directory is created on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn index_path(&self, document_id: &str) -> PathBuf {
        self.root.join(format!("{document_id}.index"))
    }

    fn text_path(&self, document_id: &str) -> PathBuf {
        self.root.join(format!("{document_id}.txt"))
    }

    async fn write(&self, document_id: &str, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| QaError::Persistence {
            key: document_id.to_string(),
            source: e,
        })?;
        tokio::fs::write(path, bytes).await.map_err(|e| {
            error!(document.id = document_id, path = %path.display(), error = %e, "write failed");
            QaError::Persistence { key: document_id.to_string(), source: e }
        })?;
        debug!(document.id = document_id, path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }

    async fn remove(&self, document_id: &str, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(document.id = document_id, path = %path.display(), error = %e, "remove failed");
                Err(QaError::Persistence { key: document_id.to_string(), source: e })
            }
        }
    }

    async fn read(&self, document_id: &str, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!(document.id = document_id, path = %path.display(), error = %e, "read failed");
                Err(QaError::Persistence { key: document_id.to_string(), source: e })
            }
        }
    }
}

#[async_trait]
impl IndexStorage for FsIndexStorage {
    async fn save_index(&self, document_id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.index_path(document_id);
        self.write(document_id, &path, bytes).await
    }

    async fn load_index(&self, document_id: &str) -> Result<Option<Vec<u8>>> {
        let path = self.index_path(document_id);
        self.read(document_id, &path).await
    }

    async fn save_text(&self, document_id: &str, text: &str) -> Result<()> {
        let path = self.text_path(document_id);
        self.write(document_id, &path, text.as_bytes()).await
    }

    async fn load_text(&self, document_id: &str) -> Result<Option<String>> {
        let path = self.text_path(document_id);
        match self.read(document_id, &path).await? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| QaError::Persistence {
                    key: document_id.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                }),
            None => Ok(None),
        }
    }

    async fn delete(&self, document_id: &str) -> Result<()> {
        self.remove(document_id, &self.index_path(document_id)).await?;
        self.remove(document_id, &self.text_path(document_id)).await
    }
}
