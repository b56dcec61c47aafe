//! Process-wide cache of ready-to-query document indexes.
//!
//! The cache is an explicit, injected component: construct one at process
//! start and hand it to the [`QaEngine`](crate::QaEngine). It is the only
//! shared mutable state in the core. There is no eviction; entries live for
//! the process lifetime, which is an accepted limitation of the design.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::index::VectorIndex;
use crate::storage::IndexStorage;

/// Maps document identifiers to in-memory [`VectorIndex`] handles, lazily
/// reconstructing them from durable storage on a miss.
///
/// Concurrent misses for the same document may both reconstruct; the last
/// writer wins. Reconstruction is idempotent, so this wastes work without
/// corrupting state. The lock is never held across storage I/O.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: RwLock<HashMap<String, Arc<VectorIndex>>>,
}

impl IndexCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite the entry for a document. Idempotent: building
    /// twice with the same identifier overwrites rather than duplicates.
    pub async fn put(&self, document_id: &str, index: Arc<VectorIndex>) {
        let mut entries = self.entries.write().await;
        entries.insert(document_id.to_string(), index);
    }

    /// Return the in-memory index for a document, reconstructing it from
    /// durable storage on a miss.
    ///
    /// `Ok(None)` means no index exists anywhere for this document. That is
    /// a normal outcome (for example, a question asked before the upload
    /// finished), not an error at this level.
    pub async fn get_or_load(
        &self,
        document_id: &str,
        storage: &dyn IndexStorage,
    ) -> Result<Option<Arc<VectorIndex>>> {
        {
            let entries = self.entries.read().await;
            if let Some(index) = entries.get(document_id) {
                debug!(document.id = document_id, "index cache hit");
                return Ok(Some(index.clone()));
            }
        }

        // Miss: reconstruct from the durable artifact without holding the lock.
        let Some(bytes) = storage.load_index(document_id).await? else {
            debug!(document.id = document_id, "no durable index artifact");
            return Ok(None);
        };
        let index = Arc::new(VectorIndex::from_bytes(document_id, &bytes)?);
        info!(document.id = document_id, segments = index.len(), "index reconstructed from storage");

        let mut entries = self.entries.write().await;
        let entry = entries.entry(document_id.to_string()).or_insert_with(|| index.clone());
        Ok(Some(entry.clone()))
    }

    /// Number of documents currently held in memory.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
