//! The per-document retrieval index: segments, embeddings, and
//! nearest-neighbor search.
//!
//! One [`VectorIndex`] exists per document. It is built once at upload time,
//! may be evicted from memory, and is reconstructed from its serialized
//! artifact without semantic loss: the artifact carries the segment texts and
//! their embeddings together, so a reload needs neither the original document
//! text nor a fresh embedding pass, and search results after a round trip are
//! identical.

use serde::{Deserialize, Serialize};

use crate::document::{SearchResult, Segment};
use crate::error::{QaError, Result};

/// An exact nearest-neighbor index over the segments of one document.
///
/// Search scans every embedding and ranks by cosine similarity. Document
/// indexes here are small (a PDF's worth of 1000-character segments), so an
/// exhaustive scan beats the bookkeeping of an approximate structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorIndex {
    segments: Vec<Segment>,
    embeddings: Vec<Vec<f32>>,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorIndex {
    /// Build an index over the given segments and their embeddings.
    ///
    /// `segments[i]` must correspond to `embeddings[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::IndexBuild`] if the counts differ or the set is
    /// empty. An empty document is rejected here rather than stored silently;
    /// callers surface it as [`QaError::EmptyDocument`] before reaching this
    /// point.
    pub fn build(segments: Vec<Segment>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if segments.len() != embeddings.len() {
            return Err(QaError::IndexBuild(format!(
                "segment count ({}) does not match embedding count ({})",
                segments.len(),
                embeddings.len()
            )));
        }
        if segments.is_empty() {
            return Err(QaError::IndexBuild("cannot build an index over zero segments".to_string()));
        }
        Ok(Self { segments, embeddings })
    }

    /// Number of segments in the index.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the index holds no segments. Always false for a built index.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return the `k` segments most similar to `query`, ordered by
    /// descending cosine similarity.
    ///
    /// Ties keep the original segment order (the underlying sort is stable).
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = self
            .segments
            .iter()
            .zip(self.embeddings.iter())
            .map(|(segment, embedding)| SearchResult {
                segment: segment.clone(),
                score: cosine_similarity(embedding, query),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Serialize the index to a durable artifact.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| QaError::IndexBuild(format!("failed to encode index artifact: {e}")))
    }

    /// Reconstruct an index from a durable artifact.
    ///
    /// Reconstruction is idempotent: the result searches identically to the
    /// index that produced the bytes.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::CorruptArtifact`] if the bytes do not decode.
    pub fn from_bytes(document_id: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| QaError::CorruptArtifact { key: document_id.to_string(), source: e })
    }
}
