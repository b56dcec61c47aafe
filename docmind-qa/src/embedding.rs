//! Embedding provider trait for converting text into semantic vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that converts text into fixed-dimension embedding vectors.
///
/// Implementations wrap an external embedding model behind an async
/// interface. A provider failure must surface as
/// [`QaError::Embedding`](crate::QaError::Embedding), never as a silent zero
/// vector. Bit-for-bit determinism across calls is not guaranteed; similarity
/// comparisons downstream tolerate small numeric variance.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, typically a question.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, typically the segments of one document.
    ///
    /// The returned vectors are in the same order as `texts`. The default
    /// implementation embeds sequentially; providers with a native batch
    /// endpoint should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// The dimensionality of vectors produced by this provider.
    fn dimensions(&self) -> usize;
}
