//! The QA engine: public entry points for indexing documents and answering
//! questions against them.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docmind_qa::{FixedSizeChunker, FsIndexStorage, IndexCache, QaConfig, QaEngine};
//!
//! let engine = QaEngine::builder()
//!     .config(QaConfig::default())
//!     .chunker(Arc::new(FixedSizeChunker::new(1000, 100)))
//!     .embedder(Arc::new(my_embedder))
//!     .generator(Arc::new(my_generator))
//!     .storage(Arc::new(FsIndexStorage::new("indexes")))
//!     .build()?;
//!
//! engine.build_index("doc1", &extracted_text).await?;
//! let answer = engine.answer("doc1", "What is this about?", &history).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::cache::IndexCache;
use crate::chunking::Chunker;
use crate::config::QaConfig;
use crate::document::ConversationTurn;
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::generation::AnswerGenerator;
use crate::index::VectorIndex;
use crate::prompt;
use crate::storage::IndexStorage;

/// Orchestrates the upload-side index build and the question-answering
/// pipeline over injected collaborators. Construct one via
/// [`QaEngine::builder()`].
///
/// Failures propagate unchanged: there are no retries and no partial
/// results. A failed build leaves no cache entry and no durable artifact; a
/// failed answer leaves conversation history untouched (the caller decides
/// whether to persist an unanswered question).
pub struct QaEngine {
    config: QaConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn AnswerGenerator>,
    storage: Arc<dyn IndexStorage>,
    cache: Arc<IndexCache>,
}

impl QaEngine {
    /// Create a new [`QaEngineBuilder`].
    pub fn builder() -> QaEngineBuilder {
        QaEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Return a reference to the shared index cache.
    pub fn cache(&self) -> &Arc<IndexCache> {
        &self.cache
    }

    /// Build and register the retrieval index for a newly uploaded document.
    ///
    /// Chunks the extracted text, embeds every segment in one batch, builds
    /// the [`VectorIndex`], persists its artifact (and the text) under
    /// `document_id`, and registers the index in the cache. Building twice
    /// for the same identifier overwrites both artifact and cache entry.
    ///
    /// Returns the number of segments indexed.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::EmptyDocument`] if chunking yields no segments,
    /// and otherwise propagates embedding, build, and persistence failures
    /// unchanged. On any failure, no cache entry and no durable artifacts
    /// exist for `document_id`: the index artifact is written last, and a
    /// failed index write removes the already-written text.
    pub async fn build_index(&self, document_id: &str, text: &str) -> Result<usize> {
        let segments = self.chunker.chunk(document_id, text);
        if segments.is_empty() {
            error!(document.id = document_id, "no segments to index");
            return Err(QaError::EmptyDocument(document_id.to_string()));
        }

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
            error!(document.id = document_id, error = %e, "embedding failed during index build");
        })?;

        let index = VectorIndex::build(segments, embeddings)?;
        let bytes = index.to_bytes()?;

        // The index artifact is the commit point: it is written last, and a
        // failed write removes the already-written text so nothing durable
        // survives a failed build.
        self.storage.save_text(document_id, text).await?;
        if let Err(e) = self.storage.save_index(document_id, &bytes).await {
            if let Err(cleanup) = self.storage.delete(document_id).await {
                error!(
                    document.id = document_id,
                    error = %cleanup,
                    "cleanup after failed index write also failed"
                );
            }
            return Err(e);
        }

        let segment_count = index.len();
        self.cache.put(document_id, Arc::new(index)).await;
        info!(document.id = document_id, segments = segment_count, "document indexed");

        Ok(segment_count)
    }

    /// Answer a question against a document's index.
    ///
    /// Looks the index up in the cache (reconstructing from storage if
    /// needed), retrieves the most similar segments for the question,
    /// composes a grounded prompt from the retrieved context and the prior
    /// `history`, and generates the answer.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::DocumentNotIndexed`] when no index exists in
    /// memory or storage, so callers can distinguish "not ready" from a real
    /// answer. Embedding and generation failures propagate unchanged; a
    /// blank generation is reported as [`QaError::Generation`].
    pub async fn answer(
        &self,
        document_id: &str,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<String> {
        let index = self
            .cache
            .get_or_load(document_id, self.storage.as_ref())
            .await?
            .ok_or_else(|| QaError::DocumentNotIndexed(document_id.to_string()))?;

        let query = self.embedder.embed(question).await.inspect_err(|e| {
            error!(document.id = document_id, error = %e, "embedding failed for question");
        })?;

        let results = index.search(&query, self.config.top_k);
        let full_prompt = prompt::compose(history, &results, question);

        let answer = self
            .generator
            .generate(&full_prompt, self.config.temperature)
            .await
            .inspect_err(|e| {
                error!(document.id = document_id, error = %e, "generation failed");
            })?;

        if answer.trim().is_empty() {
            error!(document.id = document_id, "generator returned a blank answer");
            return Err(QaError::Generation {
                provider: self.generator.name().to_string(),
                message: "blank response".to_string(),
            });
        }

        info!(
            document.id = document_id,
            retrieved = results.len(),
            answer_len = answer.len(),
            "question answered"
        );
        Ok(answer)
    }
}

/// Builder for constructing a [`QaEngine`].
///
/// All collaborators except `cache` are required; the cache defaults to a
/// fresh [`IndexCache`]. Pass a shared cache to serve multiple engines from
/// one process-wide mapping.
#[derive(Default)]
pub struct QaEngineBuilder {
    config: Option<QaConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    storage: Option<Arc<dyn IndexStorage>>,
    cache: Option<Arc<IndexCache>>,
}

impl QaEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the text chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the answer generator.
    pub fn generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the durable index storage.
    pub fn storage(mut self, storage: Arc<dyn IndexStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set a shared index cache. Defaults to a fresh cache.
    pub fn cache(mut self, cache: Arc<IndexCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the [`QaEngine`], validating that all required collaborators
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if any required field is missing.
    pub fn build(self) -> Result<QaEngine> {
        let config = self.config.unwrap_or_default();
        let chunker =
            self.chunker.ok_or_else(|| QaError::Config("chunker is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| QaError::Config("embedder is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| QaError::Config("generator is required".to_string()))?;
        let storage =
            self.storage.ok_or_else(|| QaError::Config("storage is required".to_string()))?;

        Ok(QaEngine {
            config,
            chunker,
            embedder,
            generator,
            storage,
            cache: self.cache.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::FixedSizeChunker;
    use crate::document::Role;
    use crate::storage::FsIndexStorage;
    use async_trait::async_trait;

    /// Deterministic hash-based embeddings; direction depends on content.
    struct MockEmbedder {
        dimensions: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let hash =
                text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let mut emb = vec![0.0f32; self.dimensions];
            for (i, v) in emb.iter_mut().enumerate() {
                *v = ((hash.wrapping_add(i as u64)) as f32).sin();
            }
            let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                emb.iter_mut().for_each(|x| *x /= norm);
            }
            Ok(emb)
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    /// Answers "Paris" only if the prompt actually contains the retrieved
    /// capital sentence, proving the prompt-composition step includes it.
    struct CapitalGenerator;

    #[async_trait]
    impl AnswerGenerator for CapitalGenerator {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
            if prompt.contains("The capital is Paris.") {
                Ok("The capital is Paris.".to_string())
            } else {
                Ok("I can only assist with questions related to the document content.".to_string())
            }
        }
    }

    struct BlankGenerator;

    #[async_trait]
    impl AnswerGenerator for BlankGenerator {
        fn name(&self) -> &str {
            "blank"
        }

        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String> {
            Ok("   ".to_string())
        }
    }

    /// Echoes the temperature it was called with, proving the configured
    /// value reaches generation.
    struct TemperatureEcho;

    #[async_trait]
    impl AnswerGenerator for TemperatureEcho {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, _prompt: &str, temperature: f32) -> Result<String> {
            Ok(format!("temperature={temperature}"))
        }
    }

    /// Delegates to filesystem storage but fails every index write.
    struct IndexWriteFailure {
        inner: FsIndexStorage,
    }

    #[async_trait]
    impl IndexStorage for IndexWriteFailure {
        async fn save_index(&self, document_id: &str, _bytes: &[u8]) -> Result<()> {
            Err(QaError::Persistence {
                key: document_id.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        async fn load_index(&self, document_id: &str) -> Result<Option<Vec<u8>>> {
            self.inner.load_index(document_id).await
        }

        async fn save_text(&self, document_id: &str, text: &str) -> Result<()> {
            self.inner.save_text(document_id, text).await
        }

        async fn load_text(&self, document_id: &str) -> Result<Option<String>> {
            self.inner.load_text(document_id).await
        }

        async fn delete(&self, document_id: &str) -> Result<()> {
            self.inner.delete(document_id).await
        }
    }

    fn engine_with(
        storage: Arc<dyn IndexStorage>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> QaEngine {
        QaEngine::builder()
            .config(QaConfig::default())
            .chunker(Arc::new(FixedSizeChunker::new(1000, 100)))
            .embedder(Arc::new(MockEmbedder { dimensions: 32 }))
            .generator(generator)
            .storage(storage)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn builder_requires_collaborators() {
        let result = QaEngine::builder().config(QaConfig::default()).build();
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[tokio::test]
    async fn empty_document_fails_and_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));
        let engine = engine_with(storage.clone(), Arc::new(CapitalGenerator));

        let result = engine.build_index("doc1", "").await;
        assert!(matches!(result, Err(QaError::EmptyDocument(_))));

        assert!(engine.cache().is_empty().await);
        assert!(storage.load_index("doc1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn answering_an_unindexed_document_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));
        let engine = engine_with(storage, Arc::new(CapitalGenerator));

        let result = engine.answer("doc1", "What is the capital?", &[]).await;
        assert!(matches!(result, Err(QaError::DocumentNotIndexed(id)) if id == "doc1"));
    }

    #[tokio::test]
    async fn answer_prompt_includes_retrieved_segment() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));
        let engine = engine_with(storage, Arc::new(CapitalGenerator));

        let indexed = engine
            .build_index("doc1", "France is a country in Europe. The capital is Paris.")
            .await
            .unwrap();
        assert_eq!(indexed, 1);

        let history = vec![ConversationTurn::new(Role::User, "Tell me about France.")];
        let answer = engine.answer("doc1", "What is the capital?", &history).await.unwrap();
        assert!(answer.contains("Paris"));
    }

    #[tokio::test]
    async fn configured_temperature_reaches_the_generator() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));

        let config = QaConfig::builder().temperature(0.7).build().unwrap();
        let engine = QaEngine::builder()
            .config(config)
            .chunker(Arc::new(FixedSizeChunker::new(1000, 100)))
            .embedder(Arc::new(MockEmbedder { dimensions: 32 }))
            .generator(Arc::new(TemperatureEcho))
            .storage(storage)
            .build()
            .unwrap();

        engine.build_index("doc1", "Some indexed content.").await.unwrap();
        let answer = engine.answer("doc1", "Anything?", &[]).await.unwrap();
        assert_eq!(answer, "temperature=0.7");
    }

    #[tokio::test]
    async fn failed_index_write_leaves_no_durable_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsIndexStorage::new(dir.path());
        let storage = Arc::new(IndexWriteFailure { inner: fs.clone() });
        let engine = engine_with(storage, Arc::new(CapitalGenerator));

        let result = engine.build_index("doc1", "The capital is Paris.").await;
        assert!(matches!(result, Err(QaError::Persistence { .. })));

        assert!(engine.cache().is_empty().await);
        assert!(fs.load_index("doc1").await.unwrap().is_none());
        assert!(fs.load_text("doc1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_generation_is_reported_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));
        let engine = engine_with(storage, Arc::new(BlankGenerator));

        engine.build_index("doc1", "Some indexed content.").await.unwrap();
        let result = engine.answer("doc1", "Anything?", &[]).await;
        assert!(matches!(result, Err(QaError::Generation { .. })));
    }

    #[tokio::test]
    async fn index_survives_cache_loss_via_durable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));

        let first = engine_with(storage.clone(), Arc::new(CapitalGenerator));
        first.build_index("doc1", "The capital is Paris.").await.unwrap();

        // Fresh engine, fresh cache, same storage: the answer path must
        // reconstruct the index from the artifact.
        let second = engine_with(storage, Arc::new(CapitalGenerator));
        assert!(second.cache().is_empty().await);

        let answer = second.answer("doc1", "What is the capital?", &[]).await.unwrap();
        assert!(answer.contains("Paris"));
        assert_eq!(second.cache().len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_builds_for_one_document_leave_one_consistent_entry() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FsIndexStorage::new(dir.path()));
        let engine =
            Arc::new(engine_with(storage, Arc::new(CapitalGenerator)));

        let text = "The capital is Paris. It sits on the Seine.";
        let (a, b) = tokio::join!(
            engine.build_index("doc1", text),
            engine.build_index("doc1", text),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(engine.cache().len().await, 1);
        let answer = engine.answer("doc1", "What is the capital?", &[]).await.unwrap();
        assert!(answer.contains("Paris"));
    }
}
