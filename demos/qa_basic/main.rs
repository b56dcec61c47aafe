//! # QA Basic Demo
//!
//! Demonstrates the full document QA flow: build an index from extracted
//! text, then answer questions against it with conversation history.
//!
//! Uses a deterministic `MockEmbedder` and a canned `MockGenerator` so it
//! runs with **zero API keys**. Swap in `GeminiEmbedder`/`GeminiGenerator`
//! (feature `gemini`) for real answers.
//!
//! Run: `cargo run --bin qa_basic`

use std::sync::Arc;

use docmind_qa::{
    AnswerGenerator, ConversationTurn, EmbeddingProvider, FixedSizeChunker, FsIndexStorage,
    QaConfig, QaEngine, Role,
};

// ---------------------------------------------------------------------------
// MockEmbedder — deterministic hash-based embeddings for demos/tests
// ---------------------------------------------------------------------------

struct MockEmbedder {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> docmind_qa::Result<Vec<f32>> {
        // Deterministic embedding: hash the text bytes, then generate a
        // normalised vector whose direction depends on the content.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
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

// ---------------------------------------------------------------------------
// MockGenerator — answers by quoting the first context line of the prompt
// ---------------------------------------------------------------------------

struct MockGenerator;

#[async_trait::async_trait]
impl AnswerGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, _temperature: f32) -> docmind_qa::Result<String> {
        let context_line = prompt
            .split("Document context:\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .unwrap_or("(no context retrieved)");
        Ok(format!("According to the document: {context_line}"))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let index_dir = tempfile::tempdir()?;

    // Small segments keep the demo output readable; top_k=2 retrieves the two
    // most relevant segments per question.
    let config = QaConfig::builder().chunk_size(120).chunk_overlap(20).top_k(2).build()?;
    let chunk_size = config.chunk_size;
    let chunk_overlap = config.chunk_overlap;

    let engine = QaEngine::builder()
        .config(config)
        .chunker(Arc::new(FixedSizeChunker::new(chunk_size, chunk_overlap)))
        .embedder(Arc::new(MockEmbedder { dimensions: 64 }))
        .generator(Arc::new(MockGenerator))
        .storage(Arc::new(FsIndexStorage::new(index_dir.path())))
        .build()?;

    let text = "France is a country in Western Europe. The capital is Paris, \
                which sits on the Seine. The country is known for its cuisine, \
                its wine regions, and a dense high-speed rail network connecting \
                its major cities.";

    let segments = engine.build_index("doc-france", text).await?;
    println!("Indexed doc-france into {segments} segment(s)\n");

    let mut history: Vec<ConversationTurn> = Vec::new();
    let questions = ["What is the capital?", "What is the country known for?"];

    for question in questions {
        println!("Q: {question}");
        let answer = engine.answer("doc-france", question, &history).await?;
        println!("A: {answer}\n");

        history.push(ConversationTurn::new(Role::User, question));
        history.push(ConversationTurn::new(Role::Assistant, answer));
    }

    Ok(())
}
