//! # docmind-qa
//!
//! Per-document retrieval index lifecycle and question answering for the
//! DocMind backend.
//!
//! Uploaded documents are chunked into overlapping segments, embedded, and
//! indexed per document. The index is persisted as a durable artifact and
//! cached in memory across requests; questions retrieve the most similar
//! segments, compose a grounded prompt with the conversation history, and
//! generate an answer.
//!
//! ## Components
//!
//! - [`FixedSizeChunker`] — splits extracted text into overlapping segments
//! - [`EmbeddingProvider`] — converts text into semantic vectors
//! - [`VectorIndex`] — per-document nearest-neighbor index with a
//!   serializable artifact
//! - [`IndexCache`] — process-wide map from document ID to a ready index,
//!   reconstructing from storage on a miss
//! - [`AnswerGenerator`] — external model call producing the answer text
//! - [`QaEngine`] — the public entry points: [`QaEngine::build_index`] and
//!   [`QaEngine::answer`]
//!
//! ## Features
//!
//! - `gemini` — [`GeminiEmbedder`](gemini::GeminiEmbedder) and
//!   [`GeminiGenerator`](gemini::GeminiGenerator) over the Generative
//!   Language REST API
//! - `pdf` — [`extract::extract_text`] for PDF uploads

pub mod cache;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod export;
pub mod generation;
pub mod index;
pub mod prompt;
pub mod storage;

#[cfg(feature = "pdf")]
pub mod extract;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use cache::IndexCache;
pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{QaConfig, QaConfigBuilder};
pub use document::{ConversationTurn, Role, SearchResult, Segment};
pub use embedding::EmbeddingProvider;
pub use engine::{QaEngine, QaEngineBuilder};
pub use error::{QaError, Result};
pub use export::ConversationReport;
pub use generation::AnswerGenerator;
pub use index::VectorIndex;
pub use storage::{FsIndexStorage, IndexStorage};
