//! Error types for the `docmind-qa` crate.

use thiserror::Error;

/// Errors that can occur in the document question-answering pipeline.
///
/// The core never recovers from these locally: every failure is surfaced
/// unchanged to the calling layer, which decides how to present it. A failed
/// index build leaves no cache entry and no durable artifact; a failed answer
/// leaves conversation history untouched.
#[derive(Debug, Error)]
pub enum QaError {
    /// Chunking the document text produced no segments.
    #[error("document '{0}' produced no text segments")]
    EmptyDocument(String),

    /// The vector index could not be constructed.
    #[error("index build failed: {0}")]
    IndexBuild(String),

    /// A question was asked against a document that has no index, either in
    /// memory or in durable storage.
    #[error("document '{0}' is not indexed")]
    DocumentNotIndexed(String),

    /// The embedding provider failed to produce vectors.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The answer generator failed or returned a blank response.
    #[error("generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Reading or writing a durable index artifact failed.
    #[error("persistence error for '{key}': {source}")]
    Persistence {
        /// The document identifier or path involved.
        key: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A persisted index artifact could not be decoded.
    #[error("corrupt index artifact for '{key}': {source}")]
    CorruptArtifact {
        /// The document identifier the artifact belongs to.
        key: String,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Text extraction from an uploaded file failed.
    #[cfg(feature = "pdf")]
    #[error("extraction error: {0}")]
    Extraction(String),

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A convenience result type for QA operations.
pub type Result<T> = std::result::Result<T, QaError>;
