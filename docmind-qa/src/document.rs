//! Data types for text segments, search results, and conversation turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contiguous slice of a document's extracted text, used as a retrieval unit.
///
/// Segments are produced once at index-build time and never mutated. The
/// segment list for a document is owned by its [`VectorIndex`](crate::VectorIndex).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// Unique identifier for the segment, `{document_id}_{index}`.
    pub id: String,
    /// The text content of the segment.
    pub text: String,
    /// The identifier of the document this segment was cut from.
    pub document_id: String,
}

/// A retrieved [`Segment`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved segment.
    pub segment: Segment,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// The author of a [`ConversationTurn`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The answering assistant.
    Assistant,
}

impl Role {
    /// The wire label for this role, as it appears in prompts and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation about a document.
///
/// Turns are owned by the persistence layer; the core consumes them read-only
/// as ordered prompt context and never mutates or persists them itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a turn timestamped now.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), timestamp: Utc::now() }
    }
}
