//! Prompt composition for grounded question answering.
//!
//! Pure functions: the orchestrator passes retrieved context and history in,
//! and gets the full prompt string back.

use crate::document::{ConversationTurn, SearchResult};

/// The fixed system instruction prepended to every prompt. Keeps answers
/// grounded in the document and gives the model a fixed refusal sentence for
/// out-of-scope questions.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful document assistant. \
    Answer questions based strictly on the document content. \
    If a question is outside the document scope, politely respond: \
    'I can only assist with questions related to the document content.'";

/// Serialize prior turns as chronological `role: content` lines.
pub fn format_history(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenate retrieved segment texts into the context block, in retrieval
/// order (most similar first).
pub fn format_context(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.segment.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Compose the full generation prompt: system instruction, conversation
/// history, retrieved document context, and the question.
pub fn compose(history: &[ConversationTurn], results: &[SearchResult], question: &str) -> String {
    format!(
        "{SYSTEM_INSTRUCTION}\n\n\
         Conversation history:\n{}\n\n\
         Document context:\n{}\n\n\
         User: {question}\nAssistant:",
        format_history(history),
        format_context(results),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Role, Segment};

    fn result(text: &str) -> SearchResult {
        SearchResult {
            segment: Segment {
                id: "doc1_0".to_string(),
                text: text.to_string(),
                document_id: "doc1".to_string(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn history_lines_are_chronological_role_prefixed() {
        let history = vec![
            ConversationTurn::new(Role::User, "What is this about?"),
            ConversationTurn::new(Role::Assistant, "A study of rivers."),
        ];
        assert_eq!(
            format_history(&history),
            "user: What is this about?\nassistant: A study of rivers."
        );
    }

    #[test]
    fn prompt_contains_retrieved_segment_and_question() {
        let prompt = compose(&[], &[result("The capital is Paris.")], "What is the capital?");
        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
        assert!(prompt.contains("The capital is Paris."));
        assert!(prompt.contains("User: What is the capital?"));
        assert!(prompt.ends_with("Assistant:"));
    }

    #[test]
    fn context_joins_segments_in_retrieval_order() {
        let context = format_context(&[result("first"), result("second")]);
        assert_eq!(context, "first\n\nsecond");
    }
}
