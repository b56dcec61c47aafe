//! Conversation export rendering.
//!
//! Renders a conversation about a document as a plain-text report: a header
//! with document and session details, the turns in chronological order, and
//! a generated-on footer. Pure formatting: the caller supplies the turns
//! and owns delivery (download, mail, archive).

use chrono::{DateTime, Utc};

use crate::document::{ConversationTurn, Role};

/// The inputs for one conversation export.
#[derive(Debug, Clone)]
pub struct ConversationReport<'a> {
    /// Display name of the document the conversation is about.
    pub document_name: &'a str,
    /// Identifier of the conversation session.
    pub session_id: &'a str,
    /// When the conversation started.
    pub started_at: DateTime<Utc>,
    /// The conversation, in chronological order.
    pub turns: &'a [ConversationTurn],
}

impl ConversationReport<'_> {
    /// Render the report.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("DocMind AI — Conversation Export\n");
        out.push_str("================================\n\n");
        out.push_str(&format!("Document:             {}\n", self.document_name));
        out.push_str(&format!("Session ID:           {}\n", self.session_id));
        out.push_str(&format!(
            "Conversation started: {}\n",
            self.started_at.format("%B %d, %Y at %H:%M")
        ));
        out.push_str(&format!("Total messages:       {}\n\n", self.turns.len()));

        out.push_str("Conversation history\n");
        out.push_str("--------------------\n");
        if self.turns.is_empty() {
            out.push_str("No messages in this conversation.\n");
        } else {
            for turn in self.turns {
                let sender = match turn.role {
                    Role::User => "You",
                    Role::Assistant => "DocMind AI",
                };
                out.push_str(&format!(
                    "\n[{}] {}:\n{}\n",
                    turn.timestamp.format("%H:%M"),
                    sender,
                    turn.content
                ));
            }
        }

        out.push_str(&format!(
            "\nGenerated on {} by DocMind AI\n",
            Utc::now().format("%B %d, %Y at %H:%M")
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_turns_in_order_with_senders() {
        let turns = vec![
            ConversationTurn::new(Role::User, "What is the capital?"),
            ConversationTurn::new(Role::Assistant, "The capital is Paris."),
        ];
        let report = ConversationReport {
            document_name: "france.pdf",
            session_id: "42",
            started_at: Utc::now(),
            turns: &turns,
        };

        let rendered = report.render();
        assert!(rendered.contains("Document:             france.pdf"));
        assert!(rendered.contains("Total messages:       2"));
        let user_pos = rendered.find("You:").unwrap();
        let assistant_pos = rendered.find("DocMind AI:").unwrap();
        assert!(user_pos < assistant_pos);
        assert!(rendered.contains("The capital is Paris."));
    }

    #[test]
    fn empty_conversation_is_stated_explicitly() {
        let report = ConversationReport {
            document_name: "empty.pdf",
            session_id: "7",
            started_at: Utc::now(),
            turns: &[],
        };
        assert!(report.render().contains("No messages in this conversation."));
    }
}
