//! Conversation transcript.
//!
//! The transcript is append-only: turns are recorded in the order they happen
//! and there is no API to edit, reorder or drop them.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ── Speaker ──────────────────────────────────────────────────────────────

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The human user.
    User,
    /// Gideon.
    Assistant,
}

impl Speaker {
    /// Label shown in front of the turn text.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Gideon",
        }
    }
}

// ── ConversationTurn ─────────────────────────────────────────────────────

/// A single turn in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke.
    pub speaker: Speaker,
    /// The text of this turn.
    pub text: String,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
}

// ── Transcript ───────────────────────────────────────────────────────────

/// Chronological, append-only record of a session's turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn at the end of the transcript.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) -> &ConversationTurn {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.turns.push(ConversationTurn {
            speaker,
            text: text.into(),
            timestamp,
        });
        &self.turns[self.turns.len() - 1]
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Number of turns spoken by `speaker`.
    pub fn count(&self, speaker: Speaker) -> usize {
        self.turns.iter().filter(|t| t.speaker == speaker).count()
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut t = Transcript::new();
        t.append(Speaker::User, "one");
        t.append(Speaker::Assistant, "two");
        t.append(Speaker::User, "three");

        let texts: Vec<&str> = t.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(t.count(Speaker::User), 2);
        assert_eq!(t.count(Speaker::Assistant), 1);
        assert_eq!(t.last().unwrap().text, "three");
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut t = Transcript::new();
        for i in 0..5 {
            t.append(Speaker::User, i.to_string());
        }
        assert!(t.turns().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn labels() {
        assert_eq!(Speaker::User.label(), "You");
        assert_eq!(Speaker::Assistant.label(), "Gideon");
    }
}
