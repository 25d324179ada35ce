//! Conversation entity - the turn sequence handed to the language model

use serde::{Deserialize, Serialize};

use super::ConversationTurn;

/// Ordered user utterances to forward to the language model.
///
/// Keeps the content of every prior `user` turn in conversation order and
/// appends `current` unless it is already the last utterance. Assistant
/// turns are dropped.
pub fn user_utterances(history: &[ConversationTurn], current: &str) -> Vec<String> {
    let mut utterances: Vec<String> = history
        .iter()
        .filter(|turn| turn.is_user())
        .map(|turn| turn.content.clone())
        .collect();

    if utterances.last().map(String::as_str) != Some(current) {
        utterances.push(current.to_string());
    }

    utterances
}

/// A conversation as sent to an inference backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Turns in the conversation (oldest first)
    pub turns: Vec<ConversationTurn>,
    /// Fixed instruction injected ahead of the turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Conversation {
    /// Create a new empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new conversation with a system prompt
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: Vec::new(),
            system_prompt: Some(system_prompt.into()),
        }
    }

    /// Build a conversation from plain user utterances
    pub fn from_user_utterances<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            turns: utterances
                .into_iter()
                .map(ConversationTurn::user)
                .collect(),
            system_prompt: None,
        }
    }

    /// Add a turn to the conversation
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Get the last turn in the conversation
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Get the number of turns
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Check if the conversation has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
