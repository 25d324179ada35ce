//! Chat request and response shapes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::ConversationTurn;
use crate::errors::DomainError;

/// Kind of chat exchange (`dtype` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// `user_message` references an uploaded audio file; reply is spoken
    Audio,
    /// `user_message` is plain text; reply is text
    Message,
}

impl ChatKind {
    /// Wire name of this kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Self::Audio),
            "message" => Ok(Self::Message),
            other => Err(DomainError::InvalidChatKind(Some(other.to_string()))),
        }
    }
}

/// An inbound chat request before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSubmission {
    /// Raw `dtype` value
    pub dtype: Option<String>,
    /// Raw `user_message` value
    pub user_message: Option<String>,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
}

/// A validated chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    kind: ChatKind,
    user_message: String,
    history: Vec<ConversationTurn>,
}

impl ChatRequest {
    /// Validate a submission.
    ///
    /// `dtype` is checked before `user_message`.
    pub fn validate(submission: ChatSubmission) -> Result<Self, DomainError> {
        let kind = submission
            .dtype
            .as_deref()
            .ok_or(DomainError::InvalidChatKind(None))?
            .parse::<ChatKind>()?;

        let user_message = submission
            .user_message
            .filter(|m| !m.trim().is_empty())
            .ok_or(DomainError::MissingMessage)?;

        Ok(Self {
            kind,
            user_message,
            history: submission.history,
        })
    }

    /// Kind of exchange
    pub const fn kind(&self) -> ChatKind {
        self.kind
    }

    /// Text message, or audio reference for [`ChatKind::Audio`]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Prior turns, oldest first
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

impl TryFrom<ChatSubmission> for ChatRequest {
    type Error = DomainError;

    fn try_from(submission: ChatSubmission) -> Result<Self, Self::Error> {
        Self::validate(submission)
    }
}

/// The reply returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text
    pub content: String,
    /// Kind of exchange
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Public path of the synthesized reply audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_filepath: Option<String>,
    /// Transcription of the user's audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
}

impl ChatResponse {
    /// Text reply
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: ChatKind::Message,
            audio_filepath: None,
            transcribed_text: None,
        }
    }

    /// Spoken reply with the transcription it answered
    pub fn audio(
        content: impl Into<String>,
        audio_filepath: impl Into<String>,
        transcribed_text: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            kind: ChatKind::Audio,
            audio_filepath: Some(audio_filepath.into()),
            transcribed_text: Some(transcribed_text.into()),
        }
    }
}
