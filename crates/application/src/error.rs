//! Application-level errors

use std::fmt;

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A gateway has no client (missing credentials or failed init)
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A referenced audio file does not exist
    #[error("Audio file not found: {0}")]
    NotFound(String),

    /// A remote provider failed or returned unusable data
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The speech provider reported failure or returned no audio
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// A gateway call exceeded its time limit
    #[error("{service} timed out after {after_ms}ms")]
    Timeout {
        /// Gateway that timed out
        service: &'static str,
        /// Limit that was exceeded
        after_ms: u64,
    },

    /// Reading or writing stored audio failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the caller supplied something unusable
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(_) | Self::NotFound(_))
    }
}

/// Pipeline stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Speech-to-text of the user's audio
    Transcription,
    /// Language-model reply
    Generation,
    /// Text-to-speech of the reply
    Synthesis,
}

impl PipelineStage {
    /// Stable identifier used in logs and error codes
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::Generation => "generation",
            Self::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Transcription => "transcription failed",
            Self::Generation => "response generation failed",
            Self::Synthesis => "synthesis failed",
        };
        f.write_str(message)
    }
}

/// Errors reported by the request pipeline
///
/// Stage errors display only the stage name; the provider error is kept as
/// the source for logging.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was rejected before any gateway call
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The referenced audio file does not exist
    #[error("Audio file not found")]
    AudioNotFound(String),

    /// A gateway failed
    #[error("{stage}")]
    Stage {
        /// Failing stage
        stage: PipelineStage,
        /// Underlying error
        #[source]
        source: ApplicationError,
    },
}

impl PipelineError {
    /// Wrap a gateway error for the given stage
    pub const fn stage(stage: PipelineStage, source: ApplicationError) -> Self {
        Self::Stage { stage, source }
    }

    /// Failing stage, if any
    pub const fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether the error is the caller's fault
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AudioNotFound(_))
    }
}
