//! Conversation orchestrator - shapes user turns into a model conversation
//! and obtains one reply

use std::{fmt, sync::Arc, time::Duration};

use domain::Conversation;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::InferencePort};

/// Default instruction placed ahead of every conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are MindSpace, a warm and supportive AI \
therapist. Listen carefully, reflect the user's feelings back to them, and respond with \
empathy and without judgement. Ask gentle open questions, suggest simple coping techniques \
when they fit, and keep replies short enough to be read aloud. You are not a replacement \
for professional care: if the user mentions self-harm or being in danger, encourage them \
to contact local emergency services or a crisis line right away.";

/// Default time limit for one reply
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

const SERVICE: &str = "response generation";

/// Obtains replies from the language model
#[derive(Clone)]
pub struct ConversationOrchestrator {
    inference: Option<Arc<dyn InferencePort>>,
    system_prompt: String,
    timeout: Duration,
}

impl fmt::Debug for ConversationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationOrchestrator")
            .field("configured", &self.is_available())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConversationOrchestrator {
    /// Create an orchestrator backed by `inference`
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self {
            inference: Some(inference),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Create an orchestrator with no model; every call fails with `NotConfigured`
    pub fn unconfigured() -> Self {
        Self {
            inference: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Create from an optional backend
    pub fn from_option(inference: Option<Arc<dyn InferencePort>>) -> Self {
        inference.map_or_else(Self::unconfigured, Self::new)
    }

    /// Replace the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the time limit for one reply
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a model backend is available
    pub const fn is_available(&self) -> bool {
        self.inference.is_some()
    }

    /// Build the conversation sent to the model
    pub fn conversation_for(&self, user_turns: &[String]) -> Conversation {
        let mut conversation = Conversation::from_user_utterances(user_turns.iter().cloned());
        if !self.system_prompt.trim().is_empty() {
            conversation.system_prompt = Some(self.system_prompt.clone());
        }
        conversation
    }

    /// Produce one reply for the ordered user turns
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a backend, `Timeout` when the limit is hit,
    /// `Upstream` when the model fails or returns blank text.
    #[instrument(skip(self, user_turns), fields(turns = user_turns.len()))]
    pub async fn reply(&self, user_turns: &[String]) -> Result<String, ApplicationError> {
        let inference = self
            .inference
            .as_ref()
            .ok_or(ApplicationError::NotConfigured("orchestrator"))?;

        if user_turns.is_empty() {
            return Err(ApplicationError::Internal(
                "no user turns to reply to".to_string(),
            ));
        }

        let conversation = self.conversation_for(user_turns);
        debug!(model = %inference.current_model(), "Requesting reply");

        let result = timeout(self.timeout, inference.generate_with_context(&conversation))
            .await
            .map_err(|_| {
                warn!(after = ?self.timeout, "Reply generation timed out");
                ApplicationError::Timeout {
                    service: SERVICE,
                    after_ms: duration_ms(self.timeout),
                }
            })?
            .map_err(|e| match e {
                ApplicationError::Upstream(_) | ApplicationError::Timeout { .. } => e,
                other => ApplicationError::Upstream(other.to_string()),
            })?;

        if result.content.trim().is_empty() {
            return Err(ApplicationError::Upstream(
                "model returned no text".to_string(),
            ));
        }

        info!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            reply_len = result.content.len(),
            "Reply generated"
        );

        Ok(result.content)
    }
}

/// Milliseconds in `d`, saturating
pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
