//! Gemini inference adapter - Implements InferencePort using ai_core

use std::sync::Arc;
use std::time::Instant;

use ai_core::{
    GeminiInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest,
};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use domain::Conversation;
use tracing::{debug, instrument};

/// Gateway name reported when unconfigured
const GATEWAY: &str = "orchestrator";

/// Stage name reported in timeouts
const SERVICE: &str = "response generation";

/// Adapter for the Gemini `generateContent` API
pub struct GeminiInferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
}

impl std::fmt::Debug for GeminiInferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiInferenceAdapter")
            .field("model", &self.engine.default_model())
            .finish()
    }
}

impl GeminiInferenceAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = GeminiInferenceEngine::new(config).map_err(Self::map_error)?;
        Ok(Self::with_engine(Arc::new(engine)))
    }

    /// Wrap an existing engine
    pub fn with_engine(engine: Arc<dyn InferenceEngine>) -> Self {
        Self { engine }
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::MissingApiKey => ApplicationError::NotConfigured(GATEWAY),
            InferenceError::Timeout(ms) => ApplicationError::Timeout {
                service: SERVICE,
                after_ms: ms,
            },
            InferenceError::RateLimited => {
                ApplicationError::Upstream("Gemini rate limit exceeded".to_string())
            },
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::Upstream(format!("Gemini connection failed: {msg}"))
            },
            other => ApplicationError::Upstream(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for GeminiInferenceAdapter {
    #[instrument(skip(self, conversation), fields(turns = conversation.turn_count()))]
    async fn generate_with_context(
        &self,
        conversation: &Conversation,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();

        let request = InferenceRequest::from_conversation(conversation);
        let response = self
            .engine
            .generate(request)
            .await
            .map_err(Self::map_error)?;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            latency_ms = latency_ms,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}

#[cfg(test)]
mod tests {
    use ai_core::{InferenceResponse, InferenceRole, TokenUsage};
    use domain::ConversationTurn;
    use tokio::sync::Mutex;

    use super::*;

    /// Engine that records the last request and replays a canned result
    struct StubEngine {
        last: Mutex<Option<InferenceRequest>>,
        reply: fn() -> Result<InferenceResponse, InferenceError>,
    }

    impl StubEngine {
        fn new(reply: fn() -> Result<InferenceResponse, InferenceError>) -> Arc<Self> {
            Arc::new(Self {
                last: Mutex::new(None),
                reply,
            })
        }
    }

    #[async_trait]
    impl InferenceEngine for StubEngine {
        async fn generate(
            &self,
            request: InferenceRequest,
        ) -> Result<InferenceResponse, InferenceError> {
            *self.last.lock().await = Some(request);
            (self.reply)()
        }

        fn default_model(&self) -> &str {
            "gemini-test"
        }
    }

    fn ok_reply() -> Result<InferenceResponse, InferenceError> {
        Ok(InferenceResponse {
            content: "That sounds hard.".to_string(),
            model: "gemini-test".to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            finish_reason: Some("STOP".to_string()),
        })
    }

    #[test]
    fn unkeyed_config_is_not_configured() {
        let result = GeminiInferenceAdapter::new(InferenceConfig::default());
        assert!(matches!(
            result,
            Err(ApplicationError::NotConfigured("orchestrator"))
        ));
    }

    #[tokio::test]
    async fn forwards_turns_and_system_prompt() {
        let engine = StubEngine::new(ok_reply);
        let adapter = GeminiInferenceAdapter::with_engine(engine.clone());

        let mut conversation = Conversation::with_system_prompt("Be kind");
        conversation.push(ConversationTurn::user("I can't sleep"));
        conversation.push(ConversationTurn::user("Every night"));

        let result = adapter.generate_with_context(&conversation).await.unwrap();
        assert_eq!(result.content, "That sounds hard.");
        assert_eq!(result.tokens_used, Some(15));

        let request = engine.last.lock().await.clone().unwrap();
        assert_eq!(request.system.as_deref(), Some("Be kind"));
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages.iter().all(|m| m.role == InferenceRole::User));
    }

    /// Engine that takes a fixed time to answer
    struct SlowEngine;

    #[async_trait]
    impl InferenceEngine for SlowEngine {
        async fn generate(
            &self,
            _request: InferenceRequest,
        ) -> Result<InferenceResponse, InferenceError> {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            ok_reply()
        }

        fn default_model(&self) -> &str {
            "gemini-test"
        }
    }

    #[tokio::test]
    async fn latency_is_measured_in_millis() {
        let adapter = GeminiInferenceAdapter::with_engine(Arc::new(SlowEngine));
        let result = adapter
            .generate_with_context(&Conversation::from_user_utterances(["hi"]))
            .await
            .unwrap();

        assert!(result.latency_ms >= 20);
        assert!(result.latency_ms < 10_000);
    }

    #[tokio::test]
    async fn current_model_comes_from_engine() {
        let adapter = GeminiInferenceAdapter::with_engine(StubEngine::new(ok_reply));
        assert_eq!(adapter.current_model(), "gemini-test");
    }

    #[tokio::test]
    async fn engine_failure_is_upstream() {
        let adapter = GeminiInferenceAdapter::with_engine(StubEngine::new(|| {
            Err(InferenceError::InvalidResponse("no text".to_string()))
        }));
        let err = adapter
            .generate_with_context(&Conversation::from_user_utterances(["hi"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Upstream(ref m) if m.contains("no text")));
    }

    #[test]
    fn map_error_timeout() {
        let mapped = GeminiInferenceAdapter::map_error(InferenceError::Timeout(5000));
        assert!(matches!(
            mapped,
            ApplicationError::Timeout {
                service: "response generation",
                after_ms: 5000
            }
        ));
    }

    #[test]
    fn map_error_rate_limited() {
        let mapped = GeminiInferenceAdapter::map_error(InferenceError::RateLimited);
        let ApplicationError::Upstream(msg) = mapped else {
            unreachable!("Expected Upstream error");
        };
        assert!(msg.contains("rate limit"));
    }

    #[test]
    fn map_error_connection_failed() {
        let mapped =
            GeminiInferenceAdapter::map_error(InferenceError::ConnectionFailed("refused".into()));
        let ApplicationError::Upstream(msg) = mapped else {
            unreachable!("Expected Upstream error");
        };
        assert!(msg.contains("connection failed"));
    }
}
