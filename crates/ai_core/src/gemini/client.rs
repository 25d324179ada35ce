//! Gemini inference engine

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::wire::{
    ErrorEnvelope, GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, to_contents,
};
use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};

/// Inference engine backed by the Gemini `generateContent` API
#[derive(Debug)]
pub struct GeminiInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl GeminiInferenceEngine {
    /// Create a new Gemini inference engine
    ///
    /// Fails with [`InferenceError::MissingApiKey`] when no key is configured.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        if config.api_key.trim().is_empty() {
            return Err(InferenceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized Gemini inference engine"
        );

        Ok(Self { client, config })
    }

    /// Build the `generateContent` URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Get the model to use for a request
    fn resolve_model<'a>(&'a self, request: &'a InferenceRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }

    fn build_body(&self, request: &InferenceRequest) -> GenerateContentRequest {
        let system = request
            .system
            .as_deref()
            .or(self.config.system_prompt.as_deref())
            .filter(|s| !s.trim().is_empty());

        GenerateContentRequest {
            system_instruction: system.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }),
            contents: to_contents(&request.messages),
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(self.config.temperature),
                max_output_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        }
    }
}

fn error_for_status(status: StatusCode, body: &str) -> InferenceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InferenceError::Unauthorized(message),
        StatusCode::NOT_FOUND => InferenceError::ModelNotAvailable(message),
        StatusCode::BAD_REQUEST => InferenceError::RequestFailed(message),
        _ => InferenceError::ServerError(format!("Status {status}: {message}")),
    }
}

#[async_trait]
impl InferenceEngine for GeminiInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request), turns = request.messages.len()))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let model = self.resolve_model(&request).to_string();
        let body = self.build_body(&request);

        if body.contents.is_empty() {
            return Err(InferenceError::RequestFailed(
                "conversation has no content".to_string(),
            ));
        }

        debug!(contents = body.contents.len(), "Sending request to Gemini");

        let response = self
            .client
            .post(self.generate_url(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini request failed");
            return Err(error_for_status(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let Some(content) = parsed.text() else {
            let reason = parsed
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| parsed.candidates.first().and_then(|c| c.finish_reason.clone()))
                .unwrap_or_else(|| "no candidates".to_string());
            warn!(reason = %reason, "Gemini returned no text");
            return Err(InferenceError::InvalidResponse(format!(
                "empty reply ({reason})"
            )));
        };

        let usage = parsed.usage_metadata.as_ref().map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        debug!(tokens = ?usage, chars = content.len(), "Inference completed");

        Ok(InferenceResponse {
            content,
            model: parsed.model_version.unwrap_or(model),
            usage,
            finish_reason: parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.finish_reason),
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
