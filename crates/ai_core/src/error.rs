//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// No API key was configured
    #[error("Missing API key")]
    MissingApiKey,

    /// Failed to connect to the inference API
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the inference API failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not found
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response parsing failed or contained no usable text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),
}

impl InferenceError {
    /// Classify a transport error, reporting `timeout_ms` for timeouts
    pub fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }

    /// Whether the failure is on the caller's side (bad key, unknown model)
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::Unauthorized(_) | Self::ModelNotAvailable(_)
        )
    }
}
