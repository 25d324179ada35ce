//! API error handling
//!
//! Error bodies are `{error, code, details?}`. Provider messages only reach
//! clients through `details`, and only while detail exposure is enabled
//! (development).

use application::{ApplicationError, PipelineError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::error;

/// Global flag to control error detail exposure
/// Off until development mode turns it on
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Configure whether internal error details should be exposed in responses.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

/// Check if internal error details should be exposed
fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Route or resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Upload exceeded the configured size
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A pipeline stage failed; `message` names the stage
    #[error("{message}")]
    StageFailed {
        /// Stable stage identifier
        stage: &'static str,
        /// Client-facing message
        message: String,
        /// Underlying error, exposed only in development
        details: String,
    },

    /// Anything else
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::StageFailed { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> String {
        match self {
            Self::BadRequest(_) => "bad_request".to_string(),
            Self::NotFound(_) => "not_found".to_string(),
            Self::MethodNotAllowed => "method_not_allowed".to_string(),
            Self::PayloadTooLarge(_) => "payload_too_large".to_string(),
            Self::StageFailed { stage, .. } => format!("{stage}_failed"),
            Self::Internal(_) => "internal_error".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        if !should_expose_details() {
            return None;
        }
        match self {
            Self::StageFailed { details, .. } | Self::Internal(details) => Some(details.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = %self.code(), error = ?self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => Self::BadRequest(e.to_string()),
            PipelineError::AudioNotFound(_) => Self::BadRequest(err.to_string()),
            PipelineError::Stage { stage, source } => Self::StageFailed {
                stage: stage.as_str(),
                message: stage.to_string(),
                details: source.to_string(),
            },
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(name) => {
                Self::NotFound(format!("Audio file not found: {name}"))
            },
            other => Self::Internal(other.to_string()),
        }
    }
}
