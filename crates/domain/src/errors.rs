//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The chat request had no parseable body
    #[error("Missing JSON body")]
    MissingBody,

    /// `dtype` was absent or not one of the recognised kinds
    #[error("Invalid dtype, must be 'audio' or 'message'")]
    InvalidChatKind(Option<String>),

    /// `user_message` was absent, empty or whitespace only
    #[error("Missing or empty user_message")]
    MissingMessage,

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_body_message() {
        assert_eq!(DomainError::MissingBody.to_string(), "Missing JSON body");
    }

    #[test]
    fn invalid_chat_kind_message_ignores_value() {
        let err = DomainError::InvalidChatKind(Some("video".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid dtype, must be 'audio' or 'message'"
        );
    }

    #[test]
    fn missing_message_message() {
        assert_eq!(
            DomainError::MissingMessage.to_string(),
            "Missing or empty user_message"
        );
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("field is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: field is required");
    }
}
