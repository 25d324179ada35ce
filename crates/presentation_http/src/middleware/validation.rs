//! Request body extraction
//!
//! Provides a `ChatJson` extractor that rejects absent or empty JSON bodies
//! with the client-facing `Missing JSON body` error before deserializing.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use domain::DomainError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// A JSON extractor for request bodies that must be a non-empty object
///
/// A missing body, a body that is not JSON, `null`, `{}` or any non-object
/// value is reported as [`DomainError::MissingBody`]. Fields of the wrong
/// type are reported as a bad request naming the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatJson<T>(pub T);

impl<T, S> FromRequest<S> for ChatJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let missing = || ApiError::BadRequest(DomainError::MissingBody.to_string());

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|_| missing())?;

        match &value {
            Value::Object(map) if !map.is_empty() => {},
            _ => return Err(missing()),
        }

        serde_json::from_value(value)
            .map(ChatJson)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
    }
}
