//! Chat handler

use axum::{Extension, Json, extract::State};
use domain::{ChatResponse, ChatSubmission, ConversationTurn, RequestId};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{error::ApiError, middleware::ChatJson, state::AppState};

/// One prior turn as sent by the client
///
/// Roles other than `user` are kept as assistant turns; they never reach the
/// language model.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Sender role
    #[serde(default)]
    pub role: String,
    /// Message content
    #[serde(default)]
    pub content: String,
}

impl From<HistoryEntry> for ConversationTurn {
    fn from(entry: HistoryEntry) -> Self {
        if entry.role == "user" {
            Self::user(entry.content)
        } else {
            Self::assistant(entry.content)
        }
    }
}

/// Chat request body
///
/// `dtype` and `user_message` are taken as raw JSON so that values of the
/// wrong type fail domain validation in order instead of deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Text message, or a reference to uploaded audio
    #[serde(default)]
    pub user_message: Option<Value>,
    /// `"audio"` or `"message"`
    #[serde(default)]
    pub dtype: Option<Value>,
    /// Prior turns, oldest first
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

impl From<ChatRequestBody> for ChatSubmission {
    fn from(body: ChatRequestBody) -> Self {
        // A non-string dtype keeps its JSON text and is rejected as invalid;
        // a non-string message counts as missing.
        let dtype = body.dtype.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        });
        let user_message = body.user_message.and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        });

        Self {
            dtype,
            user_message,
            history: body.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Handle a chat request
#[instrument(skip(state, body), fields(dtype = ?body.dtype, history = body.messages.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ChatJson(body): ChatJson<ChatRequestBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.pipeline.handle(body.into(), request_id).await?;
    Ok(Json(response))
}
