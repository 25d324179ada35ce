//! Client UI and diagnostics

use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::Html,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Chat client served at `/`
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the chat client
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Echo response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoResponse {
    /// Body as received; `null` when absent or not JSON
    pub received: Value,
    /// Fixed confirmation text
    pub message: String,
    /// Always `"test"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Always `"success"`
    pub status: String,
}

/// Echo the JSON body back
pub async fn echo(body: Result<Json<Value>, JsonRejection>) -> Json<EchoResponse> {
    let received = body.map_or(Value::Null, |Json(v)| v);
    debug!(received = %received, "Test endpoint called");

    Json(EchoResponse {
        received,
        message: "Test endpoint working perfectly".to_string(),
        kind: "test".to_string(),
        status: "success".to_string(),
    })
}
