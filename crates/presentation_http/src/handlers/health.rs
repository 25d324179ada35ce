//! Health check handler

use application::HealthReport;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Report which gateways were configured at startup
///
/// Always 200; an unavailable gateway is reported, not treated as failure.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.check())
}
