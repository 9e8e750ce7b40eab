use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Discriminator field the user document rules are keyed on.
    pub source_field: &'static str,
    /// Number of document types with a rule set.
    pub rule_sets: usize,
}

/// GET /health -- returns service health and the loaded rule table size.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let rules = state.user_rules;
    let rule_sets = rules.table().len();

    let status = if rule_sets > 0 { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        source_field: rules.source_field(),
        rule_sets,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
