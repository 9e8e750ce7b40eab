//! Route definitions for the `/users` and `/validation` resources.

use axum::routing::post;
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /validate          -> validate_user_update  (dry-run)
/// ```
pub fn users_router() -> Router<AppState> {
    Router::new().route("/validate", post(validation::validate_user_update))
}

/// Routes mounted at `/validation`.
///
/// ```text
/// POST   /derived-fields    -> validate_derived_fields  (dry-run)
/// ```
pub fn validation_router() -> Router<AppState> {
    Router::new().route("/derived-fields", post(validation::validate_derived_fields))
}
