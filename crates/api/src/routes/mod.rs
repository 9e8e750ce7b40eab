pub mod health;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/validate                                  dry-run user update (POST)
/// /validation/derived-fields                       dry-run with supplied rules (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", validation::users_router())
        .nest("/validation", validation::validation_router())
}
