//! Shared response envelope for API handlers.
//!
//! Successful API responses use a `{ "data": ... }` envelope; errors use the
//! `{ "error", "code" }` shape produced by [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: report }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
