//! Handlers for the `/users` and `/validation` resources.
//!
//! Both endpoints are dry runs: they validate the payload and report the
//! result without storing anything.

use axum::Json;
use fieldguard_core::user::{DocType, UpdateUserDto};
use fieldguard_core::validation::derived::DerivedFieldValidator;
use fieldguard_core::validation::evaluator::{text_of, Outcome};
use fieldguard_core::validation::rules::FieldViolation;
use fieldguard_core::validation::table::{RuleTable, RuleTableConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

// ── User update ──────────────────────────────────────────────────────

/// Result of an accepted user update.
#[derive(Debug, Serialize)]
pub struct UserUpdateReport {
    pub valid: bool,
    pub user_id: String,
    pub doc_type: DocType,
}

/// POST /api/v1/users/validate
///
/// Validate a user update payload. Rejected payloads return 400 with the
/// per-field messages under `details`.
pub async fn validate_user_update(
    Json(body): Json<UpdateUserDto>,
) -> AppResult<Json<DataResponse<UserUpdateReport>>> {
    body.validate()?;

    tracing::debug!(user_id = %body.user_id, doc_type = %body.doc_type, "User update accepted");

    Ok(Json(DataResponse {
        data: UserUpdateReport {
            valid: true,
            user_id: body.user_id,
            doc_type: body.doc_type,
        },
    }))
}

// ── Ad-hoc derived fields ────────────────────────────────────────────

/// Request body for the derived-fields dry run.
#[derive(Debug, Deserialize)]
pub struct DerivedFieldsRequest {
    /// Name of the record field holding the discriminator.
    pub source_field: String,
    /// Name of the record field holding the object to check.
    pub derived_field: String,
    /// Rule table in its configuration form.
    pub rules: RuleTableConfig,
    pub record: serde_json::Value,
}

/// Result of a derived-fields dry run.
#[derive(Debug, Serialize)]
pub struct DerivedFieldsReport {
    pub valid: bool,
    /// Whether the record's discriminator selected a rule set.
    pub constrained: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<FieldViolation>,
}

/// POST /api/v1/validation/derived-fields
///
/// Build a rule table from the request and check the supplied record
/// against it. A malformed rule table returns 400; an invalid record returns
/// 200 with `valid: false` and the first violation.
pub async fn validate_derived_fields(
    Json(body): Json<DerivedFieldsRequest>,
) -> AppResult<Json<DataResponse<DerivedFieldsReport>>> {
    if !body.record.is_object() {
        return Err(AppError::BadRequest(
            "record must be a JSON object".to_string(),
        ));
    }

    let table = RuleTable::<String>::from_config(&body.rules)?;
    let validator = DerivedFieldValidator::new(body.source_field, body.derived_field, table);

    let report = match validator.check_record(&body.record) {
        Outcome::Failed(violation) => {
            let source_value = body
                .record
                .get(validator.source_field())
                .map(|v| text_of(v).into_owned())
                .unwrap_or_default();
            DerivedFieldsReport {
                valid: false,
                constrained: true,
                message: Some(validator.message(&source_value)),
                violation: Some(violation),
            }
        }
        Outcome::Passed => DerivedFieldsReport {
            valid: true,
            constrained: true,
            message: None,
            violation: None,
        },
        Outcome::Unconstrained => DerivedFieldsReport {
            valid: true,
            constrained: false,
            message: None,
            violation: None,
        },
    };

    Ok(Json(DataResponse { data: report }))
}
