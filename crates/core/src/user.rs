//! User update payload and its document-dependent field rules.
//!
//! The `fields` object carries different properties depending on `docType`:
//! a PAN number for `PAN`, a postal address for `ADDRESS_PROOF`.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::validation::derived::DerivedFieldValidator;
use crate::validation::discriminator::{tag_from_serde, Discriminator};
use crate::validation::rules::{compile_pattern, FieldRule, PropertyRule};
use crate::validation::table::RuleTable;

/// Kind of identity document a user update carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocType {
    Pan,
    AddressProof,
}

impl DocType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Pan => "PAN",
            DocType::AddressProof => "ADDRESS_PROOF",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Discriminator for DocType {
    fn from_tag(tag: &Value) -> Option<Self> {
        tag_from_serde(tag)
    }
}

/// `fields` rules per `docType`.
pub static DOC_FIELD_RULES: LazyLock<DerivedFieldValidator<DocType>> = LazyLock::new(|| {
    let pincode = compile_pattern(r"\d{6}").expect("valid regex");
    let table = RuleTable::builder()
        .rule_set(
            DocType::Pan,
            [PropertyRule::new(
                "panNo",
                FieldRule::required().min_length(10).max_length(10),
            )],
        )
        .rule_set(
            DocType::AddressProof,
            [
                PropertyRule::new("address1", FieldRule::required().max_length(200)),
                PropertyRule::new("city", FieldRule::required().max_length(50)),
                PropertyRule::new("state", FieldRule::required().max_length(50)),
                PropertyRule::new("pincode", FieldRule::required().pattern(pincode)),
            ],
        )
        .build()
        .expect("valid rule table");
    DerivedFieldValidator::new("docType", "fields", table)
});

/// Body of a user update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub user_id: String,
    pub doc_type: DocType,
    /// Document properties; shape depends on `doc_type`.
    #[serde(default)]
    pub fields: Value,
}

impl Validate for UpdateUserDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        DOC_FIELD_RULES
            .validate(Some(&self.doc_type), Some(&self.fields))
            .map_err(|err| {
                let mut errors = ValidationErrors::new();
                errors.add("fields", err);
                errors
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dto(body: Value) -> UpdateUserDto {
        serde_json::from_value(body).unwrap()
    }

    fn field_messages(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| {
                errs.iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn doc_type_wire_names() {
        assert_eq!(serde_json::to_value(DocType::AddressProof).unwrap(), json!("ADDRESS_PROOF"));
        assert_eq!(DocType::from_tag(&json!("PAN")), Some(DocType::Pan));
        assert_eq!(DocType::from_tag(&json!("UNKNOWN_TAG")), None);
        assert_eq!(DocType::Pan.to_string(), "PAN");
    }

    #[test]
    fn valid_pan_update() {
        let body = dto(json!({
            "userId": "u-1",
            "docType": "PAN",
            "fields": { "panNo": "ABCDE1234F" }
        }));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn short_pan_reports_on_fields() {
        let body = dto(json!({
            "userId": "u-1",
            "docType": "PAN",
            "fields": { "panNo": "ABCDE123" }
        }));
        let errors = body.validate().unwrap_err();
        assert_eq!(
            field_messages(&errors, "fields"),
            vec!["docType:PAN has invalid value in fields".to_string()]
        );
    }

    #[test]
    fn valid_address_update() {
        let body = dto(json!({
            "userId": "u-2",
            "docType": "ADDRESS_PROOF",
            "fields": {
                "address1": "12 Main St",
                "city": "Metropolis",
                "state": "NY",
                "pincode": "123456"
            }
        }));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn address_without_pincode_is_invalid() {
        let body = dto(json!({
            "userId": "u-2",
            "docType": "ADDRESS_PROOF",
            "fields": { "address1": "12 Main St", "city": "Metropolis", "state": "NY" }
        }));
        let errors = body.validate().unwrap_err();
        assert_eq!(
            field_messages(&errors, "fields"),
            vec!["docType:ADDRESS_PROOF has invalid value in fields".to_string()]
        );
    }

    #[test]
    fn address_with_bad_pincode_is_invalid() {
        let body = dto(json!({
            "userId": "u-2",
            "docType": "ADDRESS_PROOF",
            "fields": {
                "address1": "12 Main St",
                "city": "Metropolis",
                "state": "NY",
                "pincode": "12A456"
            }
        }));
        assert!(body.validate().is_err());
    }

    #[test]
    fn missing_fields_object_fails_required() {
        let body = dto(json!({ "userId": "u-3", "docType": "PAN" }));
        assert!(body.fields.is_null());
        assert!(body.validate().is_err());
    }

    #[test]
    fn address_with_non_ascii_digits_is_invalid() {
        let body = dto(json!({
            "userId": "u-2",
            "docType": "ADDRESS_PROOF",
            "fields": {
                "address1": "12 Main St",
                "city": "Metropolis",
                "state": "NY",
                "pincode": "१२३४५६"
            }
        }));
        let errors = body.validate().unwrap_err();
        assert_eq!(
            field_messages(&errors, "fields"),
            vec!["docType:ADDRESS_PROOF has invalid value in fields".to_string()]
        );
    }

    #[test]
    fn empty_user_id_is_accepted() {
        let body = dto(json!({
            "userId": "",
            "docType": "PAN",
            "fields": { "panNo": "ABCDE1234F" }
        }));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn only_fields_is_reported() {
        let body = dto(json!({ "userId": " ", "docType": "PAN", "fields": {} }));
        let errors = body.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert_eq!(field_messages(&errors, "fields").len(), 1);
    }

    #[test]
    fn unknown_doc_type_is_rejected_by_deserialization() {
        let result = serde_json::from_value::<UpdateUserDto>(json!({
            "userId": "u-4",
            "docType": "UNKNOWN_TAG",
            "fields": {}
        }));
        assert!(result.is_err());
    }
}
