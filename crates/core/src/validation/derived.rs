//! Binds a rule table to a pair of record fields for the `validator` crate.

use std::borrow::Cow;

use serde_json::Value;
use validator::ValidationError;

use super::discriminator::Discriminator;
use super::evaluator::{self, Outcome};
use super::rules::FieldViolation;
use super::table::RuleTable;

/// Error code attached to every [`ValidationError`] this validator produces.
pub const DERIVED_FIELDS_CODE: &str = "derived_fields";

/// Validates a derived field against the rules selected by a sibling source
/// field on the same record.
#[derive(Debug, Clone)]
pub struct DerivedFieldValidator<K: Discriminator> {
    source_field: String,
    derived_field: String,
    table: RuleTable<K>,
}

impl<K: Discriminator> DerivedFieldValidator<K> {
    pub fn new(
        source_field: impl Into<String>,
        derived_field: impl Into<String>,
        table: RuleTable<K>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            derived_field: derived_field.into(),
            table,
        }
    }

    pub fn source_field(&self) -> &str {
        &self.source_field
    }

    pub fn derived_field(&self) -> &str {
        &self.derived_field
    }

    pub fn table(&self) -> &RuleTable<K> {
        &self.table
    }

    /// Check a derived value. A `None` discriminator (absent, or outside the
    /// tag domain) selects no rule set.
    pub fn check(&self, discriminator: Option<&K>, derived: Option<&Value>) -> Outcome {
        match discriminator {
            Some(tag) => evaluator::check(derived, tag, &self.table),
            None => Outcome::Unconstrained,
        }
    }

    /// Validate a typed record's fields.
    pub fn validate(
        &self,
        discriminator: Option<&K>,
        derived: Option<&Value>,
    ) -> Result<(), ValidationError> {
        match self.check(discriminator, derived) {
            Outcome::Failed(violation) => {
                let source_value = discriminator.map_or_else(String::new, ToString::to_string);
                Err(self.error(&source_value, &violation))
            }
            Outcome::Passed | Outcome::Unconstrained => Ok(()),
        }
    }

    /// Validate a JSON object record, reading both fields by name.
    pub fn validate_record(&self, record: &Value) -> Result<(), ValidationError> {
        match self.check_record(record) {
            Outcome::Failed(violation) => {
                let source_value = record
                    .get(self.source_field.as_str())
                    .map(|v| evaluator::text_of(v).into_owned())
                    .unwrap_or_default();
                Err(self.error(&source_value, &violation))
            }
            Outcome::Passed | Outcome::Unconstrained => Ok(()),
        }
    }

    /// Like [`validate_record`](Self::validate_record), returning the raw outcome.
    pub fn check_record(&self, record: &Value) -> Outcome {
        let tag = record.get(self.source_field.as_str()).and_then(K::from_tag);
        let derived = record.get(self.derived_field.as_str());
        self.check(tag.as_ref(), derived)
    }

    /// Human-readable failure message, e.g. `docType:PAN has invalid value in fields`.
    pub fn message(&self, source_value: &str) -> String {
        format!(
            "{}:{} has invalid value in {}",
            self.source_field, source_value, self.derived_field
        )
    }

    fn error(&self, source_value: &str, violation: &FieldViolation) -> ValidationError {
        let mut err = ValidationError::new(DERIVED_FIELDS_CODE);
        err.message = Some(Cow::Owned(self.message(source_value)));
        err.add_param(Cow::Borrowed("source_field"), &self.source_field);
        err.add_param(Cow::Borrowed("source_value"), &source_value);
        err.add_param(Cow::Borrowed("property"), &violation.property);
        err.add_param(Cow::Borrowed("rule"), &violation.rule);
        err
    }
}
