//! Rule evaluator: pure logic, no I/O.
//!
//! Checks a derived field against the rule set selected by the record's
//! discriminator. Required properties are checked first, then every present
//! property that has a rule is checked for max length, min length and
//! pattern, in that order. The first failure decides the result.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::discriminator::Discriminator;
use super::rules::{FieldRule, FieldViolation, RuleSet, ViolationKind};
use super::table::RuleTable;

/// Result of checking one derived field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The table has no rule set for the discriminator.
    Unconstrained,
    /// Every applicable rule passed.
    Passed,
    Failed(FieldViolation),
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }

    pub fn violation(&self) -> Option<&FieldViolation> {
        match self {
            Outcome::Failed(v) => Some(v),
            _ => None,
        }
    }
}

/// Whether `derived` satisfies the rules selected by `discriminator`.
///
/// A discriminator without a rule set is always valid.
pub fn evaluate<K: Discriminator>(
    derived: Option<&Value>,
    discriminator: &K,
    table: &RuleTable<K>,
) -> bool {
    check(derived, discriminator, table).is_valid()
}

/// Like [`evaluate`], but reports which property failed and why.
pub fn check<K: Discriminator>(
    derived: Option<&Value>,
    discriminator: &K,
    table: &RuleTable<K>,
) -> Outcome {
    let Some(rule_set) = table.get(discriminator) else {
        tracing::trace!(%discriminator, "No rule set for discriminator, skipping");
        return Outcome::Unconstrained;
    };

    match check_rule_set(rule_set, derived) {
        Ok(()) => Outcome::Passed,
        Err(violation) => {
            tracing::debug!(
                %discriminator,
                property = %violation.property,
                rule = %violation.rule,
                "Derived field rejected"
            );
            Outcome::Failed(violation)
        }
    }
}

/// Check `derived` against one rule set.
///
/// Anything other than a JSON object, including a missing value, has no
/// properties.
pub fn check_rule_set(rule_set: &RuleSet, derived: Option<&Value>) -> Result<(), FieldViolation> {
    let properties = derived.and_then(Value::as_object);

    check_required(rule_set, properties)?;

    for (property, value) in properties.into_iter().flatten() {
        if let Some(rule) = rule_set.rule_for(property) {
            check_property(property, value, rule)?;
        }
    }
    Ok(())
}

fn check_required(
    rule_set: &RuleSet,
    properties: Option<&Map<String, Value>>,
) -> Result<(), FieldViolation> {
    let missing = rule_set
        .required_properties()
        .find(|name| !properties.is_some_and(|p| p.contains_key(*name)));

    match missing {
        Some(name) => {
            tracing::debug!(property = name, "Required property missing");
            Err(FieldViolation {
                property: name.to_string(),
                rule: ViolationKind::Required,
                length: None,
                limit: None,
            })
        }
        None => Ok(()),
    }
}

fn check_property(property: &str, value: &Value, rule: &FieldRule) -> Result<(), FieldViolation> {
    if rule.max_length.is_none() && rule.min_length.is_none() && rule.pattern.is_none() {
        return Ok(());
    }

    let text = text_of(value);
    // UTF-16 code units: characters outside the BMP count twice.
    let length = text.encode_utf16().count();
    let fail = |kind: ViolationKind, limit: Option<usize>| {
        tracing::debug!(property, rule = %kind, length, limit, "Field rule violated");
        FieldViolation {
            property: property.to_string(),
            rule: kind,
            length: limit.map(|_| length),
            limit,
        }
    };

    if let Some(max) = rule.max_length {
        if length > max {
            return Err(fail(ViolationKind::MaxLength, Some(max)));
        }
    }
    if let Some(min) = rule.min_length {
        if length < min {
            return Err(fail(ViolationKind::MinLength, Some(min)));
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&text) {
            return Err(fail(ViolationKind::Pattern, None));
        }
    }
    Ok(())
}

/// Canonical textual form of a value for length and pattern checks.
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Number(n) => Cow::Owned(number_text(n)),
        // Null elements render as empty, like a joined list.
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => text_of(other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

/// Numbers print the way JavaScript's `String(n)` does: integral floats
/// without a fraction (`10.0` -> `"10"`), and an explicit exponent sign
/// outside `[1e-6, 1e21)` (`1e21` -> `"1e+21"`).
pub(crate) fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&f.abs()) {
        // Shortest round-trip digits, never an exponent.
        return f.to_string();
    }
    let text = format!("{f:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}
