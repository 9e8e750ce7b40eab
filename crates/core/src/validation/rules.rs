//! Rule and violation types.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Constraints for one property of a derived field.
///
/// An unset limit or pattern is not enforced at all. `Some(0)` is a real
/// limit, not a synonym for "unset".
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    /// A rule whose property must be present in the derived field.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// A rule that only constrains the property when it is present.
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require the textual value to contain a match of `pattern`.
    ///
    /// Matching is a search, so anchor the pattern with `^...$` to require a
    /// full-string match.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Build a rule from its configuration form, compiling the pattern.
    pub fn from_config(config: &FieldRuleConfig) -> Result<Self, CoreError> {
        let pattern = config
            .pattern
            .as_deref()
            .map(|p| {
                compile_pattern(p)
                    .map_err(|e| CoreError::Configuration(format!("invalid pattern '{p}': {e}")))
            })
            .transpose()?;

        let rule = Self {
            required: config.required,
            min_length: config.min_length,
            max_length: config.max_length,
            pattern,
        };
        rule.check_limits()?;
        Ok(rule)
    }

    /// Reject limits that no value could ever satisfy.
    pub(crate) fn check_limits(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(CoreError::Configuration(format!(
                    "minLength {min} is greater than maxLength {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Compile a configured pattern with ASCII-only digit and word classes.
///
/// `\d`, `\D`, `\w` and `\W` are rewritten to explicit ASCII classes before
/// compiling, so `\d` matches `0-9` only and never other Unicode digits.
/// Everything else is `regex` crate syntax, matched as a search.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&ascii_classes(pattern))
}

fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            // Nested classes keep these valid inside `[...]` too.
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some('w') => out.push_str("[0-9A-Za-z_]"),
            Some('W') => out.push_str("[^0-9A-Za-z_]"),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A rule bound to the derived-field property it constrains.
#[derive(Debug, Clone)]
pub struct PropertyRule {
    pub property: String,
    pub rule: FieldRule,
}

impl PropertyRule {
    pub fn new(property: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            property: property.into(),
            rule,
        }
    }

    pub fn from_config(config: &PropertyRuleConfig) -> Result<Self, CoreError> {
        let rule = FieldRule::from_config(&config.rule).map_err(|CoreError::Configuration(msg)| {
            CoreError::Configuration(format!("property '{}': {msg}", config.property))
        })?;
        Ok(Self::new(config.property.clone(), rule))
    }
}

/// Ordered rules active for one discriminator value.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PropertyRule>,
}

impl RuleSet {
    /// Build a rule set, rejecting a property that appears more than once.
    pub fn new(rules: Vec<PropertyRule>) -> Result<Self, CoreError> {
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.property == rule.property) {
                return Err(CoreError::Configuration(format!(
                    "property '{}' is listed more than once",
                    rule.property
                )));
            }
            rule.rule.check_limits()?;
        }
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRule> {
        self.rules.iter()
    }

    /// The rule for `property`, if the set constrains it.
    pub fn rule_for(&self, property: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|r| r.property == property)
            .map(|r| &r.rule)
    }

    /// Names of the properties that must be present, in declaration order.
    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|r| r.rule.required)
            .map(|r| r.property.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ── Configuration form ───────────────────────────────────────────────

/// Serialized shape of a [`FieldRule`].
///
/// ```json
/// { "required": true, "minLength": 10, "maxLength": 10, "pattern": "^[A-Z]{5}" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldRuleConfig {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Serialized shape of a [`PropertyRule`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyRuleConfig {
    pub property: String,
    pub rule: FieldRuleConfig,
}

// ── Violations ───────────────────────────────────────────────────────

/// Which constraint a property failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    MaxLength,
    MinLength,
    Pattern,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::Required => "required",
            ViolationKind::MaxLength => "max_length",
            ViolationKind::MinLength => "min_length",
            ViolationKind::Pattern => "pattern",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first property that made a derived field invalid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub property: String,
    pub rule: ViolationKind,
    /// Length of the textual value, for length violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// The configured limit, for length violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rule, self.length, self.limit) {
            (ViolationKind::Required, _, _) => {
                write!(f, "{} is required", self.property)
            }
            (ViolationKind::MaxLength, Some(len), Some(max)) => {
                write!(f, "{} is {len} characters long, at most {max} allowed", self.property)
            }
            (ViolationKind::MinLength, Some(len), Some(min)) => {
                write!(f, "{} is {len} characters long, at least {min} required", self.property)
            }
            (ViolationKind::Pattern, _, _) => {
                write!(f, "{} does not match the required pattern", self.property)
            }
            (rule, _, _) => write!(f, "{} violates {rule}", self.property),
        }
    }
}
