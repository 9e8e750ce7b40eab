//! Discriminator tags that select a rule set.

use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::evaluator::number_text;

/// A value of the source field that can key a [`RuleTable`].
///
/// `from_tag` defines the tag domain: it returns `None` for any value outside
/// it. Record values and configuration keys both go through it, so a table
/// loaded from configuration can only hold tags the discriminator accepts.
///
/// [`RuleTable`]: super::table::RuleTable
pub trait Discriminator: Eq + Hash + Clone + fmt::Debug + fmt::Display + Send + Sync {
    fn from_tag(tag: &Value) -> Option<Self>;
}

/// Open string domain. Numbers and booleans key by their textual form.
impl Discriminator for String {
    fn from_tag(tag: &Value) -> Option<Self> {
        match tag {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_text(n)),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Numeric tags. Strings holding an integer are accepted so that JSON object
/// keys can name them, and so are integral floats such as `1.0`.
impl Discriminator for i64 {
    fn from_tag(tag: &Value) -> Option<Self> {
        match tag {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Parse a tag through the type's serde representation.
///
/// Handy for `Discriminator` impls on serde-derived enums.
pub fn tag_from_serde<K: DeserializeOwned>(tag: &Value) -> Option<K> {
    K::deserialize(tag).ok()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    enum Kind {
        Passport,
        VoterId,
    }

    #[test]
    fn string_tags() {
        assert_eq!(String::from_tag(&json!("PAN")), Some("PAN".to_string()));
        assert_eq!(String::from_tag(&json!(7)), Some("7".to_string()));
        assert_eq!(String::from_tag(&json!(1.0)), Some("1".to_string()));
        assert_eq!(String::from_tag(&json!(1e21)), Some("1e+21".to_string()));
        assert_eq!(String::from_tag(&json!(true)), Some("true".to_string()));
        assert_eq!(String::from_tag(&json!(null)), None);
        assert_eq!(String::from_tag(&json!({"a": 1})), None);
    }

    #[test]
    fn integer_tags() {
        assert_eq!(i64::from_tag(&json!(3)), Some(3));
        assert_eq!(i64::from_tag(&json!("42")), Some(42));
        assert_eq!(i64::from_tag(&json!("x")), None);
        assert_eq!(i64::from_tag(&json!(1.5)), None);
        assert_eq!(i64::from_tag(&json!(1.0)), Some(1));
    }

    #[test]
    fn serde_tags() {
        assert_eq!(tag_from_serde::<Kind>(&json!("VOTER_ID")), Some(Kind::VoterId));
        assert_eq!(tag_from_serde::<Kind>(&json!("PASSPORT")), Some(Kind::Passport));
        assert_eq!(tag_from_serde::<Kind>(&json!("DRIVING_LICENCE")), None);
    }
}
