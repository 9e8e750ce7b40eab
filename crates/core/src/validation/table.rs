//! Rule tables keyed by discriminator value.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::discriminator::Discriminator;
use super::rules::{PropertyRule, PropertyRuleConfig, RuleSet};
use crate::error::CoreError;

/// Serialized shape of a [`RuleTable`]: tag -> property rules.
pub type RuleTableConfig = BTreeMap<String, Vec<PropertyRuleConfig>>;

/// Maps each discriminator value to the rule set it activates.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RuleTable<K: Discriminator> {
    sets: HashMap<K, RuleSet>,
}

impl<K: Discriminator> RuleTable<K> {
    pub fn builder() -> RuleTableBuilder<K> {
        RuleTableBuilder {
            entries: Vec::new(),
        }
    }

    /// Build a table from its configuration form.
    ///
    /// Every key must parse as a `K`, and no two keys may name the same tag.
    pub fn from_config(config: &RuleTableConfig) -> Result<Self, CoreError> {
        let mut builder = Self::builder();
        for (key, rules) in config {
            let tag = K::from_tag(&Value::String(key.clone())).ok_or_else(|| {
                CoreError::Configuration(format!("unknown discriminator tag '{key}'"))
            })?;
            let rules = rules
                .iter()
                .map(PropertyRule::from_config)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|CoreError::Configuration(msg)| {
                    CoreError::Configuration(format!("tag '{key}': {msg}"))
                })?;
            builder = builder.rule_set(tag, rules);
        }
        builder.build()
    }

    /// Parse and build a table from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: RuleTableConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::Configuration(format!("malformed rule table: {e}")))?;
        Self::from_config(&config)
    }

    pub fn get(&self, tag: &K) -> Option<&RuleSet> {
        self.sets.get(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &K> {
        self.sets.keys()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Collects rule sets for [`RuleTable::builder`].
#[derive(Debug)]
pub struct RuleTableBuilder<K: Discriminator> {
    entries: Vec<(K, Vec<PropertyRule>)>,
}

impl<K: Discriminator> RuleTableBuilder<K> {
    pub fn rule_set(mut self, tag: K, rules: impl IntoIterator<Item = PropertyRule>) -> Self {
        self.entries.push((tag, rules.into_iter().collect()));
        self
    }

    pub fn build(self) -> Result<RuleTable<K>, CoreError> {
        let mut sets = HashMap::with_capacity(self.entries.len());
        for (tag, rules) in self.entries {
            if sets.contains_key(&tag) {
                return Err(CoreError::Configuration(format!(
                    "discriminator tag '{tag}' has more than one rule set"
                )));
            }
            let set = RuleSet::new(rules).map_err(|CoreError::Configuration(msg)| {
                CoreError::Configuration(format!("tag '{tag}': {msg}"))
            })?;
            sets.insert(tag, set);
        }
        Ok(RuleTable { sets })
    }
}
