#![forbid(unsafe_code)]

//! The set of enabled rules with their canonical options

use crate::config::options::RuleConfig;
use crate::error::ConfigError;
use crate::rules::RuleRegistry;
use crate::types::RuleId;
use serde_json::Value;
use std::collections::BTreeMap;

/// Enabled rules keyed by ID, each with normalized options
///
/// Iteration is in rule ID order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<RuleId, RuleConfig>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Every registered rule at its default options
    pub fn all_defaults(registry: &RuleRegistry) -> Self {
        let rules = registry
            .iter_rules()
            .map(|(id, rule)| (id.clone(), RuleConfig::defaults(rule.name(), rule.schema())))
            .collect();
        RuleSet { rules }
    }

    /// Enables `name` with raw options; `Value::Null` means defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` for unregistered names and any
    /// normalization error for malformed options.
    pub fn enable(
        &mut self,
        registry: &RuleRegistry,
        name: &str,
        options: &Value,
    ) -> Result<&mut Self, ConfigError> {
        let (id, rule) = registry
            .lookup(name)
            .map_err(|_| ConfigError::UnknownRule(name.to_string()))?;
        let config = RuleConfig::from_value(rule.name(), rule.schema(), options)?;
        self.rules.insert(id.clone(), config);
        Ok(self)
    }

    pub fn insert(&mut self, id: RuleId, config: RuleConfig) {
        self.rules.insert(id, config);
    }

    pub fn disable(&mut self, id: &RuleId) -> Option<RuleConfig> {
        self.rules.remove(id)
    }

    pub fn get(&self, id: &RuleId) -> Option<&RuleConfig> {
        self.rules.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleId, &RuleConfig)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enable_known_rule() {
        let registry = RuleRegistry::builtin().unwrap();
        let mut set = RuleSet::new();
        set.enable(&registry, "comma-dangle", &json!("always")).unwrap();

        let config = set.get(&RuleId::new("comma-dangle").unwrap()).unwrap();
        assert_eq!(config.get("value"), Some(&json!("always")));
    }

    #[test]
    fn test_enable_unknown_rule() {
        let registry = RuleRegistry::builtin().unwrap();
        let err = RuleSet::new()
            .enable(&registry, "no-such-rule", &Value::Null)
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownRule("no-such-rule".to_string()));
    }

    #[test]
    fn test_all_defaults_covers_registry() {
        let registry = RuleRegistry::builtin().unwrap();
        let set = RuleSet::all_defaults(&registry);
        assert_eq!(set.len(), registry.len());
        let ids: Vec<&RuleId> = set.iter().map(|(id, _)| id).collect();
        let expected: Vec<&RuleId> = registry.ids().iter().collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_disable() {
        let registry = RuleRegistry::builtin().unwrap();
        let mut set = RuleSet::all_defaults(&registry);
        let before = set.len();
        assert!(set.disable(&RuleId::new("eol-last").unwrap()).is_some());
        assert_eq!(set.len(), before - 1);
    }
}
