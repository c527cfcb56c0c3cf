#![forbid(unsafe_code)]

//! Rule registry for managing rules by identifier
//!
//! The RuleRegistry is responsible for:
//! - Validating rule identifiers and rejecting duplicates
//! - Providing O(1) access to rules by ID
//! - Enumerating rules in identifier order, independent of registration order

use crate::error::RuleError;
use crate::rules::Rule;
use crate::rules::builtin::builtin_rules;
use crate::types::RuleId;
use std::collections::HashMap;

/// Registry for storing and managing all rules
///
/// Rules are stored as trait objects keyed by their `RuleId`; enumeration
/// goes through a sorted ID list so dispatch order is deterministic.
pub struct RuleRegistry {
    rules: HashMap<RuleId, Box<dyn Rule>>,
    order: Vec<RuleId>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a registry holding every built-in rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if a built-in rule has an invalid or duplicate name.
    pub fn builtin() -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for rule in builtin_rules() {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Register a rule under its own name
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` for a malformed name and
    /// `RuleError::Duplicate` if the name is already taken.
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), RuleError> {
        let name = rule.name();
        let rule_id = RuleId::new(name).ok_or_else(|| {
            RuleError::InvalidDefinition(format!(
                "Rule name '{name}' must be lowercase kebab-case"
            ))
        })?;

        if self.rules.contains_key(&rule_id) {
            return Err(RuleError::Duplicate(rule_id.to_string()));
        }

        let pos = self.order.binary_search(&rule_id).unwrap_or_else(|pos| pos);
        self.order.insert(pos, rule_id.clone());
        self.rules.insert(rule_id, rule);
        Ok(())
    }

    /// Get a rule by its ID
    pub fn get_rule(&self, id: &RuleId) -> Option<&dyn Rule> {
        self.rules.get(id).map(|boxed| boxed.as_ref())
    }

    /// Look a rule up by name
    ///
    /// # Errors
    ///
    /// Returns `RuleError::NotFound` if no rule has that name.
    pub fn lookup(&self, name: &str) -> Result<(&RuleId, &dyn Rule), RuleError> {
        RuleId::new(name)
            .and_then(|id| self.rules.get_key_value(&id))
            .map(|(id, rule)| (id, rule.as_ref()))
            .ok_or_else(|| RuleError::NotFound(name.to_string()))
    }

    /// Iterate over all rules in ID order
    pub fn iter_rules(&self) -> impl Iterator<Item = (&RuleId, &dyn Rule)> {
        self.order
            .iter()
            .filter_map(|id| self.rules.get(id).map(|rule| (id, rule.as_ref())))
    }

    /// Registered IDs in sorted order
    pub fn ids(&self) -> &[RuleId] {
        &self.order
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{OptionsSchema, RuleConfig};
    use crate::engine::session::Session;
    use crate::error::ConfigError;
    use crate::rules::{Checker, RuleContext};
    use crate::syntax::{Node, NodeKind};

    struct NamedRule(&'static str);

    struct Noop;

    impl Checker for Noop {
        fn check(&self, _node: Node<'_>, _cx: &mut RuleContext<'_>) {}
    }

    impl Rule for NamedRule {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "test rule"
        }

        fn messages(&self) -> &'static [(&'static str, &'static str)] {
            &[]
        }

        fn schema(&self) -> &'static OptionsSchema {
            &OptionsSchema::EMPTY
        }

        fn subscriptions(&self) -> &'static [NodeKind] {
            &[]
        }

        fn configure(
            &self,
            _config: &RuleConfig,
            _session: &mut Session,
        ) -> Result<Box<dyn Checker>, ConfigError> {
            Ok(Box::new(Noop))
        }
    }

    fn names(registry: &RuleRegistry) -> Vec<&str> {
        registry.iter_rules().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn test_new_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(NamedRule("alpha"))).unwrap();

        let id = RuleId::new("alpha").unwrap();
        assert!(registry.get_rule(&id).is_some());
        assert!(registry.get_rule(&RuleId::new("beta").unwrap()).is_none());
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(NamedRule("alpha"))).unwrap();

        let err = registry.register(Box::new(NamedRule("alpha"))).unwrap_err();
        assert_eq!(err, RuleError::Duplicate("alpha".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_invalid_name() {
        let mut registry = RuleRegistry::new();
        let err = registry.register(Box::new(NamedRule("Bad Name"))).unwrap_err();
        assert!(matches!(err, RuleError::InvalidDefinition(_)));
    }

    #[test]
    fn test_enumeration_independent_of_registration_order() {
        let mut forward = RuleRegistry::new();
        let mut backward = RuleRegistry::new();
        for name in ["gamma", "alpha", "beta"] {
            forward.register(Box::new(NamedRule(name))).unwrap();
        }
        for name in ["beta", "alpha", "gamma"] {
            backward.register(Box::new(NamedRule(name))).unwrap();
        }
        assert_eq!(names(&forward), vec!["alpha", "beta", "gamma"]);
        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn test_lookup() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(NamedRule("alpha"))).unwrap();

        assert!(registry.lookup("alpha").is_ok());
        assert_eq!(
            registry.lookup("missing").err(),
            Some(RuleError::NotFound("missing".to_string()))
        );
        assert!(registry.lookup("NOT VALID").is_err());
    }

    #[test]
    fn test_builtin_registry() {
        let registry = RuleRegistry::builtin().unwrap();
        assert_eq!(registry.len(), builtin_rules().len());
        assert!(registry.lookup("no-extra-semi").is_ok());
        assert!(registry.lookup("comma-dangle").is_ok());

        let ids = registry.ids().to_vec();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
