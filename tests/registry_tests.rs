//! Integration tests for the rule registry
//!
//! Verifies registration, lookup and deterministic enumeration, for both
//! the built-in catalog and rules defined outside the crate.

mod common;

use common::{RenameCall, Toggle, custom_engine};
use stylefix::config::RuleSet;
use stylefix::error::RuleError;
use stylefix::rules::RuleRegistry;
use stylefix::rules::builtin::builtin_rules;
use stylefix::types::Dialect;

#[test]
fn test_builtin_catalog_in_id_order() {
    let registry = RuleRegistry::builtin().unwrap();
    let names: Vec<&str> = registry.iter_rules().map(|(_, rule)| rule.name()).collect();

    assert_eq!(
        names,
        vec![
            "comma-dangle",
            "comma-spacing",
            "eol-last",
            "jsx-max-props-per-line",
            "no-extra-semi",
            "object-curly-newline",
            "one-var-declaration-per-line",
            "rest-spread-spacing",
            "space-before-blocks",
        ]
    );
}

#[test]
fn test_enumeration_ignores_registration_order() {
    let mut reversed = RuleRegistry::new();
    for rule in builtin_rules().into_iter().rev() {
        reversed.register(rule).unwrap();
    }
    let builtin = RuleRegistry::builtin().unwrap();
    assert_eq!(reversed.ids(), builtin.ids());
}

#[test]
fn test_lookup_by_name() {
    let registry = RuleRegistry::builtin().unwrap();
    let (id, rule) = registry.lookup("eol-last").unwrap();
    assert_eq!(id.as_str(), "eol-last");
    assert_eq!(rule.messages().len(), 2);

    assert_eq!(
        registry.lookup("semi").err(),
        Some(RuleError::NotFound("semi".to_string()))
    );
    assert!(registry.lookup("Not A Rule").is_err());
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = RuleRegistry::builtin().unwrap();
    let before = registry.len();
    let extra = builtin_rules().into_iter().next().unwrap();

    let err = registry.register(extra).unwrap_err();
    assert_eq!(err, RuleError::Duplicate("comma-dangle".to_string()));
    assert_eq!(registry.len(), before);
}

#[test]
fn test_custom_rules_register_alongside_builtins() {
    let mut registry = RuleRegistry::builtin().unwrap();
    registry.register(Box::new(Toggle::default())).unwrap();
    registry.register(Box::new(RenameCall)).unwrap();

    assert_eq!(registry.len(), 11);
    let set = RuleSet::all_defaults(&registry);
    assert_eq!(set.len(), 11);
}

#[test]
fn test_custom_rule_runs_through_engine() {
    let engine = custom_engine(vec![Box::new(RenameCall)], Dialect::JAVASCRIPT);
    let findings = engine.lint("foo(1);\nbaz(2);").unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id.as_str(), "rename-call");
    assert_eq!(findings[0].message, "Call bar instead of foo.");
    assert_eq!(engine.fix("foo(1);").unwrap().source, "bar(1);");
}

#[test]
fn test_empty_registry() {
    let registry = RuleRegistry::default();
    assert!(registry.is_empty());
    assert_eq!(registry.iter_rules().count(), 0);
}
