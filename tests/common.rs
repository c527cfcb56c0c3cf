//! Test utilities for stylefix integration tests
#![allow(dead_code)]

use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stylefix::config::{OptionsSchema, RuleConfig, RuleSet};
use stylefix::engine::{CancelFlag, ExecutionEngine, Session};
use stylefix::error::ConfigError;
use stylefix::rules::{Checker, Fix, Report, Rule, RuleContext, RuleRegistry};
use stylefix::syntax::{Node, NodeKind, TreeSitterParser};
use stylefix::types::Dialect;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Builds an engine over the built-in rules with the given options
pub fn builtin_engine(rules: &[(&str, Value)], dialect: Dialect) -> ExecutionEngine {
    let registry = RuleRegistry::builtin().unwrap();
    let mut set = RuleSet::new();
    for (name, options) in rules {
        set.enable(&registry, name, options).unwrap();
    }
    engine_with(registry, set, dialect)
}

/// Builds an engine over custom rules, each enabled with defaults
pub fn custom_engine(rules: Vec<Box<dyn Rule>>, dialect: Dialect) -> ExecutionEngine {
    let mut registry = RuleRegistry::new();
    for rule in rules {
        registry.register(rule).unwrap();
    }
    let set = RuleSet::all_defaults(&registry);
    engine_with(registry, set, dialect)
}

fn engine_with(registry: RuleRegistry, set: RuleSet, dialect: Dialect) -> ExecutionEngine {
    let parser = TreeSitterParser::new(dialect).unwrap();
    ExecutionEngine::new(registry, set, Arc::new(parser))
}

// ============================================================================
// Mock rules
// ============================================================================

/// Swaps the identifiers `a` and `b` forever
#[derive(Debug, Default)]
pub struct Toggle {
    /// Cancels this flag once the checker has run `cancel_after` times
    pub cancel: Option<(CancelFlag, usize)>,
    pub calls: Arc<AtomicUsize>,
}

impl Rule for Toggle {
    fn name(&self) -> &'static str {
        "toggle"
    }

    fn description(&self) -> &'static str {
        "Swaps a and b"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("swap", "Swap {{from}}.")]
    }

    fn schema(&self) -> &'static OptionsSchema {
        &OptionsSchema::EMPTY
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::Program]
    }

    fn configure(
        &self,
        _config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        Ok(Box::new(ToggleChecker {
            cancel: self.cancel.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct ToggleChecker {
    cancel: Option<(CancelFlag, usize)>,
    calls: Arc<AtomicUsize>,
}

impl Checker for ToggleChecker {
    fn check(&self, _node: Node<'_>, cx: &mut RuleContext<'_>) {
        let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((flag, after)) = &self.cancel
            && calls >= *after
        {
            flag.cancel();
        }
        let tree = cx.tree();
        for token in tree.tokens() {
            let replacement = match tree.token_text(token) {
                "a" => "b",
                "b" => "a",
                _ => continue,
            };
            cx.report(
                Report::new("swap", token.span)
                    .arg("from", tree.token_text(token))
                    .fix(Fix::replace(token.span, replacement)),
            );
        }
    }
}

/// Renames calls of `foo` by rewriting the whole call expression
#[derive(Debug, Default)]
pub struct RenameCall;

impl Rule for RenameCall {
    fn name(&self) -> &'static str {
        "rename-call"
    }

    fn description(&self) -> &'static str {
        "Calls bar instead of foo"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("rename", "Call bar instead of foo.")]
    }

    fn schema(&self) -> &'static OptionsSchema {
        &OptionsSchema::EMPTY
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::Arguments]
    }

    fn configure(
        &self,
        _config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        Ok(Box::new(RenameCallChecker))
    }
}

struct RenameCallChecker;

impl Checker for RenameCallChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let Some(call) = node.parent().filter(|p| p.raw_kind() == "call_expression") else {
            return;
        };
        if call.child_by_field("function").map(|f| f.text()) != Some("foo") {
            return;
        }
        let replacement = format!("bar{}", node.text());
        cx.report(Report::new("rename", call.span()).fix(Fix::replace(call.span(), replacement)));
    }
}

/// Drops empty argument lists, overlapping with [`RenameCall`]
#[derive(Debug, Default)]
pub struct DropEmptyArguments;

impl Rule for DropEmptyArguments {
    fn name(&self) -> &'static str {
        "drop-empty-arguments"
    }

    fn description(&self) -> &'static str {
        "Removes empty argument lists"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[("drop", "Empty argument list.")]
    }

    fn schema(&self) -> &'static OptionsSchema {
        &OptionsSchema::EMPTY
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::Arguments]
    }

    fn configure(
        &self,
        _config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        Ok(Box::new(DropEmptyArgumentsChecker))
    }
}

struct DropEmptyArgumentsChecker;

impl Checker for DropEmptyArgumentsChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        if node.elements().next().is_none() {
            cx.report(Report::new("drop", node.span()).fix(Fix::delete(node.span())));
        }
    }
}
