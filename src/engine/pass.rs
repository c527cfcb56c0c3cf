#![forbid(unsafe_code)]

//! One analysis pass: parse a snapshot and dispatch every rule over it

use crate::config::RuleSet;
use crate::engine::session::Session;
use crate::error::{ConfigError, StyleError};
use crate::rules::{Checker, Finding, RuleContext, RuleRegistry};
use crate::syntax::{NodeKind, SourceParser, SourceTree};
use crate::types::RuleId;
use std::collections::HashMap;

/// A rule bound to its validated options for one unit run
pub struct ConfiguredRule {
    id: RuleId,
    messages: &'static [(&'static str, &'static str)],
    subscriptions: &'static [NodeKind],
    checker: Box<dyn Checker>,
}

impl ConfiguredRule {
    pub fn id(&self) -> &RuleId {
        &self.id
    }
}

impl std::fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("id", &self.id)
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

/// Configures every rule of `rule_set`, in rule ID order
///
/// # Errors
///
/// Fails on the first rule whose options its `configure` rejects, or whose
/// name is not registered.
pub fn configure_rules(
    registry: &RuleRegistry,
    rule_set: &RuleSet,
    session: &mut Session,
) -> Result<Vec<ConfiguredRule>, ConfigError> {
    rule_set
        .iter()
        .map(|(id, config)| {
            let rule = registry
                .get_rule(id)
                .ok_or_else(|| ConfigError::UnknownRule(id.to_string()))?;
            Ok(ConfiguredRule {
                id: id.clone(),
                messages: rule.messages(),
                subscriptions: rule.subscriptions(),
                checker: rule.configure(config, session)?,
            })
        })
        .collect()
}

/// Result of analyzing one snapshot
#[derive(Debug)]
pub struct AnalysisPass {
    /// 1-based pass number within a unit run
    pub number: usize,
    pub tree: SourceTree,
    /// Sorted by location, then rule ID, then message ID
    pub findings: Vec<Finding>,
}

impl AnalysisPass {
    pub fn source(&self) -> &str {
        self.tree.text()
    }

    /// Whether any finding carries a fix applicable to this snapshot
    pub fn has_applicable_fix(&self) -> bool {
        self.findings.iter().any(|f| {
            f.fix
                .as_ref()
                .is_some_and(|fix| fix.validate(self.source()).is_ok())
        })
    }
}

/// Parses `source` and runs every rule over the resulting tree
///
/// Nodes are visited in pre-order. For each node, the rules subscribed to
/// its kind run in rule ID order.
pub fn analyze(
    parser: &dyn SourceParser,
    rules: &[ConfiguredRule],
    source: &str,
    number: usize,
) -> Result<AnalysisPass, StyleError> {
    let tree = parser
        .parse(source)
        .map_err(|err| StyleError::Parse {
            pass: number,
            source: err,
        })?;

    let mut listeners: HashMap<NodeKind, Vec<&ConfiguredRule>> = HashMap::new();
    for rule in rules {
        for kind in rule.subscriptions {
            listeners.entry(*kind).or_default().push(rule);
        }
    }

    let mut findings = Vec::new();
    for node in tree.preorder() {
        let Some(subscribed) = listeners.get(&node.kind()) else {
            continue;
        };
        for rule in subscribed {
            let mut cx = RuleContext::new(&rule.id, rule.messages, &tree, &mut findings);
            rule.checker.check(node, &mut cx);
        }
    }

    findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    tracing::debug!(
        pass = number,
        nodes = tree.node_count(),
        findings = findings.len(),
        "analysis pass complete"
    );

    Ok(AnalysisPass {
        number,
        tree,
        findings,
    })
}
