#![forbid(unsafe_code)]

//! Core Rule trait and the types rules report through

use crate::config::options::{OptionsSchema, RuleConfig};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::output::messages::render;
use crate::rules::fix::Fix;
use crate::syntax::{Location, Node, NodeKind, SourceTree, Span};
use crate::types::RuleId;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single style violation detected by a rule
///
/// Locations and fixes are relative to the snapshot of the pass that
/// produced the finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// ID of the rule that reported this finding
    pub rule_id: RuleId,

    /// Key into the rule's message table
    pub message_id: String,

    /// Values substituted into the message template
    pub args: BTreeMap<String, String>,

    /// Rendered human-readable message
    pub message: String,

    pub location: Location,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Finding {
    pub fn span(&self) -> Span {
        self.location.span()
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Total order used to make a pass's findings deterministic
    pub fn sort_key(&self) -> (usize, usize, &RuleId, &str) {
        (
            self.location.start.offset,
            self.location.end.offset,
            &self.rule_id,
            &self.message_id,
        )
    }
}

/// What a checker hands to [`RuleContext::report`]
#[derive(Debug, Clone)]
pub struct Report {
    message_id: &'static str,
    span: Span,
    args: BTreeMap<String, String>,
    fix: Option<Fix>,
}

impl Report {
    pub fn new(message_id: &'static str, span: Span) -> Self {
        Report {
            message_id,
            span,
            args: BTreeMap::new(),
            fix: None,
        }
    }

    pub fn arg(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }

    pub fn fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn maybe_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }
}

/// Per-rule view of one analysis pass
///
/// Gives checkers read access to the tree and collects their reports.
pub struct RuleContext<'a> {
    rule_id: &'a RuleId,
    messages: &'static [(&'static str, &'static str)],
    tree: &'a SourceTree,
    findings: &'a mut Vec<Finding>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        rule_id: &'a RuleId,
        messages: &'static [(&'static str, &'static str)],
        tree: &'a SourceTree,
        findings: &'a mut Vec<Finding>,
    ) -> Self {
        RuleContext {
            rule_id,
            messages,
            tree,
            findings,
        }
    }

    pub fn tree(&self) -> &'a SourceTree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.tree.text()
    }

    pub fn rule_id(&self) -> &RuleId {
        self.rule_id
    }

    /// Records a finding, rendering its message from the rule's templates
    pub fn report(&mut self, report: Report) {
        let message = match self.messages.iter().find(|(id, _)| *id == report.message_id) {
            Some((_, template)) => render(template, &report.args),
            None => {
                tracing::warn!(
                    rule = %self.rule_id,
                    message_id = report.message_id,
                    "rule reported an undeclared message id"
                );
                report.message_id.to_string()
            }
        };

        self.findings.push(Finding {
            rule_id: self.rule_id.clone(),
            message_id: report.message_id.to_string(),
            args: report.args,
            message,
            location: self.tree.location(report.span),
            fix: report.fix,
        });
    }
}

/// Configured, immutable node handler produced by [`Rule::configure`]
pub trait Checker: Send + Sync {
    /// Called once per subscribed node, in document pre-order
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>);
}

/// Trait that all style rules must implement
///
/// A rule is a stateless factory: it declares what it reports and how it is
/// configured, and produces a [`Checker`] from a canonical configuration.
/// The trait is `Send + Sync` so one registry serves parallel units.
pub trait Rule: Send + Sync {
    /// Stable kebab-case identifier
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Message id to template table
    fn messages(&self) -> &'static [(&'static str, &'static str)];

    fn schema(&self) -> &'static OptionsSchema;

    /// Node kinds the checker is invoked for
    fn subscriptions(&self) -> &'static [NodeKind];

    /// Turns a canonical configuration into a checker
    ///
    /// Invalid option combinations fail here, before any node is visited.
    fn configure(
        &self,
        config: &RuleConfig,
        session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError>;
}
