#![forbid(unsafe_code)]

//! no-extra-semi: disallow unnecessary semicolons

use crate::config::options::{OptionsSchema, RuleConfig};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, TokenKind};

/// Flags empty statements and stray semicolons in class bodies
#[derive(Debug, Default)]
pub struct NoExtraSemi;

const MESSAGES: &[(&str, &str)] = &[("unexpected", "Unnecessary semicolon.")];

/// Class members whose terminating `;` belongs to them
const SEMICOLON_OWNERS: &[&str] = &[
    "field_definition",
    "public_field_definition",
    "method_signature",
    "abstract_method_signature",
    "index_signature",
];

impl Rule for NoExtraSemi {
    fn name(&self) -> &'static str {
        "no-extra-semi"
    }

    fn description(&self) -> &'static str {
        "Disallow unnecessary semicolons"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &OptionsSchema::EMPTY
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::EmptyStatement, NodeKind::ClassBody]
    }

    fn configure(
        &self,
        _config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        Ok(Box::new(NoExtraSemiChecker))
    }
}

struct NoExtraSemiChecker;

impl Checker for NoExtraSemiChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        match node.kind() {
            NodeKind::EmptyStatement => check_empty_statement(node, cx),
            NodeKind::ClassBody => check_class_body(node, cx),
            _ => {}
        }
    }
}

fn check_empty_statement(node: Node<'_>, cx: &mut RuleContext<'_>) {
    let allowed_parent = node.parent().is_some_and(|parent| {
        matches!(
            parent.kind(),
            NodeKind::ForStatement
                | NodeKind::ForInStatement
                | NodeKind::WhileStatement
                | NodeKind::DoStatement
                | NodeKind::IfStatement
                | NodeKind::ElseClause
                | NodeKind::LabeledStatement
                | NodeKind::WithStatement
        )
    });
    if allowed_parent {
        return;
    }

    let fix = (!precedes_directive(node)).then(|| Fix::delete(node.span()));
    cx.report(Report::new("unexpected", node.span()).maybe_fix(fix));
}

fn check_class_body(body: Node<'_>, cx: &mut RuleContext<'_>) {
    let mut previous: Option<Node<'_>> = None;
    for child in body.children() {
        if child.kind() == NodeKind::Comment {
            continue;
        }
        let stray = !child.is_named()
            && child.raw_kind() == ";"
            && !previous.is_some_and(|p| SEMICOLON_OWNERS.contains(&p.raw_kind()));
        if stray {
            cx.report(Report::new("unexpected", child.span()).fix(Fix::delete(child.span())));
        }
        previous = Some(child);
    }
}

/// Whether removing `node` could turn the following string statement into a directive
fn precedes_directive(node: Node<'_>) -> bool {
    let Some(next) = node.next_sibling() else {
        return false;
    };
    if next.raw_kind() != "expression_statement"
        || next.first_token().map(|t| t.kind) != Some(TokenKind::String)
    {
        return false;
    }
    let is_string_statement = next
        .elements()
        .next()
        .is_some_and(|expr| expr.raw_kind() == "string");
    if !is_string_statement {
        return false;
    }

    match node.parent() {
        Some(parent) if parent.kind() == NodeKind::Program => true,
        Some(parent) if parent.kind() == NodeKind::BlockStatement => parent
            .parent()
            .is_some_and(|owner| owner.kind().is_function()),
        _ => false,
    }
}
