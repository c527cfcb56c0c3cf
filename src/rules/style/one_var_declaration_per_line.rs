#![forbid(unsafe_code)]

//! one-var-declaration-per-line: require or disallow newlines around variable declarations

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct OneVarDeclarationPerLine;

const MESSAGES: &[(&str, &str)] = &[(
    "expectVarOnNewline",
    "Expected variable declaration to be on a new line.",
)];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[FieldSpec {
        name: "value",
        kind: FieldKind::Enum(&["always", "initializations"]),
        default: DefaultValue::Str("initializations"),
    }],
    shorthand: Shorthand::Field("value"),
    constructs: &[],
};

#[derive(Debug, Deserialize)]
struct Options {
    value: String,
}

impl Rule for OneVarDeclarationPerLine {
    fn name(&self) -> &'static str {
        "one-var-declaration-per-line"
    }

    fn description(&self) -> &'static str {
        "Require or disallow newlines around variable declarations"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::VariableDeclaration]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options: Options = config.general()?;
        Ok(Box::new(DeclarationChecker {
            always: options.value == "always",
        }))
    }
}

struct DeclarationChecker {
    always: bool,
}

impl Checker for DeclarationChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let in_loop_head = node.parent().is_some_and(|parent| {
            matches!(
                parent.kind(),
                NodeKind::ForStatement | NodeKind::ForInStatement
            )
        });
        if in_loop_head {
            return;
        }

        let mut previous: Option<Node<'_>> = None;
        for current in node
            .elements()
            .filter(|child| child.kind() == NodeKind::VariableDeclarator)
        {
            if let Some(prev) = previous
                && prev.location().end.line == current.location().start.line
                && (self.always || is_initialized(prev) || is_initialized(current))
            {
                cx.report(
                    Report::new("expectVarOnNewline", current.span())
                        .fix(Fix::insert(current.span().start, "\n")),
                );
            }
            previous = Some(current);
        }
    }
}

fn is_initialized(declarator: Node<'_>) -> bool {
    declarator.child_by_field("value").is_some()
}
