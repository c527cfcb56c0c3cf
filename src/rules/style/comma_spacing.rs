#![forbid(unsafe_code)]

//! comma-spacing: enforce consistent spacing before and after commas

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, SourceTree, Span, Token, TokenKind};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct CommaSpacing;

const MESSAGES: &[(&str, &str)] = &[
    ("missing", "A space is required {{loc}} ','."),
    ("unexpected", "There should be no space {{loc}} ','."),
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[
        FieldSpec {
            name: "before",
            kind: FieldKind::Bool,
            default: DefaultValue::Bool(false),
        },
        FieldSpec {
            name: "after",
            kind: FieldKind::Bool,
            default: DefaultValue::Bool(true),
        },
    ],
    shorthand: Shorthand::None,
    constructs: &[],
};

#[derive(Debug, Clone, Copy, Deserialize)]
struct Options {
    before: bool,
    after: bool,
}

impl Rule for CommaSpacing {
    fn name(&self) -> &'static str {
        "comma-spacing"
    }

    fn description(&self) -> &'static str {
        "Enforce consistent spacing before and after commas"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::Program]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options: Options = config.general()?;
        Ok(Box::new(CommaSpacingChecker { options }))
    }
}

struct CommaSpacingChecker {
    options: Options,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Before,
    After,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Before => "before",
            Side::After => "after",
        }
    }
}

impl Checker for CommaSpacingChecker {
    fn check(&self, _node: Node<'_>, cx: &mut RuleContext<'_>) {
        let tree = cx.tree();
        let ignored = type_parameter_trailing_commas(tree);
        for comma in tree.tokens() {
            if !is_comma(tree, Some(comma)) || ignored.contains(&comma.index) {
                continue;
            }
            let previous = tree.token_or_comment_before(comma);
            let next = tree.token_or_comment_after(comma);

            let left = previous.filter(|_| !follows_hole(tree, comma));
            let right = next.filter(|t| !is_comma(tree, Some(t)) && !is_closer(tree, t));

            if let Some(left) = left
                && left.is_on_same_line(comma)
                && self.options.before != tree.has_space_between(left, comma)
            {
                self.report(cx, comma, left, Side::Before);
            }

            if let Some(right) = right {
                // a line comment cannot be pulled onto the comma
                if !self.options.after && is_line_comment(tree, right) {
                    continue;
                }
                if comma.is_on_same_line(right)
                    && self.options.after != tree.has_space_between(comma, right)
                {
                    self.report(cx, comma, right, Side::After);
                }
            }
        }
    }
}

impl CommaSpacingChecker {
    fn report(&self, cx: &mut RuleContext<'_>, comma: &Token, other: &Token, side: Side) {
        let wants_space = match side {
            Side::Before => self.options.before,
            Side::After => self.options.after,
        };
        let fix = match (side, wants_space) {
            (Side::Before, true) => Fix::insert(comma.span.start, " "),
            (Side::After, true) => Fix::insert(comma.span.end, " "),
            (Side::Before, false) => Fix::delete(Span::new(other.span.end, comma.span.start)),
            (Side::After, false) => Fix::delete(Span::new(comma.span.end, other.span.start)),
        };
        let message_id = if wants_space { "missing" } else { "unexpected" };
        cx.report(
            Report::new(message_id, comma.span)
                .arg("loc", side.as_str())
                .fix(fix),
        );
    }
}

fn is_comma(tree: &SourceTree, token: Option<&Token>) -> bool {
    token.is_some_and(|t| t.kind == TokenKind::Punctuator && tree.token_text(t) == ",")
}

fn is_closer(tree: &SourceTree, token: &Token) -> bool {
    token.kind == TokenKind::Punctuator && matches!(tree.token_text(token), ")" | "]" | "}")
}

fn is_line_comment(tree: &SourceTree, token: &Token) -> bool {
    token.is_comment() && tree.token_text(token).starts_with("//")
}

/// Token indices of trailing commas in `<T,>` lists, which keep their own spacing
fn type_parameter_trailing_commas(tree: &SourceTree) -> Vec<usize> {
    tree.preorder()
        .filter(|node| node.kind() == NodeKind::TypeParameters)
        .filter_map(|node| {
            let close = node.last_token().filter(|t| tree.token_text(t) == ">")?;
            tree.token_before(close)
                .filter(|t| is_comma(tree, Some(t)))
                .map(|t| t.index)
        })
        .collect()
}

/// The comma closes an array hole, so nothing stands on its left
fn follows_hole(tree: &SourceTree, comma: &Token) -> bool {
    tree.token_before(comma)
        .is_some_and(|t| t.kind == TokenKind::Punctuator && matches!(tree.token_text(t), "," | "["))
}
