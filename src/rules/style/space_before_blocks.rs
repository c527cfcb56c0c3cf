#![forbid(unsafe_code)]

//! space-before-blocks: enforce consistent spacing before blocks

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, Span, TokenKind};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct SpaceBeforeBlocks;

const MESSAGES: &[(&str, &str)] = &[
    ("unexpectedSpace", "Unexpected space before opening brace."),
    ("missingSpace", "Missing space before opening brace."),
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[FieldSpec {
        name: "value",
        kind: FieldKind::Enum(&["always", "never", "off"]),
        default: DefaultValue::Str("always"),
    }],
    shorthand: Shorthand::Field("value"),
    constructs: &["keywords", "functions", "classes", "modules"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Spacing {
    Always,
    Never,
    Off,
}

#[derive(Debug, Deserialize)]
struct Options {
    value: Spacing,
}

impl Rule for SpaceBeforeBlocks {
    fn name(&self) -> &'static str {
        "space-before-blocks"
    }

    fn description(&self) -> &'static str {
        "Enforce consistent spacing before blocks"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[
            NodeKind::BlockStatement,
            NodeKind::ClassBody,
            NodeKind::SwitchBody,
            NodeKind::EnumBody,
            NodeKind::InterfaceBody,
            NodeKind::ObjectType,
        ]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let spacing = |construct: &str| -> Result<Spacing, ConfigError> {
            Ok(config.construct::<Options>(construct)?.value)
        };
        Ok(Box::new(SpaceBeforeBlocksChecker {
            keywords: spacing("keywords")?,
            functions: spacing("functions")?,
            classes: spacing("classes")?,
            modules: spacing("modules")?,
        }))
    }
}

struct SpaceBeforeBlocksChecker {
    keywords: Spacing,
    functions: Spacing,
    classes: Spacing,
    modules: Spacing,
}

impl SpaceBeforeBlocksChecker {
    fn spacing_for(&self, block: Node<'_>) -> Option<Spacing> {
        match block.kind() {
            NodeKind::BlockStatement if is_function_body(block) => Some(self.functions),
            NodeKind::BlockStatement
                if block
                    .parent()
                    .is_some_and(|p| p.kind() == NodeKind::Module) =>
            {
                Some(self.modules)
            }
            NodeKind::BlockStatement | NodeKind::SwitchBody => Some(self.keywords),
            NodeKind::ClassBody | NodeKind::EnumBody | NodeKind::InterfaceBody => {
                Some(self.classes)
            }
            // older grammars give interfaces an object type body
            NodeKind::ObjectType
                if block
                    .parent()
                    .is_some_and(|p| p.raw_kind() == "interface_declaration") =>
            {
                Some(self.classes)
            }
            _ => None,
        }
    }
}

impl Checker for SpaceBeforeBlocksChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let Some(spacing) = self.spacing_for(node) else {
            return;
        };
        if spacing == Spacing::Off {
            return;
        }
        let tree = cx.tree();
        let (Some(brace), Some(preceding)) = (node.first_token(), node.token_before()) else {
            return;
        };
        if tree.token_text(brace) != "{" || !preceding.is_on_same_line(brace) {
            return;
        }
        if is_spaced_by_other_rule(node, tree.token_text(preceding), preceding.kind) {
            return;
        }

        let has_space = tree.has_space_between(preceding, brace);
        match spacing {
            Spacing::Always if !has_space => {
                cx.report(
                    Report::new("missingSpace", node.span())
                        .fix(Fix::insert(brace.span.start, " ")),
                );
            }
            Spacing::Never if has_space => {
                let gap = Span::new(preceding.span.end, brace.span.start);
                let fix = tree
                    .slice(gap)
                    .chars()
                    .all(char::is_whitespace)
                    .then(|| Fix::delete(gap));
                cx.report(Report::new("unexpectedSpace", node.span()).maybe_fix(fix));
            }
            _ => {}
        }
    }
}

fn is_function_body(block: Node<'_>) -> bool {
    block.field() == Some("body")
        && block
            .parent()
            .is_some_and(|parent| parent.kind().is_function())
}

/// Spacing after `=>`, after keywords and after a case colon belongs to other rules
fn is_spaced_by_other_rule(block: Node<'_>, preceding: &str, preceding_kind: TokenKind) -> bool {
    if preceding == "=>" {
        return true;
    }
    if preceding_kind == TokenKind::Keyword && !is_function_body(block) {
        return true;
    }
    preceding == ":"
        && block
            .parent()
            .is_some_and(|parent| parent.kind() == NodeKind::SwitchCase)
}
