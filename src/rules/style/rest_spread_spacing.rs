#![forbid(unsafe_code)]

//! rest-spread-spacing: enforce spacing between rest and spread operators and their expressions

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, Span};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct RestSpreadSpacing;

const MESSAGES: &[(&str, &str)] = &[
    ("expectedWhitespace", "Expected whitespace after {{type}} operator."),
    ("unexpectedWhitespace", "Unexpected whitespace after {{type}} operator."),
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[FieldSpec {
        name: "value",
        kind: FieldKind::Enum(&["always", "never"]),
        default: DefaultValue::Str("never"),
    }],
    shorthand: Shorthand::Field("value"),
    constructs: &[],
};

#[derive(Debug, Deserialize)]
struct Options {
    value: String,
}

impl Rule for RestSpreadSpacing {
    fn name(&self) -> &'static str {
        "rest-spread-spacing"
    }

    fn description(&self) -> &'static str {
        "Enforce spacing between rest and spread operators and their expressions"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::SpreadElement, NodeKind::RestPattern]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options: Options = config.general()?;
        Ok(Box::new(RestSpreadChecker {
            always: options.value == "always",
        }))
    }
}

struct RestSpreadChecker {
    always: bool,
}

impl Checker for RestSpreadChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let Some(parent) = node.parent() else {
            return;
        };
        // `{...props}` in JSX has its own spacing rules
        if parent.kind() == NodeKind::JsxExpression {
            return;
        }
        let tree = cx.tree();
        let Some(operator) = node.first_token().filter(|t| tree.token_text(t) == "...") else {
            return;
        };
        let Some(next) = tree.token_after(operator) else {
            return;
        };

        let operator_type = match (node.kind(), parent.kind()) {
            (NodeKind::SpreadElement, NodeKind::Object) => "spread property",
            (NodeKind::SpreadElement, _) => "spread",
            (_, NodeKind::ObjectPattern) => "rest property",
            _ => "rest",
        };

        let has_space = tree.has_space_between(operator, next);
        if self.always && !has_space {
            cx.report(
                Report::new("expectedWhitespace", Span::empty(operator.span.end))
                    .arg("type", operator_type)
                    .fix(Fix::insert(operator.span.end, " ")),
            );
        } else if !self.always && has_space {
            let gap = Span::new(operator.span.end, next.span.start);
            let fix = tree
                .slice(gap)
                .chars()
                .all(char::is_whitespace)
                .then(|| Fix::delete(gap));
            cx.report(
                Report::new("unexpectedWhitespace", gap)
                    .arg("type", operator_type)
                    .maybe_fix(fix),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::style::testing::{defaults, fix, js, lint, ts};
    use serde_json::json;

    #[test]
    fn test_valid_never() {
        for code in [
            "fn(...args)",
            "fn(...(args))",
            "[...arr, 4, 5, 6]",
            "let [a, b, ...arr] = [1, 2, 3, 4, 5];",
            "function fn(a, b, ...arr) {}",
            "let n = { x, y, ...z };",
            "let { x, y, ...z } = { x: 1, y: 2, a: 3, b: 4 };",
            "<App {... props} />",
        ] {
            assert!(lint::<RestSpreadSpacing>(defaults(), js(), code).is_empty(), "{code}");
        }
    }

    #[test]
    fn test_valid_always() {
        for code in [
            "fn(... args)",
            "[... arr, 4, 5, 6]",
            "function fn(a, b, ... arr) {}",
            "let n = { x, y, ... z };",
        ] {
            assert!(lint::<RestSpreadSpacing>(json!("always"), js(), code).is_empty(), "{code}");
        }
    }

    #[test]
    fn test_never_removes_space() {
        assert_eq!(fix::<RestSpreadSpacing>(defaults(), js(), "fn(... args)"), "fn(...args)");
        assert_eq!(fix::<RestSpreadSpacing>(defaults(), js(), "fn(...\nargs)"), "fn(...args)");
        assert_eq!(
            fix::<RestSpreadSpacing>(defaults(), js(), "let [a, b, ... arr] = [... c];"),
            "let [a, b, ...arr] = [...c];"
        );
    }

    #[test]
    fn test_always_inserts_space() {
        assert_eq!(
            fix::<RestSpreadSpacing>(json!("always"), js(), "let {a, ...b} = {...c};"),
            "let {a, ... b} = {... c};"
        );
    }

    #[test]
    fn test_operator_type_in_message() {
        let messages: Vec<String> =
            lint::<RestSpreadSpacing>(defaults(), js(), "let { ... a } = { ... b };\nf(... c);\nfunction g(... d) {}")
                .into_iter()
                .map(|f| f.message)
                .collect();
        assert_eq!(
            messages,
            vec![
                "Unexpected whitespace after rest property operator.",
                "Unexpected whitespace after spread property operator.",
                "Unexpected whitespace after spread operator.",
                "Unexpected whitespace after rest operator.",
            ]
        );
    }

    #[test]
    fn test_comment_after_operator_blocks_fix() {
        let found = lint::<RestSpreadSpacing>(defaults(), js(), "fn(... /* c */ args)");
        assert_eq!(found.len(), 1);
        assert!(found[0].fix.is_none());
    }

    #[test]
    fn test_typescript_rest_parameter() {
        assert_eq!(
            fix::<RestSpreadSpacing>(defaults(), ts(), "function f(... args: string[]) {}"),
            "function f(...args: string[]) {}"
        );
    }
}
