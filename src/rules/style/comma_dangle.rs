#![forbid(unsafe_code)]

//! comma-dangle: require or disallow trailing commas

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, SourceTree, Span, Token};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct CommaDangle;

const MESSAGES: &[(&str, &str)] = &[
    ("unexpected", "Unexpected trailing comma."),
    ("missing", "Missing trailing comma."),
];

const CONSTRUCTS: &[&str] = &[
    "arrays",
    "objects",
    "imports",
    "exports",
    "functions",
    "enums",
    "generics",
    "tuples",
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[FieldSpec {
        name: "value",
        kind: FieldKind::Enum(&["always", "always-multiline", "only-multiline", "never", "ignore"]),
        default: DefaultValue::Str("never"),
    }],
    shorthand: Shorthand::Field("value"),
    constructs: CONSTRUCTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Mode {
    Always,
    AlwaysMultiline,
    OnlyMultiline,
    Never,
    Ignore,
}

#[derive(Debug, Deserialize)]
struct Options {
    value: Mode,
}

impl Rule for CommaDangle {
    fn name(&self) -> &'static str {
        "comma-dangle"
    }

    fn description(&self) -> &'static str {
        "Require or disallow trailing commas"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Array,
            NodeKind::ArrayPattern,
            NodeKind::Object,
            NodeKind::ObjectPattern,
            NodeKind::NamedImports,
            NodeKind::ExportClause,
            NodeKind::FormalParameters,
            NodeKind::Arguments,
            NodeKind::EnumBody,
            NodeKind::TypeParameters,
            NodeKind::TupleType,
        ]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let mode = |construct: &str| -> Result<Mode, ConfigError> {
            Ok(config.construct::<Options>(construct)?.value)
        };
        Ok(Box::new(CommaDangleChecker {
            arrays: mode("arrays")?,
            objects: mode("objects")?,
            imports: mode("imports")?,
            exports: mode("exports")?,
            functions: mode("functions")?,
            enums: mode("enums")?,
            generics: mode("generics")?,
            tuples: mode("tuples")?,
        }))
    }
}

struct CommaDangleChecker {
    arrays: Mode,
    objects: Mode,
    imports: Mode,
    exports: Mode,
    functions: Mode,
    enums: Mode,
    generics: Mode,
    tuples: Mode,
}

impl CommaDangleChecker {
    fn mode_for(&self, kind: NodeKind) -> Mode {
        match kind {
            NodeKind::Array | NodeKind::ArrayPattern => self.arrays,
            NodeKind::Object | NodeKind::ObjectPattern => self.objects,
            NodeKind::NamedImports => self.imports,
            NodeKind::ExportClause => self.exports,
            NodeKind::FormalParameters | NodeKind::Arguments => self.functions,
            NodeKind::EnumBody => self.enums,
            NodeKind::TypeParameters => self.generics,
            NodeKind::TupleType => self.tuples,
            _ => Mode::Ignore,
        }
    }
}

impl Checker for CommaDangleChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let mode = self.mode_for(node.kind());
        if mode == Mode::Ignore {
            return;
        }
        if node.kind() == NodeKind::TypeParameters && is_tsx_arrow_generic(node) {
            return;
        }
        let Some(list) = TrailingList::of(node) else {
            return;
        };

        match mode {
            Mode::Always => force_comma(&list, cx),
            Mode::Never => forbid_comma(&list, cx),
            Mode::AlwaysMultiline if list.is_multiline() => force_comma(&list, cx),
            Mode::AlwaysMultiline => forbid_comma(&list, cx),
            Mode::OnlyMultiline if !list.is_multiline() => forbid_comma(&list, cx),
            Mode::OnlyMultiline | Mode::Ignore => {}
        }
    }
}

/// The tail of a bracketed list: its last item, the comma after it and the closer
struct TrailingList<'t> {
    tree: &'t SourceTree,
    last_item: Node<'t>,
    item_end: &'t Token,
    comma: Option<&'t Token>,
    closing: &'t Token,
}

impl<'t> TrailingList<'t> {
    fn of(node: Node<'t>) -> Option<Self> {
        let tree = node.tree();
        let last_item = node.elements().next_back()?;
        let item_end = last_item.last_token()?;
        let closing = node.last_token()?;
        if closing.index <= item_end.index {
            return None;
        }

        let comma = tree
            .token_after(item_end)
            .filter(|t| t.index < closing.index && tree.token_text(t) == ",");
        if let Some(comma) = comma {
            // a comma after the trailing one means the list ends in a hole
            let next = tree.token_after(comma)?;
            if next.index != closing.index {
                return None;
            }
        }

        Some(TrailingList {
            tree,
            last_item,
            item_end,
            comma,
            closing,
        })
    }

    /// The closer sits on a later line than the last item or its comma
    fn is_multiline(&self) -> bool {
        let trailing = self.comma.unwrap_or(self.item_end);
        trailing.end.line != self.closing.start.line
    }

    fn accepts_comma(&self) -> bool {
        let item = self.last_item;
        let is_rest = |n: Node<'_>| n.kind() == NodeKind::RestPattern;
        !(is_rest(item) || item.child_by_field("pattern").is_some_and(is_rest))
    }
}

fn forbid_comma(list: &TrailingList<'_>, cx: &mut RuleContext<'_>) {
    if let Some(comma) = list.comma {
        cx.report(Report::new("unexpected", comma.span).fix(Fix::delete(comma.span)));
    }
}

fn force_comma(list: &TrailingList<'_>, cx: &mut RuleContext<'_>) {
    if list.comma.is_some() || !list.accepts_comma() {
        return;
    }
    let end = list.item_end.span.end;
    tracing::trace!(
        item = list.tree.token_text(list.item_end),
        "missing trailing comma"
    );
    cx.report(Report::new("missing", Span::empty(end)).fix(Fix::insert(end, ",")));
}

/// `<T,>() => {}` in TSX: dropping the comma would turn the generic into a JSX tag
fn is_tsx_arrow_generic(node: Node<'_>) -> bool {
    let dialect = node.tree().dialect();
    if !(dialect.typescript && dialect.jsx) {
        return false;
    }
    let mut params = node.elements();
    let single_unconstrained = match (params.next(), params.next()) {
        (Some(param), None) => param.child_by_field("constraint").is_none(),
        _ => false,
    };
    single_unconstrained
        && node
            .parent()
            .is_some_and(|parent| parent.kind() == NodeKind::ArrowFunction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::style::testing::{defaults, fix, js, lint, message_ids, ts, tsx};
    use serde_json::{Value, json};

    fn valid(options: Value, code: &str) {
        let found = lint::<CommaDangle>(options.clone(), ts(), code);
        assert!(found.is_empty(), "{code:?} with {options}: {found:?}");
    }

    fn invalid(options: Value, code: &str, output: &str, expected: &str) {
        let found = lint::<CommaDangle>(options.clone(), ts(), code);
        assert_eq!(message_ids(&found), vec![expected], "{code:?} with {options}");
        assert_eq!(fix::<CommaDangle>(options, ts(), code), output);
    }

    #[test]
    fn test_default_is_never() {
        for code in [
            "enum Foo {}",
            "enum Foo {\n}",
            "enum Foo {Bar}",
            "function Foo<T>() {}",
            "type Foo = []",
            "type Foo = [\n]",
        ] {
            valid(defaults(), code);
        }
        invalid(defaults(), "enum Foo {Bar,}", "enum Foo {Bar}", "unexpected");
        invalid(defaults(), "function Foo<T,>() {}", "function Foo<T>() {}", "unexpected");
        invalid(defaults(), "type Foo = [string,]", "type Foo = [string]", "unexpected");
    }

    #[test]
    fn test_never() {
        valid(json!("never"), "enum Foo {Bar\n}");
        valid(json!({"enums": "never"}), "enum Foo {Bar\n}");
        valid(json!({"generics": "never"}), "function Foo<T\n>() {}");
        valid(json!({"tuples": "never"}), "type Foo = [string]");
        invalid(json!("never"), "enum Foo {Bar,\n}", "enum Foo {Bar\n}", "unexpected");
        invalid(json!("never"), "function Foo<T,\n>() {}", "function Foo<T\n>() {}", "unexpected");
        invalid(json!("never"), "type Foo = [string,\n]", "type Foo = [string\n]", "unexpected");
    }

    #[test]
    fn test_always() {
        valid(json!("always"), "enum Foo {Bar,}");
        valid(json!({"enums": "always"}), "enum Foo {Bar,\n}");
        valid(json!("always"), "function Foo<T,>() {}");
        valid(json!({"tuples": "always"}), "type Foo = [string,\n]");
        invalid(json!("always"), "enum Foo {Bar}", "enum Foo {Bar,}", "missing");
        invalid(json!("always"), "enum Foo {Bar\n}", "enum Foo {Bar,\n}", "missing");
        invalid(json!("always"), "function Foo<T>() {}", "function Foo<T,>() {}", "missing");
        invalid(json!("always"), "type Foo = [string\n]", "type Foo = [string,\n]", "missing");
    }

    #[test]
    fn test_always_multiline() {
        let options = json!("always-multiline");
        valid(options.clone(), "enum Foo {Bar}");
        valid(options.clone(), "enum Foo {Bar,\n}");
        valid(json!({"generics": "always-multiline"}), "function Foo<T,\n>() {}");
        valid(options.clone(), "type Foo = [string]");
        invalid(options.clone(), "enum Foo {Bar,}", "enum Foo {Bar}", "unexpected");
        invalid(options.clone(), "enum Foo {Bar\n}", "enum Foo {Bar,\n}", "missing");
        invalid(options.clone(), "function Foo<T\n>() {}", "function Foo<T,\n>() {}", "missing");
        invalid(options, "type Foo = [string,]", "type Foo = [string]", "unexpected");
    }

    #[test]
    fn test_only_multiline() {
        let options = json!("only-multiline");
        valid(options.clone(), "enum Foo {Bar\n}");
        valid(options.clone(), "enum Foo {Bar,\n}");
        valid(options.clone(), "function Foo<T\n>() {}");
        valid(json!({"tuples": "only-multiline"}), "type Foo = [string\n]");
        invalid(options.clone(), "enum Foo {Bar,}", "enum Foo {Bar}", "unexpected");
        invalid(options, "function Foo<T,>() {}", "function Foo<T>() {}", "unexpected");
    }

    #[test]
    fn test_ignore() {
        valid(json!({"generics": "ignore"}), "const a = <TYPE,>() => {}");
    }

    #[test]
    fn test_construct_override_wins() {
        let options = json!(["never", {"generics": "always"}]);
        valid(options.clone(), "function Foo<T,>() {}");
        assert_eq!(
            fix::<CommaDangle>(options, ts(), "const a = [1,];\nfunction Foo<T,>() {}\n"),
            "const a = [1];\nfunction Foo<T,>() {}\n"
        );
    }

    #[test]
    fn test_each_construct_separately() {
        let code = "const Obj = { a: 1 };\nenum Foo {Bar}\nfunction Baz<T,>() {}\ntype Qux = [string,\n]\n";
        valid(
            json!({"enums": "never", "generics": "always", "tuples": "always-multiline"}),
            code,
        );
    }

    #[test]
    fn test_tsx_single_generic_keeps_comma() {
        assert!(lint::<CommaDangle>(defaults(), tsx(), "const id = <T,>(x: T) => x;").is_empty());
        assert!(lint::<CommaDangle>(defaults(), tsx(), "const id = <T,R>(x: T) => x;").is_empty());
        assert_eq!(
            fix::<CommaDangle>(defaults(), tsx(), "const id = <T,R,>(x: T) => x;"),
            "const id = <T,R>(x: T) => x;"
        );
    }

    #[test]
    fn test_javascript_lists() {
        assert_eq!(
            fix::<CommaDangle>(defaults(), js(), "var a = [1, 2,];\nvar b = {x: 1,};\nfoo(a, b,);\n"),
            "var a = [1, 2];\nvar b = {x: 1};\nfoo(a, b);\n"
        );
        assert_eq!(
            fix::<CommaDangle>(json!("always"), js(), "var a = [1, 2];\nimport {x} from 'y';\n"),
            "var a = [1, 2,];\nimport {x,} from 'y';\n"
        );
    }

    #[test]
    fn test_rest_and_holes_are_left_alone() {
        for code in [
            "var [a, ...rest] = arr;",
            "var {a, ...rest} = obj;",
            "function f(a, ...args) {}",
            "var holes = [a, , ];",
        ] {
            assert!(lint::<CommaDangle>(json!("always"), js(), code).is_empty(), "{code}");
        }
        assert!(lint::<CommaDangle>(json!("never"), js(), "var holes = [a,,];").is_empty());
    }

    #[test]
    fn test_comment_after_last_item() {
        assert_eq!(
            fix::<CommaDangle>(json!("always"), js(), "var a = [\n  1 // one\n];\n"),
            "var a = [\n  1, // one\n];\n"
        );
    }
}
