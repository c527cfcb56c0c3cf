#![forbid(unsafe_code)]

//! object-curly-newline: enforce consistent line breaks after opening and before closing braces

use crate::config::options::{
    DefaultValue, FieldKind, FieldSpec, OptionsSchema, Preset, RuleConfig, Shorthand,
};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, Span};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct ObjectCurlyNewline;

const MESSAGES: &[(&str, &str)] = &[
    (
        "unexpectedLinebreakBeforeClosingBrace",
        "Unexpected line break before this closing brace.",
    ),
    (
        "unexpectedLinebreakAfterOpeningBrace",
        "Unexpected line break after this opening brace.",
    ),
    (
        "expectedLinebreakBeforeClosingBrace",
        "Expected a line break before this closing brace.",
    ),
    (
        "expectedLinebreakAfterOpeningBrace",
        "Expected a line break after this opening brace.",
    ),
];

const CONSTRUCTS: &[&str] = &[
    "ObjectExpression",
    "ObjectPattern",
    "ImportDeclaration",
    "ExportDeclaration",
    "TSTypeLiteral",
    "TSInterfaceBody",
    "TSEnumBody",
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[
        FieldSpec {
            name: "multiline",
            kind: FieldKind::Bool,
            default: DefaultValue::Bool(false),
        },
        // null stands for "no property count forces line breaks"
        FieldSpec {
            name: "minProperties",
            kind: FieldKind::Integer { min: 0 },
            default: DefaultValue::Null,
        },
        FieldSpec {
            name: "consistent",
            kind: FieldKind::Bool,
            default: DefaultValue::Bool(true),
        },
    ],
    shorthand: Shorthand::Presets(&[
        Preset {
            name: "always",
            values: &[
                ("multiline", DefaultValue::Bool(false)),
                ("minProperties", DefaultValue::Int(0)),
                ("consistent", DefaultValue::Bool(false)),
            ],
        },
        Preset {
            name: "never",
            values: &[
                ("multiline", DefaultValue::Bool(false)),
                ("minProperties", DefaultValue::Null),
                ("consistent", DefaultValue::Bool(false)),
            ],
        },
    ]),
    constructs: CONSTRUCTS,
};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    multiline: bool,
    min_properties: Option<usize>,
    consistent: bool,
}

impl Rule for ObjectCurlyNewline {
    fn name(&self) -> &'static str {
        "object-curly-newline"
    }

    fn description(&self) -> &'static str {
        "Enforce consistent line breaks after opening and before closing braces"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Object,
            NodeKind::ObjectPattern,
            NodeKind::NamedImports,
            NodeKind::ExportClause,
            NodeKind::ObjectType,
            NodeKind::InterfaceBody,
            NodeKind::EnumBody,
        ]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options = |construct: &str| config.construct::<Options>(construct);
        Ok(Box::new(CurlyNewlineChecker {
            object_expression: options("ObjectExpression")?,
            object_pattern: options("ObjectPattern")?,
            import_declaration: options("ImportDeclaration")?,
            export_declaration: options("ExportDeclaration")?,
            type_literal: options("TSTypeLiteral")?,
            interface_body: options("TSInterfaceBody")?,
            enum_body: options("TSEnumBody")?,
        }))
    }
}

struct CurlyNewlineChecker {
    object_expression: Options,
    object_pattern: Options,
    import_declaration: Options,
    export_declaration: Options,
    type_literal: Options,
    interface_body: Options,
    enum_body: Options,
}

impl CurlyNewlineChecker {
    fn options_for(&self, node: Node<'_>) -> Options {
        match node.kind() {
            NodeKind::Object => self.object_expression,
            NodeKind::ObjectPattern => self.object_pattern,
            NodeKind::NamedImports => self.import_declaration,
            NodeKind::ExportClause => self.export_declaration,
            NodeKind::InterfaceBody => self.interface_body,
            NodeKind::ObjectType
                if node
                    .parent()
                    .is_some_and(|p| p.raw_kind() == "interface_declaration") =>
            {
                self.interface_body
            }
            NodeKind::EnumBody => self.enum_body,
            _ => self.type_literal,
        }
    }
}

impl Checker for CurlyNewlineChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let options = self.options_for(node);
        let members = node.elements().count();
        // imports and exports without named specifiers have nothing to lay out
        if members == 0 && matches!(node.kind(), NodeKind::NamedImports | NodeKind::ExportClause) {
            return;
        }

        let tree = cx.tree();
        let (Some(open), Some(close)) = (node.first_token(), node.last_token()) else {
            return;
        };
        if tree.token_text(open) != "{" || tree.token_text(close) != "}" {
            return;
        }
        let (Some(first_any), Some(last_any)) = (
            tree.token_or_comment_after(open),
            tree.token_or_comment_before(close),
        ) else {
            return;
        };
        let (Some(first), Some(last)) = (tree.token_after(open), tree.token_before(close)) else {
            return;
        };

        let needs_line_breaks = options.min_properties.is_some_and(|min| members >= min)
            || (options.multiline && members > 0 && first_any.start.line != last_any.end.line);

        let break_after_open = !open.is_on_same_line(first);
        let break_before_close = !last.is_on_same_line(close);

        if needs_line_breaks {
            if !break_after_open {
                let fix = (!first_any.is_comment()).then(|| Fix::insert(open.span.end, "\n"));
                cx.report(
                    Report::new("expectedLinebreakAfterOpeningBrace", open.span).maybe_fix(fix),
                );
            }
            if !break_before_close {
                let fix = (!last_any.is_comment()).then(|| Fix::insert(close.span.start, "\n"));
                cx.report(
                    Report::new("expectedLinebreakBeforeClosingBrace", close.span).maybe_fix(fix),
                );
            }
            return;
        }

        let consistent = options.consistent;
        if (!consistent && break_after_open)
            || (consistent && break_after_open && !break_before_close)
        {
            let fix = (!first_any.is_comment())
                .then(|| Fix::delete(Span::new(open.span.end, first.span.start)));
            cx.report(
                Report::new("unexpectedLinebreakAfterOpeningBrace", open.span).maybe_fix(fix),
            );
        }
        if (!consistent && break_before_close)
            || (consistent && !break_after_open && break_before_close)
        {
            let fix = (!last_any.is_comment())
                .then(|| Fix::delete(Span::new(last.span.end, close.span.start)));
            cx.report(
                Report::new("unexpectedLinebreakBeforeClosingBrace", close.span).maybe_fix(fix),
            );
        }
    }
}
