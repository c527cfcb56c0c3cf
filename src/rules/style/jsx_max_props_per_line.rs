#![forbid(unsafe_code)]

//! jsx-max-props-per-line: limit the number of JSX props on a single line

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Edit, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, Span};
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct JsxMaxPropsPerLine;

const MESSAGES: &[(&str, &str)] = &[("newLine", "Prop `{{prop}}` must be placed on a new line")];

const COUNT: FieldKind = FieldKind::Integer { min: 1 };

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[
        FieldSpec {
            name: "maximum",
            kind: FieldKind::OneOf(&[
                COUNT,
                FieldKind::Object(&[
                    FieldSpec {
                        name: "single",
                        kind: COUNT,
                        default: DefaultValue::Null,
                    },
                    FieldSpec {
                        name: "multi",
                        kind: COUNT,
                        default: DefaultValue::Null,
                    },
                ]),
            ]),
            default: DefaultValue::Int(1),
        },
        FieldSpec {
            name: "when",
            kind: FieldKind::Enum(&["always", "multiline"]),
            default: DefaultValue::Str("always"),
        },
    ],
    shorthand: Shorthand::None,
    constructs: &[],
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Maximum {
    Count(usize),
    Split {
        #[serde(default)]
        single: Option<usize>,
        #[serde(default)]
        multi: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum When {
    Always,
    Multiline,
}

#[derive(Debug, Deserialize)]
struct Options {
    maximum: Maximum,
    when: When,
}

impl Rule for JsxMaxPropsPerLine {
    fn name(&self) -> &'static str {
        "jsx-max-props-per-line"
    }

    fn description(&self) -> &'static str {
        "Enforce maximum of props on a single line in JSX"
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        MESSAGES
    }

    fn schema(&self) -> &'static OptionsSchema {
        &SCHEMA
    }

    fn subscriptions(&self) -> &'static [NodeKind] {
        &[NodeKind::JsxOpeningElement, NodeKind::JsxSelfClosingElement]
    }

    fn configure(
        &self,
        config: &RuleConfig,
        _session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options: Options = config.general()?;
        // None means unlimited
        let (single, multi) = match options.maximum {
            Maximum::Count(n) if options.when == When::Multiline => (None, Some(n)),
            Maximum::Count(n) => (Some(n), Some(n)),
            Maximum::Split { single, multi } => (single, multi),
        };
        Ok(Box::new(MaxPropsChecker { single, multi }))
    }
}

struct MaxPropsChecker {
    single: Option<usize>,
    multi: Option<usize>,
}

impl Checker for MaxPropsChecker {
    fn check(&self, node: Node<'_>, cx: &mut RuleContext<'_>) {
        let props: Vec<Node<'_>> = node
            .children()
            .filter(|child| child.field() == Some("attribute"))
            .collect();
        if props.is_empty() {
            return;
        }

        let limit = if node.is_multiline() { self.multi } else { self.single };
        let Some(max) = limit else {
            return;
        };

        for line in line_groups(&props) {
            if line.len() <= max {
                continue;
            }
            let offender = line[max];
            cx.report(
                Report::new("newLine", offender.span())
                    .arg("prop", prop_name(offender))
                    .maybe_fix(break_line(&line, max)),
            );
        }
    }
}

/// Splits props into runs where each prop starts on the line the previous one ends
fn line_groups<'t>(props: &[Node<'t>]) -> Vec<Vec<Node<'t>>> {
    let mut groups: Vec<Vec<Node<'t>>> = Vec::new();
    let mut previous_end_line = None;
    for prop in props {
        let loc = prop.location();
        match groups.last_mut() {
            Some(group) if previous_end_line == Some(loc.start.line) => group.push(*prop),
            _ => groups.push(vec![*prop]),
        }
        previous_end_line = Some(loc.end.line);
    }
    groups
}

/// Rewrites the gaps of one line group so every `max` props share a line
///
/// Gaps holding anything but whitespace are left alone and the finding is
/// reported without a fix.
fn break_line(line: &[Node<'_>], max: usize) -> Option<Fix> {
    let tree = line.first()?.tree();
    let mut edits = Vec::new();
    for (i, pair) in line.windows(2).enumerate() {
        let gap = Span::new(pair[0].span().end, pair[1].span().start);
        let current = tree.slice(gap);
        if !current.chars().all(char::is_whitespace) {
            return None;
        }
        let wanted = if (i + 1) % max == 0 { "\n" } else { " " };
        if current != wanted {
            edits.push(Edit::replace(gap, wanted));
        }
    }
    (!edits.is_empty()).then(|| Fix::new(edits))
}

fn prop_name(prop: Node<'_>) -> String {
    if prop.kind() == NodeKind::JsxAttribute {
        return prop
            .elements()
            .next()
            .map(|name| name.text().to_string())
            .unwrap_or_default();
    }
    // spread attribute `{...expr}`
    prop.elements()
        .find(|child| child.kind() == NodeKind::SpreadElement)
        .and_then(|spread| spread.elements().next())
        .map(|argument| argument.text().to_string())
        .unwrap_or_else(|| prop.text().to_string())
}
