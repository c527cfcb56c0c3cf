#![forbid(unsafe_code)]

//! eol-last: require or disallow a newline at the end of files

use crate::config::options::{DefaultValue, FieldKind, FieldSpec, OptionsSchema, RuleConfig, Shorthand};
use crate::engine::session::Session;
use crate::error::ConfigError;
use crate::rules::{Checker, Fix, Report, Rule, RuleContext};
use crate::syntax::{Node, NodeKind, Span};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Every line break at the end of the text, LF or CRLF
static TRAILING_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n)+$").expect("trailing break pattern is valid"));

#[derive(Debug, Default)]
pub struct EolLast;

const MESSAGES: &[(&str, &str)] = &[
    ("missing", "Newline required at end of file but not found."),
    ("unexpected", "Newline not allowed at end of file."),
];

static SCHEMA: OptionsSchema = OptionsSchema {
    fields: &[FieldSpec {
        name: "value",
        kind: FieldKind::Enum(&["always", "never", "unix", "windows"]),
        default: DefaultValue::Str("always"),
    }],
    shorthand: Shorthand::Field("value"),
    constructs: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Always,
    Never,
    Unix,
    Windows,
}

#[derive(Debug, Deserialize)]
struct Options {
    value: Mode,
}

impl Rule for EolLast {
    fn name(&self) -> &'static str {
        "eol-last"
    }

    fn description(&self) -> &'static str {
        "Require or disallow newline at the end of files"
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
        session: &mut Session,
    ) -> Result<Box<dyn Checker>, ConfigError> {
        let options: Options = config.general()?;

        // unix and windows behave like always; windows keeps CRLF for its fix
        let (require, line_break) = match options.value {
            Mode::Always => (true, "\n"),
            Mode::Never => (false, "\n"),
            Mode::Unix | Mode::Windows => {
                let name = if options.value == Mode::Unix { "unix" } else { "windows" };
                session.warn_once(
                    &format!("eol-last/{name}"),
                    &format!(
                        "eol-last option \"{name}\" is deprecated; use \"always\" with a linebreak-style rule"
                    ),
                );
                (true, if options.value == Mode::Windows { "\r\n" } else { "\n" })
            }
        };

        Ok(Box::new(EolLastChecker { require, line_break }))
    }
}

struct EolLastChecker {
    require: bool,
    line_break: &'static str,
}

impl Checker for EolLastChecker {
    fn check(&self, _node: Node<'_>, cx: &mut RuleContext<'_>) {
        let src = cx.source();
        if src.is_empty() {
            return;
        }
        let ends_with_newline = src.ends_with('\n');

        if self.require && !ends_with_newline {
            cx.report(
                Report::new("missing", Span::empty(src.len()))
                    .fix(Fix::insert(src.len(), self.line_break)),
            );
        } else if !self.require && ends_with_newline {
            let last_break = if src.ends_with("\r\n") {
                src.len() - 2
            } else {
                src.len() - 1
            };
            let fix = TRAILING_BREAKS
                .find(src)
                .map(|m| Fix::delete(Span::new(m.start(), src.len())));
            cx.report(Report::new("unexpected", Span::new(last_break, src.len())).maybe_fix(fix));
        }
    }
}
