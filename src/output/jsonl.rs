#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All finding records (sorted by unit, then location, then rule)
//! 2. One status record per unit (sorted by unit)

use crate::engine::{ConvergenceStatus, UnitReport};
use serde::Serialize;

/// JSONL output formatter
///
/// Formats unit reports as JSON Lines (one JSON object per line).
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format the unit reports as JSONL
    pub fn format(&self, reports: &[UnitReport]) -> String {
        let mut sorted: Vec<&UnitReport> = reports.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut output = String::new();

        for report in &sorted {
            let Ok(outcome) = &report.result else {
                continue;
            };
            for finding in &outcome.findings {
                push_line(
                    &mut output,
                    &FindingRecord {
                        record_type: "finding",
                        unit: &report.name,
                        rule: finding.rule_id.as_str(),
                        message_id: &finding.message_id,
                        line: finding.location.start.line,
                        column: finding.location.start.column,
                        end_line: finding.location.end.line,
                        end_column: finding.location.end.column,
                        message: &finding.message,
                        fixable: finding.is_fixable(),
                    },
                );
            }
        }

        for report in &sorted {
            let record = match &report.result {
                Ok(outcome) => StatusRecord {
                    record_type: "status",
                    unit: &report.name,
                    status: status_name(outcome.status),
                    passes: outcome.passes.len(),
                    fixes_applied: outcome.passes.iter().map(|p| p.applied).sum(),
                    remaining: outcome.findings.len(),
                    error: None,
                },
                Err(e) => StatusRecord {
                    record_type: "status",
                    unit: &report.name,
                    status: "error",
                    passes: 0,
                    fixes_applied: 0,
                    remaining: 0,
                    error: Some(e.to_string()),
                },
            };
            push_line(&mut output, &record);
        }

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_name(status: ConvergenceStatus) -> &'static str {
    match status {
        ConvergenceStatus::Converged => "converged",
        ConvergenceStatus::CapExceeded => "cap_exceeded",
        ConvergenceStatus::Cancelled => "cancelled",
    }
}

fn push_line<T: Serialize>(output: &mut String, record: &T) {
    match serde_json::to_string(record) {
        Ok(json) => {
            output.push_str(&json);
            output.push('\n');
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize JSONL record"),
    }
}

/// Finding record for JSONL output
#[derive(Debug, Serialize)]
struct FindingRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    unit: &'a str,
    rule: &'a str,
    message_id: &'a str,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    message: &'a str,
    fixable: bool,
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    unit: &'a str,
    status: &'static str,
    passes: usize,
    fixes_applied: usize,
    remaining: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LintOutcome, PassStats};
    use crate::error::{ParseError, StyleError};
    use crate::rules::Finding;
    use crate::syntax::{LineIndex, Location};
    use crate::types::RuleId;
    use std::collections::BTreeMap;

    fn create_test_finding(rule_id: &str, source: &str, offset: usize, message: &str) -> Finding {
        let index = LineIndex::new(source);
        Finding {
            rule_id: RuleId::new(rule_id).unwrap(),
            message_id: "unexpected".to_string(),
            args: BTreeMap::new(),
            message: message.to_string(),
            location: Location {
                start: index.position(source, offset),
                end: index.position(source, offset + 1),
            },
            fix: None,
        }
    }

    fn create_test_report(name: &str, findings: Vec<Finding>, status: ConvergenceStatus) -> UnitReport {
        UnitReport {
            name: name.to_string(),
            result: Ok(LintOutcome {
                source: String::new(),
                findings,
                status,
                passes: vec![PassStats {
                    pass: 1,
                    findings: 0,
                    applied: 2,
                    conflicted: 0,
                    invalid: 0,
                }],
            }),
        }
    }

    #[test]
    fn test_format_empty_result() {
        let output = JsonlFormatter::new().format(&[]);
        assert!(output.is_empty());
    }

    #[test]
    fn test_format_single_finding() {
        let source = "a;\nb;;";
        let report = create_test_report(
            "src/b.js",
            vec![create_test_finding("no-extra-semi", source, 5, "Unnecessary semicolon.")],
            ConvergenceStatus::CapExceeded,
        );

        let output = JsonlFormatter::new().format(&[report]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let finding: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(finding["type"], "finding");
        assert_eq!(finding["unit"], "src/b.js");
        assert_eq!(finding["rule"], "no-extra-semi");
        assert_eq!(finding["line"], 2);
        assert_eq!(finding["column"], 3);
        assert_eq!(finding["fixable"], false);

        let status: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(status["type"], "status");
        assert_eq!(status["status"], "cap_exceeded");
        assert_eq!(status["fixes_applied"], 2);
        assert_eq!(status["remaining"], 1);
        assert!(status.get("error").is_none());
    }

    #[test]
    fn test_units_sorted_by_name() {
        let reports = vec![
            create_test_report("z.js", vec![], ConvergenceStatus::Converged),
            create_test_report("a.js", vec![], ConvergenceStatus::Converged),
        ];
        let output = JsonlFormatter::new().format(&reports);
        let units: Vec<String> = output
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["unit"].to_string())
            .collect();
        assert_eq!(units, vec!["\"a.js\"", "\"z.js\""]);
    }

    #[test]
    fn test_error_unit_status() {
        let report = UnitReport {
            name: "broken.js".to_string(),
            result: Err(StyleError::Parse {
                pass: 1,
                source: ParseError::Syntax { line: 1, column: 5 },
            }),
        };
        let output = JsonlFormatter::default().format(&[report]);
        let status: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(status["status"], "error");
        assert_eq!(status["error"], "Parse error on pass 1: Syntax error at 1:5");
    }

    #[test]
    fn test_json_validity() {
        let source = "x";
        let report = create_test_report(
            "quote\"d.js",
            vec![create_test_finding("eol-last", source, 0, "Newline \"required\".")],
            ConvergenceStatus::Converged,
        );
        let output = JsonlFormatter::new().format(&[report]);
        for line in output.lines() {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }
}
