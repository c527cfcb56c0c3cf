#![forbid(unsafe_code)]

//! Conflict-free application of the fixes of one pass
//!
//! Selection is greedy and all-or-nothing per fix: fixes are considered in
//! order of their edit ranges, and a fix is accepted only when none of its
//! edits overlaps an already accepted edit. Accepted edits are spliced into
//! the snapshot in a single forward sweep; every offset refers to the
//! snapshot the findings were computed on.

use crate::rules::{Edit, Finding, Fix};
use std::collections::BTreeMap;

/// What one application round did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixOutcome {
    /// The rewritten source
    pub source: String,
    /// Indices of findings whose fix was applied
    pub applied: Vec<usize>,
    /// Indices of findings whose fix lost to an overlapping fix
    pub conflicted: Vec<usize>,
    /// Indices of findings whose fix was malformed and ignored
    pub invalid: Vec<usize>,
    /// Number of edits spliced into the source
    pub edits_applied: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.edits_applied > 0
    }
}

/// Accepted edits indexed by start offset
#[derive(Debug, Default)]
struct AcceptedEdits {
    by_start: BTreeMap<usize, Vec<Edit>>,
    len: usize,
}

impl AcceptedEdits {
    fn conflicts(&self, edit: &Edit) -> bool {
        // accepted edits are disjoint, so only the nearest group that starts
        // before `edit` can still reach into it
        for (&start, group) in self.by_start.range(..=edit.end).rev() {
            if group.iter().any(|accepted| accepted.overlaps(edit)) {
                return true;
            }
            if start < edit.start {
                break;
            }
        }
        false
    }

    fn accepts(&self, fix: &Fix) -> bool {
        fix.edits().iter().all(|edit| !self.conflicts(edit))
    }

    fn insert(&mut self, fix: &Fix) {
        for edit in fix.edits() {
            self.by_start.entry(edit.start).or_default().push(edit.clone());
            self.len += 1;
        }
    }

    /// Edits in splice order: by start, insertions before ranges at one offset
    fn into_ordered(self) -> Vec<Edit> {
        self.by_start
            .into_values()
            .flat_map(|mut group| {
                group.sort_by_key(|edit| edit.end);
                group
            })
            .collect()
    }
}

/// Applies the fixes of `findings` to `source`
///
/// Findings without a fix are ignored. A fix that fails validation against
/// `source` is treated as absent and logged.
pub fn apply_fixes(source: &str, findings: &[Finding]) -> FixOutcome {
    let mut invalid = Vec::new();
    let mut candidates: Vec<(usize, &Fix)> = Vec::new();

    for (idx, finding) in findings.iter().enumerate() {
        let Some(fix) = &finding.fix else {
            continue;
        };
        match fix.validate(source) {
            Ok(()) => candidates.push((idx, fix)),
            Err(reason) => {
                tracing::warn!(
                    rule = %finding.rule_id,
                    line = finding.location.start.line,
                    column = finding.location.start.column,
                    %reason,
                    "ignoring invalid fix"
                );
                invalid.push(idx);
            }
        }
    }

    // stable: identical fixes keep finding order
    candidates.sort_by(|(_, a), (_, b)| a.cmp(b));

    let mut accepted = AcceptedEdits::default();
    let mut applied = Vec::new();
    let mut conflicted = Vec::new();
    for (idx, fix) in candidates {
        if accepted.accepts(fix) {
            accepted.insert(fix);
            applied.push(idx);
        } else {
            conflicted.push(idx);
        }
    }
    applied.sort_unstable();
    conflicted.sort_unstable();

    let edits_applied = accepted.len;
    let new_source = splice(source, &accepted.into_ordered());

    tracing::debug!(
        applied = applied.len(),
        conflicted = conflicted.len(),
        invalid = invalid.len(),
        edits = edits_applied,
        "fix round complete"
    );

    FixOutcome {
        source: new_source,
        applied,
        conflicted,
        invalid,
        edits_applied,
    }
}

/// Splices ordered, mutually non-overlapping edits into `source`
fn splice(source: &str, edits: &[Edit]) -> String {
    let growth: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(source.len() + growth);
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LineIndex, Location, Span};
    use crate::types::RuleId;
    use std::collections::BTreeMap;

    fn finding(source: &str, rule: &str, fix: Option<Fix>) -> Finding {
        let index = LineIndex::new(source);
        Finding {
            rule_id: RuleId::new(rule).unwrap(),
            message_id: "m".to_string(),
            args: BTreeMap::new(),
            message: "m".to_string(),
            location: Location {
                start: index.position(source, 0),
                end: index.position(source, 0),
            },
            fix,
        }
    }

    #[test]
    fn test_single_deletion() {
        let source = "var x = 5;;";
        let findings = vec![finding(source, "a", Some(Fix::delete(Span::new(10, 11))))];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "var x = 5;");
        assert_eq!(outcome.applied, vec![0]);
        assert_eq!(outcome.edits_applied, 1);
    }

    #[test]
    fn test_overlapping_fix_is_conflicted() {
        let source = "abcdef";
        let findings = vec![
            finding(source, "a", Some(Fix::replace(Span::new(1, 4), "X"))),
            finding(source, "b", Some(Fix::replace(Span::new(3, 5), "Y"))),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "aXef");
        assert_eq!(outcome.applied, vec![0]);
        assert_eq!(outcome.conflicted, vec![1]);
    }

    #[test]
    fn test_selection_ignores_emission_order() {
        let source = "abcdef";
        let early = Fix::replace(Span::new(1, 4), "X");
        let late = Fix::replace(Span::new(3, 5), "Y");
        let forward = apply_fixes(
            source,
            &[
                finding(source, "a", Some(early.clone())),
                finding(source, "b", Some(late.clone())),
            ],
        );
        let backward = apply_fixes(
            source,
            &[finding(source, "b", Some(late)), finding(source, "a", Some(early))],
        );
        assert_eq!(forward.source, backward.source);
    }

    #[test]
    fn test_multi_edit_fix_is_all_or_nothing() {
        let source = "0123456789";
        let multi = Fix::new(vec![
            Edit::replace(Span::new(1, 2), "a"),
            Edit::replace(Span::new(6, 8), "b"),
        ]);
        let blocker = Fix::replace(Span::new(0, 2), "Z");
        let findings = vec![
            finding(source, "a", Some(multi)),
            finding(source, "b", Some(blocker)),
        ];
        let outcome = apply_fixes(source, &findings);
        // the blocker sorts first and wins; no edit of the multi-edit fix lands
        assert_eq!(outcome.source, "Z23456789");
        assert_eq!(outcome.conflicted, vec![0]);
    }

    #[test]
    fn test_touching_edits_both_apply() {
        let source = "abcd";
        let findings = vec![
            finding(source, "a", Some(Fix::replace(Span::new(0, 2), "X"))),
            finding(source, "b", Some(Fix::replace(Span::new(2, 4), "Y"))),
            finding(source, "c", Some(Fix::insert(4, "!"))),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "XY!");
        assert_eq!(outcome.applied, vec![0, 1, 2]);
    }

    #[test]
    fn test_same_offset_insertions() {
        let source = "ab";
        let findings = vec![
            finding(source, "a", Some(Fix::insert(1, "x"))),
            finding(source, "b", Some(Fix::insert(1, "y"))),
            finding(source, "c", Some(Fix::insert(1, "x"))),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "axb");
        assert_eq!(outcome.applied, vec![0]);
        assert_eq!(outcome.conflicted, vec![1, 2]);
    }

    #[test]
    fn test_insertion_inside_range_conflicts() {
        let source = "abcdef";
        let findings = vec![
            finding(source, "a", Some(Fix::delete(Span::new(1, 5)))),
            finding(source, "b", Some(Fix::insert(3, "!"))),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "af");
        assert_eq!(outcome.conflicted, vec![1]);
    }

    #[test]
    fn test_insertion_before_range_at_same_offset() {
        let source = "abc";
        let findings = vec![
            finding(source, "a", Some(Fix::replace(Span::new(1, 2), "B"))),
            finding(source, "b", Some(Fix::insert(1, "^"))),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "a^Bc");
    }

    #[test]
    fn test_invalid_fix_dropped_without_affecting_others() {
        let source = "abc";
        let findings = vec![
            finding(source, "a", Some(Fix::delete(Span::new(2, 99)))),
            finding(source, "b", Some(Fix::delete(Span::new(0, 1)))),
            finding(source, "c", None),
        ];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "bc");
        assert_eq!(outcome.invalid, vec![0]);
        assert_eq!(outcome.applied, vec![1]);
        assert!(outcome.conflicted.is_empty());
    }

    #[test]
    fn test_no_fixes_leaves_source_untouched() {
        let source = "let a = 1;";
        let outcome = apply_fixes(source, &[finding(source, "a", None)]);
        assert_eq!(outcome.source, source);
        assert!(!outcome.changed());
    }

    #[test]
    fn test_multibyte_source() {
        let source = "é,é";
        let findings = vec![finding(source, "a", Some(Fix::insert(3, " ")))];
        let outcome = apply_fixes(source, &findings);
        assert_eq!(outcome.source, "é, é");
    }
}
