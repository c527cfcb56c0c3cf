#![forbid(unsafe_code)]

//! Text edits proposed by rules

use crate::syntax::Span;
use serde::Serialize;

/// Replace `start..end` of a source snapshot with `replacement`
///
/// `start == end` is an insertion and an empty replacement is a deletion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Edit {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Edit::replace(Span::empty(offset), text)
    }

    pub fn delete(span: Span) -> Self {
        Edit::replace(span, "")
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// Whether two edits of one snapshot cannot both be applied
    ///
    /// Ranges conflict when they share at least one byte. An insertion
    /// conflicts with a range only when strictly inside it, and with any
    /// other insertion at the same offset. Touching ranges do not conflict.
    pub fn overlaps(&self, other: &Edit) -> bool {
        match (self.is_insertion(), other.is_insertion()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

/// All-or-nothing group of edits over one snapshot
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fix {
    edits: Vec<Edit>,
}

impl Fix {
    /// Builds a fix, ordering its edits by start offset
    pub fn new(mut edits: Vec<Edit>) -> Self {
        edits.sort();
        Fix { edits }
    }

    pub fn single(edit: Edit) -> Self {
        Fix { edits: vec![edit] }
    }

    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Fix::single(Edit::replace(span, replacement))
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Fix::single(Edit::insert(offset, text))
    }

    pub fn delete(span: Span) -> Self {
        Fix::single(Edit::delete(span))
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Checks the fix against a source snapshot
    ///
    /// Returns a description of the first problem found: an edit out of
    /// range, off a character boundary, or overlapping a sibling edit.
    pub fn validate(&self, source: &str) -> Result<(), String> {
        if self.edits.is_empty() {
            return Err("fix has no edits".to_string());
        }
        for edit in &self.edits {
            if edit.start > edit.end || edit.end > source.len() {
                return Err(format!(
                    "edit {}..{} outside source of length {}",
                    edit.start,
                    edit.end,
                    source.len()
                ));
            }
            if !source.is_char_boundary(edit.start) || !source.is_char_boundary(edit.end) {
                return Err(format!(
                    "edit {}..{} is not on a character boundary",
                    edit.start, edit.end
                ));
            }
        }
        for (idx, pair) in self.edits.windows(2).enumerate() {
            if pair[0].start > pair[1].start {
                return Err(format!("edit {} is out of order", idx + 1));
            }
        }
        for (idx, edit) in self.edits.iter().enumerate() {
            if self.edits[idx + 1..].iter().any(|other| edit.overlaps(other)) {
                return Err(format!(
                    "edit {}..{} overlaps another edit of the same fix",
                    edit.start, edit.end
                ));
            }
        }
        Ok(())
    }
}
