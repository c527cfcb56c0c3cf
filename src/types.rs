#![forbid(unsafe_code)]

//! Core domain types for stylefix
//!
//! This module defines the small value types shared by every layer of the
//! engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only lowercase ASCII letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty, starts or ends with a hyphen,
    /// or contains characters outside `[a-z0-9-]`
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() || id.starts_with('-') || id.ends_with('-') {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return None;
        }
        Some(RuleId(id))
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value.clone()).ok_or_else(|| format!("Invalid rule ID '{value}'"))
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// Syntax dialect flags handed to the parser collaborator
///
/// The parse of a unit is a pure function of its text and these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dialect {
    /// Static-typing superset (TypeScript)
    #[serde(default)]
    pub typescript: bool,

    /// UI-templating extension (JSX)
    #[serde(default = "default_jsx")]
    pub jsx: bool,
}

fn default_jsx() -> bool {
    true
}

impl Dialect {
    /// Plain JavaScript with JSX enabled
    pub const JAVASCRIPT: Dialect = Dialect {
        typescript: false,
        jsx: true,
    };

    /// TypeScript without JSX
    pub const TYPESCRIPT: Dialect = Dialect {
        typescript: true,
        jsx: false,
    };

    /// TypeScript with JSX
    pub const TSX: Dialect = Dialect {
        typescript: true,
        jsx: true,
    };
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::JAVASCRIPT
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.typescript, self.jsx) {
            (false, _) => "javascript",
            (true, false) => "typescript",
            (true, true) => "tsx",
        };
        f.write_str(name)
    }
}
