//! Error types for stylefix
//!
//! This module defines the error types used throughout stylefix, following
//! a hierarchical structure with specific error variants for different
//! error categories. Edit conflicts are deliberately absent: a conflicting
//! fix is a normal outcome reported through the residual findings.

use std::path::PathBuf;

/// Configuration-related errors
///
/// Raised before any rule runs for the affected unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration syntax
    #[error("Invalid configuration syntax: {0}")]
    InvalidSyntax(String),

    /// Rule named in the configuration is not registered
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Option not declared by the rule's schema
    #[error("Unknown option '{option}' for rule '{rule}'")]
    UnknownOption { rule: String, option: String },

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Raw configuration whose shape matches none of the accepted forms
    #[error("Invalid configuration shape for rule '{rule}': {message}")]
    InvalidShape { rule: String, message: String },

    /// Configuration failed validation
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {message}")]
    Read { path: PathBuf, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidSyntax(err.to_string())
    }
}

/// Rule-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Two rules registered under the same identifier
    #[error("Duplicate rule ID '{0}'")]
    Duplicate(String),

    /// Rule not found
    #[error("Rule not found: {0}")]
    NotFound(String),
}

/// The parser collaborator could not build a syntax tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The grammar for the requested dialect is unavailable
    #[error("No grammar available for {0}")]
    UnsupportedDialect(String),

    /// The grammar could not be loaded into the parser
    #[error("Failed to load grammar: {0}")]
    Language(String),

    /// Parsing produced no tree at all
    #[error("Parser returned no tree")]
    NoTree,

    /// The source contains syntax errors
    #[error("Syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },
}

/// Top-level error type for stylefix
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// The unit could not be parsed on the given analysis pass
    #[error("Parse error on pass {pass}: {source}")]
    Parse {
        pass: usize,
        #[source]
        source: ParseError,
    },

    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StyleError {
    /// Returns true when the unit could not be parsed
    pub fn is_unparseable(&self) -> bool {
        matches!(self, StyleError::Parse { .. })
    }
}
