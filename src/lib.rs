#![forbid(unsafe_code)]

//! Stylefix: style enforcement and auto-fixing for JavaScript, TypeScript and JSX
//!
//! Independently configurable rules report findings with optional fixes;
//! the engine applies non-conflicting fixes and re-analyzes until the
//! source stops changing or a round budget runs out.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod syntax;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, ParseError, RuleError, StyleError};

// Re-export core domain types for convenient access
pub use types::{Dialect, RuleId};

pub use engine::{CancelFlag, ConvergenceStatus, ExecutionEngine, LintOutcome};
pub use rules::{Finding, Fix, RuleRegistry};
