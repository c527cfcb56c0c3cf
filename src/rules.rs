#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod builtin;
pub mod fix;
pub mod registry;
mod rule;
pub mod style;

// Re-export core types
pub use fix::{Edit, Fix};
pub use registry::RuleRegistry;
pub use rule::{Checker, Finding, Report, Rule, RuleContext};
