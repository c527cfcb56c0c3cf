//! Analysis passes, fix application and the convergence loop

pub mod convergence;
pub mod executor;
pub mod fixer;
pub mod pass;
pub mod session;

pub use convergence::{
    CancelFlag, ConvergenceLoop, ConvergenceStatus, DEFAULT_MAX_PASSES, LintOutcome, PassStats,
};
pub use executor::{ExecutionEngine, SourceUnit, UnitReport};
pub use fixer::{FixOutcome, apply_fixes};
pub use pass::{AnalysisPass, ConfiguredRule, analyze, configure_rules};
pub use session::Session;
