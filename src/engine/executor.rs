#![forbid(unsafe_code)]

//! Execution engine for running the rule set over source units
//!
//! This module provides the ExecutionEngine which ties the registry, the
//! resolved rule options, the parser collaborator and the convergence loop
//! together. Independent units are processed in parallel using rayon.

use crate::config::{Config, RuleSet};
use crate::engine::convergence::{CancelFlag, ConvergenceLoop, LintOutcome};
use crate::engine::pass::{ConfiguredRule, analyze, configure_rules};
use crate::engine::session::Session;
use crate::error::StyleError;
use crate::rules::{Finding, RuleRegistry};
use crate::syntax::{SourceParser, TreeSitterParser};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// One independent piece of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Display name, typically a path
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Outcome of one unit of a batch run
#[derive(Debug)]
pub struct UnitReport {
    pub name: String,
    pub result: Result<LintOutcome, StyleError>,
}

/// Execution engine that drives the convergence loop per unit
///
/// The engine:
/// - Configures every enabled rule once per unit, with a fresh session
/// - Runs a single analysis (`lint`) or the full fix loop (`fix`)
/// - Processes batches of units in parallel with no shared mutable state
pub struct ExecutionEngine {
    registry: Arc<RuleRegistry>,
    rule_set: RuleSet,
    parser: Arc<dyn SourceParser>,
    convergence: ConvergenceLoop,
}

impl ExecutionEngine {
    /// Creates a new ExecutionEngine
    ///
    /// # Arguments
    ///
    /// * `registry` - The rule registry the rule set refers to
    /// * `rule_set` - Enabled rules with normalized options
    /// * `parser` - The parser collaborator
    pub fn new(registry: RuleRegistry, rule_set: RuleSet, parser: Arc<dyn SourceParser>) -> Self {
        Self {
            registry: Arc::new(registry),
            rule_set,
            parser,
            convergence: ConvergenceLoop::default(),
        }
    }

    /// Builds an engine from a parsed configuration file
    ///
    /// # Errors
    ///
    /// Returns `StyleError::Config` if a rule is unknown or misconfigured, and
    /// `StyleError::Parse` if no grammar exists for the configured dialect.
    pub fn from_config(config: &Config, registry: RuleRegistry) -> Result<Self, StyleError> {
        let rule_set = config.resolve(&registry)?;
        let parser = TreeSitterParser::new(config.engine.dialect())
            .map_err(|source| StyleError::Parse { pass: 0, source })?;
        Ok(Self::new(registry, rule_set, Arc::new(parser)).with_max_passes(config.engine.max_passes))
    }

    /// Sets the bound on fix rounds per unit
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.convergence = ConvergenceLoop::new(max_passes);
        self
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn prepare(&self) -> Result<Vec<ConfiguredRule>, StyleError> {
        let mut session = Session::new();
        Ok(configure_rules(&self.registry, &self.rule_set, &mut session)?)
    }

    /// Analyzes `source` once without fixing
    pub fn lint(&self, source: &str) -> Result<Vec<Finding>, StyleError> {
        let rules = self.prepare()?;
        Ok(analyze(self.parser.as_ref(), &rules, source, 1)?.findings)
    }

    /// Fixes `source` until it converges or the round budget runs out
    pub fn fix(&self, source: &str) -> Result<LintOutcome, StyleError> {
        self.fix_with_cancel(source, &CancelFlag::new())
    }

    /// Like [`ExecutionEngine::fix`], observing `cancel` between loop states
    pub fn fix_with_cancel(
        &self,
        source: &str,
        cancel: &CancelFlag,
    ) -> Result<LintOutcome, StyleError> {
        let rules = self.prepare()?;
        self.convergence
            .run(self.parser.as_ref(), &rules, source, cancel)
    }

    /// Reads and fixes one file; the file itself is not rewritten
    pub fn fix_path(&self, path: &Path) -> Result<LintOutcome, StyleError> {
        let source = fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.fix(&source)
    }

    /// Fixes independent units in parallel
    ///
    /// Reports come back in input order. Each unit gets its own session and
    /// loop state.
    pub fn fix_units(&self, units: &[SourceUnit]) -> Vec<UnitReport> {
        units
            .par_iter()
            .map(|unit| {
                let result = self.fix(&unit.source);
                if let Err(e) = &result {
                    tracing::warn!(unit = %unit.name, error = %e, "unit failed");
                }
                UnitReport {
                    name: unit.name.clone(),
                    result,
                }
            })
            .collect()
    }
}
