#![forbid(unsafe_code)]

//! Iterative analyze/fix loop for one unit
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Analyzing --(applicable fixes, budget left)--> Applying
//! Applying  --(>= 1 edit applied)--------------> Analyzing
//! Analyzing --(nothing applicable)-------------> Done(Converged)
//! Analyzing --(applicable fixes, no budget)----> Done(CapExceeded)
//! Applying  --(no edit applied)----------------> Done(Converged)
//! ```
//!
//! Cancellation is honoured only between states, so the outcome always
//! pairs a source with the findings computed on exactly that source.

use crate::engine::fixer::apply_fixes;
use crate::engine::pass::{AnalysisPass, ConfiguredRule, analyze};
use crate::error::StyleError;
use crate::rules::Finding;
use crate::syntax::SourceParser;
use serde::Serialize;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default bound on the number of fix rounds per unit
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Cooperative cancellation shared with whoever drives the loop
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a unit run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// No further fix could change the source
    Converged,
    /// The fix-round budget ran out while fixes were still applicable
    CapExceeded,
    /// The caller cancelled the run
    Cancelled,
}

/// Counters of one analysis pass and the fix round that followed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassStats {
    pub pass: usize,
    pub findings: usize,
    pub applied: usize,
    pub conflicted: usize,
    pub invalid: usize,
}

/// Final state of a unit run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintOutcome {
    /// The final source
    pub source: String,
    /// Every finding of the last analysis, relative to `source`
    pub findings: Vec<Finding>,
    pub status: ConvergenceStatus,
    pub passes: Vec<PassStats>,
}

impl LintOutcome {
    /// Converged with nothing left to report
    pub fn is_clean(&self) -> bool {
        self.status == ConvergenceStatus::Converged && self.findings.is_empty()
    }

    pub fn fixable_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_fixable()).count()
    }

    /// Number of fix rounds that changed the source
    pub fn rounds(&self) -> usize {
        self.passes.iter().filter(|p| p.applied > 0).count()
    }
}

enum LoopState {
    Analyzing(String),
    Applying(AnalysisPass),
    Done(LintOutcome),
}

/// Drives the analyze/fix state machine
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceLoop {
    max_passes: usize,
}

impl Default for ConvergenceLoop {
    fn default() -> Self {
        ConvergenceLoop::new(DEFAULT_MAX_PASSES)
    }
}

impl ConvergenceLoop {
    /// `max_passes` bounds the fix rounds; at most `max_passes + 1` analyses run
    pub fn new(max_passes: usize) -> Self {
        ConvergenceLoop { max_passes }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Runs the loop on `source` until it converges, exceeds the cap or is cancelled
    ///
    /// # Errors
    ///
    /// Returns `StyleError::Parse` when any snapshot, including one produced
    /// by a fix round, fails to parse.
    pub fn run(
        &self,
        parser: &dyn SourceParser,
        rules: &[ConfiguredRule],
        source: &str,
        cancel: &CancelFlag,
    ) -> Result<LintOutcome, StyleError> {
        let mut passes: Vec<PassStats> = Vec::new();
        let mut rounds = 0;
        let mut state = LoopState::Analyzing(source.to_string());

        loop {
            state = match state {
                LoopState::Analyzing(snapshot) => {
                    let pass = analyze(parser, rules, &snapshot, passes.len() + 1)?;
                    passes.push(PassStats {
                        pass: pass.number,
                        findings: pass.findings.len(),
                        ..PassStats::default()
                    });

                    if !pass.has_applicable_fix() {
                        LoopState::Done(finish(
                            pass,
                            ConvergenceStatus::Converged,
                            mem::take(&mut passes),
                        ))
                    } else if rounds >= self.max_passes {
                        tracing::debug!(rounds, "fix round budget exhausted");
                        LoopState::Done(finish(
                            pass,
                            ConvergenceStatus::CapExceeded,
                            mem::take(&mut passes),
                        ))
                    } else if cancel.is_cancelled() {
                        LoopState::Done(finish(
                            pass,
                            ConvergenceStatus::Cancelled,
                            mem::take(&mut passes),
                        ))
                    } else {
                        LoopState::Applying(pass)
                    }
                }
                LoopState::Applying(pass) => {
                    let outcome = apply_fixes(pass.source(), &pass.findings);
                    rounds += 1;
                    if let Some(stats) = passes.last_mut() {
                        stats.applied = outcome.applied.len();
                        stats.conflicted = outcome.conflicted.len();
                        stats.invalid = outcome.invalid.len();
                    }

                    if !outcome.changed() {
                        LoopState::Done(finish(
                            pass,
                            ConvergenceStatus::Converged,
                            mem::take(&mut passes),
                        ))
                    } else if cancel.is_cancelled() {
                        // the rewritten source was never analyzed
                        LoopState::Done(finish(
                            pass,
                            ConvergenceStatus::Cancelled,
                            mem::take(&mut passes),
                        ))
                    } else {
                        LoopState::Analyzing(outcome.source)
                    }
                }
                LoopState::Done(outcome) => {
                    tracing::debug!(
                        status = ?outcome.status,
                        passes = outcome.passes.len(),
                        residual = outcome.findings.len(),
                        "unit run finished"
                    );
                    return Ok(outcome);
                }
            };
        }
    }
}

fn finish(pass: AnalysisPass, status: ConvergenceStatus, passes: Vec<PassStats>) -> LintOutcome {
    let source = pass.source().to_string();
    LintOutcome {
        source,
        findings: pass.findings,
        status,
        passes,
    }
}
