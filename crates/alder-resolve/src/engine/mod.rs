//! The bounded fixpoint solver.
//!
//! One pass asks every pending rule instance for readiness and applies the
//! ready ones; an instance that applied or errored is retired. Because all
//! recorded knowledge is write-once or seal-once, readiness is monotonic
//! and each pass can only shrink the pending set.
//!
//! A pass that retires nothing consumes one retry; when the budget is
//! exhausted with instances still pending, the stall is reported. If
//! language diagnostics were appended they already explain it — some
//! declaration could never resolve and everything downstream of it kept
//! waiting. If the list is still empty, the engine itself is defective (a
//! missing rule, or a cycle no rule diagnosed) and exactly one internal
//! diagnostic is appended.
//!
//! The retry budget is an explicit [`SolverConfig`] parameter, never
//! ambient state, so the engine is reusable and testable in isolation.


use alder_ast::foundation::Span;
use alder_ast::{ClassId, Model};
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{Diagnostic, DiagnosticKind, DiagnosticList};
use crate::rules::{standard_rules, Rule, RuleOutcome};

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// How many zero-progress passes to tolerate before declaring a stall.
    pub inference_retries: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            inference_retries: 3,
        }
    }
}

/// What a solver run did.
#[derive(Debug, Clone, Copy)]
pub struct SolveReport {
    /// Number of passes executed
    pub passes: u32,
    /// Rule instances that applied their effect
    pub applied: usize,
    /// Rule instances that completed by reporting diagnostics
    pub errored: usize,
    /// Whether every instance retired before the budget ran out
    pub converged: bool,
}

/// Drives a rule set to fixpoint over a model.
pub struct Solver {
    rules: Vec<Box<dyn Rule>>,
    config: SolverConfig,
}

impl Solver {
    /// Create a solver over an explicit rule set.
    pub fn new(rules: Vec<Box<dyn Rule>>, config: SolverConfig) -> Self {
        Self { rules, config }
    }

    /// Create a solver over the standard rule set.
    pub fn standard(config: SolverConfig) -> Self {
        Self::new(standard_rules(), config)
    }

    /// Run every rule instance to fixpoint.
    ///
    /// Diagnostics are appended to `diagnostics` in discovery order. The
    /// report says whether the run converged; a non-converged run with an
    /// empty list gains exactly one internal diagnostic.
    #[instrument(skip_all, fields(rules = self.rules.len(), classes = model.class_count()))]
    pub fn run(&self, model: &mut Model, diagnostics: &mut DiagnosticList) -> SolveReport {
        let classes: Vec<ClassId> = model.classes().map(|(id, _)| id).collect();
        let mut pending: Vec<(usize, ClassId)> = Vec::new();
        for rule_idx in 0..self.rules.len() {
            for &class in &classes {
                pending.push((rule_idx, class));
            }
        }

        let mut retries_left = self.config.inference_retries;
        let mut passes = 0u32;
        let mut applied = 0usize;
        let mut errored = 0usize;

        let converged = loop {
            passes += 1;
            let mut progress = false;
            pending.retain(|&(rule_idx, class)| {
                let rule = &self.rules[rule_idx];
                match rule.attempt(class, model, diagnostics) {
                    RuleOutcome::NotReady => true,
                    RuleOutcome::Applied => {
                        debug!(rule = rule.name(), class = class.index(), "applied");
                        applied += 1;
                        progress = true;
                        false
                    }
                    RuleOutcome::Errored => {
                        debug!(rule = rule.name(), class = class.index(), "errored");
                        errored += 1;
                        progress = true;
                        false
                    }
                }
            });
            trace!(pass = passes, pending = pending.len(), progress, "pass complete");

            if pending.is_empty() {
                break true;
            }
            if !progress {
                if retries_left == 0 {
                    break false;
                }
                retries_left -= 1;
            }
        };

        if !converged {
            warn!(pending = pending.len(), passes, "resolution stalled");
            if diagnostics.is_empty() {
                let mut stalled: Vec<&'static str> = pending
                    .iter()
                    .map(|&(rule_idx, _)| self.rules[rule_idx].name())
                    .collect();
                stalled.dedup();
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::Internal,
                        // Engine-level: no source file to point at.
                        Span::new(u16::MAX, 0, 0, 1),
                        format!(
                            "resolution stalled with {} rule instance(s) neither ready nor \
                             failed after {} retries",
                            pending.len(),
                            self.config.inference_retries
                        ),
                    )
                    .with_note(format!("stalled rules: {}", stalled.join(", "))),
                );
            }
        }

        info!(passes, applied, errored, converged, "resolution complete");
        SolveReport {
            passes,
            applied,
            errored,
            converged,
        }
    }
}

/// Resolve a model with the standard rule set.
///
/// Returns the report when resolution converged with no diagnostics;
/// otherwise the accumulated diagnostic list.
pub fn resolve(model: &mut Model, config: SolverConfig) -> Result<SolveReport, DiagnosticList> {
    let solver = Solver::standard(config);
    let mut diagnostics = DiagnosticList::new();
    let report = solver.run(model, &mut diagnostics);
    if report.converged && diagnostics.is_empty() {
        Ok(report)
    } else {
        Err(diagnostics)
    }
}
