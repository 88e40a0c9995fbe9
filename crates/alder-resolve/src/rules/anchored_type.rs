//! Anchored type resolution.

use alder_ast::ast::types::Resolution;
use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;
use crate::template::{AnchoredPathTemplate, PathResolution, Readiness, SourceTemplate};

use super::{Rule, RuleOutcome};

/// Resolves every anchored type declaration of a class by walking its
/// dotted chain through the feature tables. A walk that produced
/// diagnostics is terminal: the diagnostics are reported once and the
/// anchor is marked failed, never retried.
pub struct AnchoredTypeRule {
    template: AnchoredPathTemplate,
}

impl AnchoredTypeRule {
    /// Construct the rule.
    pub fn new() -> Self {
        Self {
            template: AnchoredPathTemplate,
        }
    }
}

impl Rule for AnchoredTypeRule {
    fn name(&self) -> &'static str {
        "resolve-anchored-types"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: every anchor's walk must run to completion.
        let node = model.class(class);
        let mut planned: Vec<(usize, PathResolution)> = Vec::new();
        for (anchor_idx, anchor) in node.anchored_types.iter().enumerate() {
            match self.template.is_ready(&(node, &anchor.path), model) {
                Readiness::NotReady => return RuleOutcome::NotReady,
                Readiness::Ready(Some(resolution)) => planned.push((anchor_idx, resolution)),
                Readiness::Ready(None) => {}
            }
        }

        // Effect: record outcomes and report walk diagnostics.
        let mut errored = false;
        for (anchor_idx, resolution) in planned {
            for diagnostic in resolution.diagnostics {
                diagnostics.push(diagnostic);
                errored = true;
            }
            let outcome = match resolution.resolved {
                Some((_, entity)) => Resolution::Known(entity),
                None => Resolution::Failed,
            };
            model.class_mut(class).anchored_types[anchor_idx]
                .resolved
                .assign(outcome);
        }
        if errored {
            RuleOutcome::Errored
        } else {
            RuleOutcome::Applied
        }
    }
}
