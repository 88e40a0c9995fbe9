//! Inheritance flattening.

use std::collections::HashSet;

use alder_ast::{ClassId, FeatureRef, Model};

use crate::error::{Diagnostic, DiagnosticKind, DiagnosticList};

use super::{Rule, RuleOutcome};

/// Builds and seals a class's flattened feature table: the parents'
/// flattened entries followed by the local entries, local names overriding
/// inherited ones. Entries are [`FeatureRef`]s into the declaring class,
/// so an inherited feature shares its resolution state everywhere it is
/// visible.
///
/// Cyclic inheritance would leave every class on the cycle waiting for the
/// others forever, so the rule checks the (static, already sealed) parents
/// graph first and reports the cycle as a terminal diagnostic instead of
/// stalling into the retry guard.
pub struct InheritanceRule;

enum ParentsGraph {
    /// Some parents list on the walk is not sealed yet
    Unsealed,
    /// The class inherits from itself, directly or transitively
    Cyclic,
    Acyclic,
}

fn check_parents_graph(start: ClassId, model: &Model) -> ParentsGraph {
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        let parents = &model.class(current).parents;
        if !parents.is_sealed() {
            return ParentsGraph::Unsealed;
        }
        for &parent in parents.iter() {
            if parent == start {
                return ParentsGraph::Cyclic;
            }
            if visited.insert(parent) {
                stack.push(parent);
            }
        }
    }
    ParentsGraph::Acyclic
}

impl Rule for InheritanceRule {
    fn name(&self) -> &'static str {
        "flatten-inheritance"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        let node = model.class(class);
        if !node.parents.is_sealed() || !node.local_feature_table.is_sealed() {
            return RuleOutcome::NotReady;
        }

        match check_parents_graph(class, model) {
            ParentsGraph::Unsealed => return RuleOutcome::NotReady,
            ParentsGraph::Cyclic => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::CyclicDependency,
                    node.span,
                    format!("class '{}' inherits from itself", node.name.text),
                ));
                return RuleOutcome::Errored;
            }
            ParentsGraph::Acyclic => {}
        }

        for &parent in node.parents.iter() {
            if !model.class(parent).feature_table.is_sealed() {
                return RuleOutcome::NotReady;
            }
        }

        let mut entries: Vec<(String, FeatureRef)> = Vec::new();
        for &parent in node.parents.iter() {
            for (name, &fref) in model.class(parent).feature_table.iter() {
                entries.push((name.clone(), fref));
            }
        }
        for (name, &fref) in node.local_feature_table.iter() {
            entries.push((name.clone(), fref));
        }

        let node = model.class_mut(class);
        for (name, fref) in entries {
            // Later inserts replace earlier ones, so a local redefinition
            // overrides the inherited entry.
            node.feature_table.insert(name, fref);
        }
        node.feature_table.seal();
        RuleOutcome::Applied
    }
}
