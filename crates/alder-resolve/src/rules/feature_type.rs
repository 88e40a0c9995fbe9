//! Feature entity-type inference.

use alder_ast::ast::feature::Feature;
use alder_ast::ast::types::{EntityType, Resolution, ResolvedType, TypeIdentifier, TypeName};
use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;
use crate::template::{OnceRefListTemplate, OnceRefTemplate, Readiness, SourceTemplate};

use super::{Rule, RuleOutcome};

type TypeOutcome = Resolution<(TypeName, ResolvedType)>;

/// The single declared type of a feature, where the kind has one.
fn single_declared(feature: &Feature) -> Option<&TypeIdentifier> {
    match feature {
        Feature::Attribute(f) => Some(&f.declared),
        Feature::Constant(f) => Some(&f.declared),
        Feature::Property(f) => Some(&f.declared),
        Feature::Indexer(f) => Some(&f.declared),
        Feature::Function(_) | Feature::Creation(_) | Feature::Procedure(_) => None,
    }
}

/// The overloaded result types of a function; empty for other kinds.
fn function_results(feature: &Feature) -> &[TypeIdentifier] {
    match feature {
        Feature::Function(f) => &f.results,
        _ => &[],
    }
}

fn resolved_cell(ident: &TypeIdentifier) -> Option<&alder_ast::foundation::OnceRef<TypeOutcome>> {
    Some(&ident.resolved)
}

/// Assigns each data-bearing feature's entity type from its resolved
/// declaration: the declared type for attributes, constants, properties
/// and indexers; the most common of the overloaded result types for
/// functions. Creation and procedure features have no entity type.
///
/// A feature whose declaration failed to resolve keeps its cell
/// unassigned — the failure was reported where it was found, and anything
/// gating on this feature stays pending, which is a language failure, not
/// an engine one.
pub struct FeatureTypeRule {
    declared: OnceRefTemplate<Feature, TypeIdentifier, TypeOutcome>,
    results: OnceRefListTemplate<Feature, TypeIdentifier, TypeOutcome>,
}

impl FeatureTypeRule {
    /// Construct the rule and its templates.
    pub fn new() -> Self {
        Self {
            declared: OnceRefTemplate::via(single_declared, resolved_cell),
            results: OnceRefListTemplate::new(function_results, resolved_cell),
        }
    }
}

impl Rule for FeatureTypeRule {
    fn name(&self) -> &'static str {
        "infer-feature-types"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        _diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: every feature's declaration must be resolved.
        let node = model.class(class);
        let mut planned: Vec<(usize, EntityType)> = Vec::new();
        for (feature_idx, feature) in node.features.iter().enumerate() {
            let entity = match feature {
                Feature::Function(function) => {
                    match self.results.is_ready(feature, model) {
                        Readiness::NotReady => return RuleOutcome::NotReady,
                        Readiness::Ready(outcomes) => {
                            let outcomes = outcomes.unwrap_or_default();
                            outcomes[function.most_common]
                                .known()
                                .map(|(_, ty)| EntityType::from_resolved(ty))
                        }
                    }
                }
                _ => match self.declared.is_ready(feature, model) {
                    Readiness::NotReady => return RuleOutcome::NotReady,
                    // Vacuous for the no-result kinds.
                    Readiness::Ready(None) => None,
                    Readiness::Ready(Some(outcome)) => outcome
                        .known()
                        .map(|(_, ty)| EntityType::from_resolved(ty)),
                },
            };
            if let Some(entity) = entity {
                planned.push((feature_idx, entity));
            }
        }

        // Effect: assign the inferred types.
        for (feature_idx, entity) in planned {
            model.class_mut(class).features[feature_idx]
                .entity_type_mut()
                .expect("planned features are data-bearing")
                .assign(entity);
        }
        RuleOutcome::Applied
    }
}
