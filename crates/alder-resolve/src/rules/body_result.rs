//! Body result inference.

use alder_ast::ast::feature::{Body, Feature, FunctionFeature, Local, PropertyFeature};
use alder_ast::ast::types::{EntityType, TypeName};
use alder_ast::foundation::OnceRef;
use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;
use crate::template::{
    OnceRefTemplate, Readiness, SealedTableListTemplate, SourceTemplate,
};

use super::{Rule, RuleOutcome};

/// The embedding property feature, for nodes inside a property.
fn embedding_property(feature: &Feature) -> Option<&PropertyFeature> {
    match feature {
        Feature::Property(f) => Some(f),
        _ => None,
    }
}

/// The nearest declaration carrying a declared result, for nodes inside a
/// function.
fn result_bearer(feature: &Feature) -> Option<&FunctionFeature> {
    match feature {
        Feature::Function(f) => Some(f),
        _ => None,
    }
}

fn property_entity_type(property: &PropertyFeature) -> Option<&OnceRef<EntityType>> {
    Some(&property.entity_type)
}

fn function_entity_type(function: &FunctionFeature) -> Option<&OnceRef<EntityType>> {
    Some(&function.entity_type)
}

fn bodies(feature: &Feature) -> Vec<&Body> {
    feature.bodies()
}

fn body_locals(body: &Body) -> &alder_ast::foundation::SealableMap<String, Local> {
    &body.locals
}

/// Assigns each body's result type from the entity type of its embedding
/// feature: the property for getter/setter bodies, the function for
/// function bodies. Features that embed no body, and kinds that bear no
/// result, satisfy the rule vacuously.
pub struct BodyResultRule {
    property_type: OnceRefTemplate<Feature, PropertyFeature, EntityType>,
    function_type: OnceRefTemplate<Feature, FunctionFeature, EntityType>,
    locals: SealedTableListTemplate<Feature, Body, String, Local>,
}

impl BodyResultRule {
    /// Construct the rule and its templates.
    pub fn new() -> Self {
        Self {
            property_type: OnceRefTemplate::via(embedding_property, property_entity_type),
            function_type: OnceRefTemplate::via(result_bearer, function_entity_type),
            locals: SealedTableListTemplate::new(bodies, body_locals),
        }
    }
}

impl Rule for BodyResultRule {
    fn name(&self) -> &'static str {
        "infer-body-results"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        _diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: every body's locals must be sealed and its embedding
        // feature's type known.
        let node = model.class(class);
        let mut planned: Vec<(usize, TypeName)> = Vec::new();
        for (feature_idx, feature) in node.features.iter().enumerate() {
            if let Readiness::NotReady = self.locals.is_ready(feature, model) {
                return RuleOutcome::NotReady;
            }
            if feature.bodies().is_empty() {
                continue;
            }
            let property = self.property_type.is_ready(feature, model);
            let function = self.function_type.is_ready(feature, model);
            let entity = match (property, function) {
                (Readiness::NotReady, _) | (_, Readiness::NotReady) => {
                    return RuleOutcome::NotReady;
                }
                (Readiness::Ready(Some(entity)), _) | (_, Readiness::Ready(Some(entity))) => {
                    Some(entity)
                }
                // No result-bearing embedding: nothing to infer.
                (Readiness::Ready(None), Readiness::Ready(None)) => None,
            };
            if let Some(entity) = entity {
                planned.push((feature_idx, entity.name));
            }
        }

        // Effect: record each body's result type.
        for (feature_idx, name) in planned {
            for body in model.class_mut(class).features[feature_idx].bodies_mut() {
                body.result.assign(name.clone());
            }
        }
        RuleOutcome::Applied
    }
}
