//! Resolved feature-type summary.

use alder_ast::ast::class::{Class, Discrete};
use alder_ast::ast::expr::{Expression, ManifestValue};
use alder_ast::ast::feature::{Feature, OptionalBody};
use alder_ast::ast::types::{EntityType, Resolution, TypeName};
use alder_ast::foundation::OnceRef;
use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;
use crate::template::{
    ConditionalOnceRefTemplate, OnceRefListTemplate, OnceRefTableTemplate, OnceRefTemplate,
    Readiness, SourceTemplate,
};

use super::{Rule, RuleOutcome};

type ValueOutcome = Resolution<ManifestValue>;

fn features(class: &Class) -> &[Feature] {
    &class.features
}

fn entity_type_cell(feature: &Feature) -> Option<&OnceRef<EntityType>> {
    feature.entity_type()
}

fn attribute_default(feature: &Feature) -> Option<&OptionalBody<Expression>> {
    match feature {
        Feature::Attribute(f) => Some(&f.default),
        _ => None,
    }
}

fn constant_literal(feature: &Feature) -> Option<&Expression> {
    match feature {
        Feature::Constant(f) => Some(&f.literal),
        _ => None,
    }
}

fn expression_value(expr: &Expression) -> Option<&OnceRef<ValueOutcome>> {
    Some(&expr.value)
}

fn expression_value_cell(expr: &Expression) -> &OnceRef<ValueOutcome> {
    &expr.value
}

fn discrete_table(class: &Class) -> &alder_ast::foundation::SealableMap<String, Discrete> {
    &class.discrete_table
}

fn discrete_value(discrete: &Discrete) -> Option<&OnceRef<ValueOutcome>> {
    Some(&discrete.literal.value)
}

/// Builds and seals the class's resolved-feature-type summary once every
/// locally declared feature is fully known: entity types assigned,
/// constant values validated, attribute defaults (when declared)
/// validated, discrete values validated.
pub struct ClassFeatureTableRule {
    entity_types: OnceRefListTemplate<Class, Feature, EntityType>,
    constants: OnceRefTemplate<Feature, Expression, ValueOutcome>,
    defaults: ConditionalOnceRefTemplate<Feature, Expression, ValueOutcome>,
    discretes: OnceRefTableTemplate<Class, String, Discrete, ValueOutcome>,
}

impl ClassFeatureTableRule {
    /// Construct the rule and its templates.
    pub fn new() -> Self {
        Self {
            entity_types: OnceRefListTemplate::new(features, entity_type_cell),
            constants: OnceRefTemplate::via(constant_literal, expression_value),
            defaults: ConditionalOnceRefTemplate::new(attribute_default, expression_value_cell),
            discretes: OnceRefTableTemplate::new(discrete_table, discrete_value),
        }
    }
}

impl Rule for ClassFeatureTableRule {
    fn name(&self) -> &'static str {
        "summarize-feature-types"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        _diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: every constituent fact must be final.
        let node = model.class(class);
        if !node.local_feature_table.is_sealed() {
            return RuleOutcome::NotReady;
        }
        if let Readiness::NotReady = self.entity_types.is_ready(node, model) {
            return RuleOutcome::NotReady;
        }
        if let Readiness::NotReady = self.discretes.is_ready(node, model) {
            return RuleOutcome::NotReady;
        }
        for feature in &node.features {
            if let Readiness::NotReady = self.constants.is_ready(feature, model) {
                return RuleOutcome::NotReady;
            }
            if let Readiness::NotReady = self.defaults.is_ready(feature, model) {
                return RuleOutcome::NotReady;
            }
        }

        let summary: Vec<(String, TypeName)> = node
            .features
            .iter()
            .filter_map(|feature| {
                let entity = feature.entity_type()?.get()?;
                Some((feature.name().text.clone(), entity.name.clone()))
            })
            .collect();

        // Effect: populate and seal the summary table.
        let node = model.class_mut(class);
        for (name, type_name) in summary {
            node.resolved_feature_types.insert(name, type_name);
        }
        node.resolved_feature_types.seal();
        RuleOutcome::Applied
    }
}
