//! Class type compilation.

use alder_ast::ast::class::{Class, GenericParameter};
use alder_ast::ast::types::{ClassType, TypeName};
use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;
use crate::template::{SealedListTemplate, SealedTableTemplate, SourceTemplate};

use super::{Rule, RuleOutcome};

fn parents(class: &Class) -> &alder_ast::foundation::SealableList<ClassId> {
    &class.parents
}

fn generic_table(class: &Class) -> &alder_ast::foundation::SealableMap<String, GenericParameter> {
    &class.generic_table
}

/// Assigns a class's compiled type once its inheritance clause and generic
/// table are final. Every type-identifier resolution in the unit gates on
/// this assignment, for the embedding class and for import targets alike.
pub struct ClassTypeRule {
    parents: SealedListTemplate<Class, ClassId>,
    generics: SealedTableTemplate<Class, String, GenericParameter>,
}

impl ClassTypeRule {
    /// Construct the rule and its templates.
    pub fn new() -> Self {
        Self {
            parents: SealedListTemplate::new(parents),
            generics: SealedTableTemplate::new(generic_table),
        }
    }
}

impl Rule for ClassTypeRule {
    fn name(&self) -> &'static str {
        "compile-class-type"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        _diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        let node = model.class(class);
        if !self.parents.is_ready(node, model).is_ready()
            || !self.generics.is_ready(node, model).is_ready()
        {
            return RuleOutcome::NotReady;
        }
        let name = TypeName::new(node.name.text.clone());

        model
            .class_mut(class)
            .resolved_type
            .assign(ClassType { name, class });
        RuleOutcome::Applied
    }
}
