//! Sealing of declaration tables.

use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;

use super::{Rule, RuleOutcome};

/// Seals every table populated directly by the declaration scan: the
/// parents list, the import/generic/typedef/export/discrete tables, the
/// local feature table, and each body's locals.
///
/// The model is handed to the solver declaration-complete, so this rule is
/// unconditionally ready; it exists to turn "scanning finished" into the
/// seal flags every downstream readiness predicate gates on.
pub struct SealTablesRule;

impl Rule for SealTablesRule {
    fn name(&self) -> &'static str {
        "seal-class-tables"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        _diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        let class = model.class_mut(class);
        class.parents.seal();
        class.import_table.seal();
        class.generic_table.seal();
        class.typedef_table.seal();
        class.export_table.seal();
        class.discrete_table.seal();
        class.local_feature_table.seal();
        for feature in &mut class.features {
            for body in feature.bodies_mut() {
                body.locals.seal();
            }
        }
        RuleOutcome::Applied
    }
}
