//! Semantic rules.
//!
//! A rule owns its source templates, constructed once at registration and
//! reused across every class. Each `attempt` runs in two phases: a pure
//! check that evaluates the templates against the current model, then —
//! only when every template is ready — the effect, which performs the only
//! mutations in the system: assigning write-once cells, sealing
//! collections, and appending diagnostics.
//!
//! An instance that applied, or that reported a terminal diagnostic, is
//! retired by the solver and never re-examined; `NotReady` instances are
//! retried on the next pass.

pub mod anchored_type;
pub mod body_result;
pub mod class_type;
pub mod feature_table;
pub mod feature_type;
pub mod inheritance;
pub mod manifest;
pub mod seal_tables;
pub mod type_identifiers;

use alder_ast::{ClassId, Model};

use crate::error::DiagnosticList;

pub use anchored_type::AnchoredTypeRule;
pub use body_result::BodyResultRule;
pub use class_type::ClassTypeRule;
pub use feature_table::ClassFeatureTableRule;
pub use feature_type::FeatureTypeRule;
pub use inheritance::InheritanceRule;
pub use manifest::ManifestValueRule;
pub use seal_tables::SealTablesRule;
pub use type_identifiers::{TypeIdentifierRule, TypedefRule};

/// Result of attempting one rule instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// At least one template is not ready; retry on a later pass.
    NotReady,
    /// The effect was applied; the instance is done.
    Applied,
    /// The instance completed by reporting at least one diagnostic.
    Errored,
}

/// A semantic rule, attempted once per class until it retires.
pub trait Rule {
    /// Stable name for logging and the stall report.
    fn name(&self) -> &'static str;

    /// Check readiness and, if ready, apply the effect.
    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome;
}

/// The standard rule set, in registration order.
///
/// Order matters only within a pass: sealing runs before the rules that
/// gate on seals so the common case converges in few passes. Correctness
/// never depends on it; a rule that runs too early simply reports
/// `NotReady` and is retried.
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SealTablesRule),
        Box::new(InheritanceRule),
        Box::new(ClassTypeRule::new()),
        Box::new(TypeIdentifierRule::new()),
        Box::new(TypedefRule::new()),
        Box::new(FeatureTypeRule::new()),
        Box::new(ManifestValueRule::new()),
        Box::new(ClassFeatureTableRule::new()),
        Box::new(BodyResultRule::new()),
        Box::new(AnchoredTypeRule::new()),
    ]
}
