//! Resolution of written type identifiers.

use std::collections::HashMap;

use alder_ast::ast::types::Resolution;
use alder_ast::{ClassId, Model};

use crate::error::{Diagnostic, DiagnosticKind, DiagnosticList};
use crate::template::{Readiness, SourceTemplate, TypeNameOutcome, TypeNameTemplate};

use super::{Rule, RuleOutcome};

/// Resolves every type identifier written in a class's feature
/// declarations and records the outcome on the identifier itself.
///
/// A diagnosed identifier is recorded as [`Resolution::Failed`] so the
/// rules downstream of it retire silently instead of reporting the same
/// cause again on a later pass.
pub struct TypeIdentifierRule {
    template: TypeNameTemplate,
}

impl TypeIdentifierRule {
    /// Construct the rule.
    pub fn new() -> Self {
        Self {
            template: TypeNameTemplate,
        }
    }
}

impl Rule for TypeIdentifierRule {
    fn name(&self) -> &'static str {
        "resolve-type-identifiers"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: every identifier of every feature must be resolvable.
        let node = model.class(class);
        let mut outcomes: Vec<(usize, usize, TypeNameOutcome)> = Vec::new();
        for (feature_idx, feature) in node.features.iter().enumerate() {
            for (ident_idx, ident) in feature.type_identifiers().iter().enumerate() {
                match self.template.is_ready(&(node, *ident), model) {
                    Readiness::NotReady => return RuleOutcome::NotReady,
                    Readiness::Ready(Some(outcome)) => {
                        outcomes.push((feature_idx, ident_idx, outcome));
                    }
                    Readiness::Ready(None) => {}
                }
            }
        }

        // Effect: record outcomes and report diagnostics.
        let mut errored = false;
        for (feature_idx, ident_idx, outcome) in outcomes {
            if let Some(diagnostic) = outcome.diagnostic {
                diagnostics.push(diagnostic);
                errored = true;
            }
            let resolution = match outcome.resolution {
                Some((name, ty)) => Resolution::Known((name, ty)),
                None => Resolution::Failed,
            };
            let mut idents = model.class_mut(class).features[feature_idx].type_identifiers_mut();
            idents[ident_idx].resolved.assign(resolution);
        }
        if errored {
            RuleOutcome::Errored
        } else {
            RuleOutcome::Applied
        }
    }
}

/// Resolves the target of every local typedef, chaining through other
/// typedefs of the same class.
///
/// Typedef-to-typedef references never leave the class (the classifier
/// consults the local typedef table only), so chains are resolved here in
/// dependency order against a local memo rather than across solver
/// passes, and cycles are detected up front and reported as terminal
/// diagnostics instead of stalling into the retry guard.
pub struct TypedefRule {
    template: TypeNameTemplate,
}

impl TypedefRule {
    /// Construct the rule.
    pub fn new() -> Self {
        Self {
            template: TypeNameTemplate,
        }
    }
}

/// Memoized outcome for one typedef: the shared chain outcome plus its own
/// diagnostic, if it is the member that caused the failure.
struct TypedefOutcome {
    resolution: Option<(alder_ast::TypeName, alder_ast::ResolvedType)>,
    diagnostic: Option<Diagnostic>,
}

impl Rule for TypedefRule {
    fn name(&self) -> &'static str {
        "resolve-typedefs"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        let node = model.class(class);
        if node.typedef_table.is_sealed() && node.typedef_table.is_empty() {
            return RuleOutcome::Applied;
        }

        // Check: resolve every chain against a local memo.
        let mut memo: HashMap<String, TypedefOutcome> = HashMap::new();
        for name in node.typedef_table.keys() {
            if memo.contains_key(name) {
                continue;
            }

            // Walk the local chain from this typedef to its base target.
            let mut chain: Vec<String> = Vec::new();
            let mut current = name.clone();
            loop {
                if memo.contains_key(&current) {
                    break;
                }
                if chain.contains(&current) {
                    // The chain revisits a member: report the cycle at the
                    // revisited typedef and fail the whole chain.
                    let member = node
                        .typedef_table
                        .get(current.as_str())
                        .expect("chain members are typedefs");
                    for link in &chain {
                        memo.insert(
                            link.clone(),
                            TypedefOutcome {
                                resolution: None,
                                diagnostic: None,
                            },
                        );
                    }
                    memo.insert(
                        current.clone(),
                        TypedefOutcome {
                            resolution: None,
                            diagnostic: Some(Diagnostic::new(
                                DiagnosticKind::CyclicDependency,
                                member.name.span,
                                format!(
                                    "typedef '{}' refers back to itself through its target chain",
                                    current
                                ),
                            )),
                        },
                    );
                    break;
                }
                chain.push(current.clone());

                let typedef = node
                    .typedef_table
                    .get(current.as_str())
                    .expect("chain members are typedefs");
                if node.typedef_table.contains_key(typedef.target.text.as_str()) {
                    current = typedef.target.text.clone();
                    continue;
                }

                // Base case: the target is not a local typedef; classify it
                // with the shared template. The typedef branch in the
                // classifier cannot trigger here, so there is no recursion.
                let base = match self.template.is_ready(&(node, &typedef.target), model) {
                    Readiness::NotReady => return RuleOutcome::NotReady,
                    Readiness::Ready(outcome) => outcome.expect("classifier always has an outcome"),
                };
                record_chain(&mut memo, &chain, base);
                break;
            }

            // A chain that stopped at a memoized member propagates that
            // member's success or failure.
            if let Some(last) = chain.last() {
                if !memo.contains_key(last) {
                    let tail = memo
                        .get(&current)
                        .map(|o| o.resolution.clone())
                        .expect("loop exits with current memoized");
                    for link in &chain {
                        memo.insert(
                            link.clone(),
                            TypedefOutcome {
                                resolution: tail.clone(),
                                diagnostic: None,
                            },
                        );
                    }
                }
            }
        }

        // Effect: assign every target's resolution, report diagnostics.
        let mut errored = false;
        let names: Vec<String> = model.class(class).typedef_table.keys().cloned().collect();
        for name in names {
            let outcome = memo.remove(&name).expect("every typedef is memoized");
            if let Some(diagnostic) = outcome.diagnostic {
                diagnostics.push(diagnostic);
                errored = true;
            }
            let resolution = match outcome.resolution {
                Some((type_name, ty)) => Resolution::Known((type_name, ty)),
                None => Resolution::Failed,
            };
            model
                .class_mut(class)
                .typedef_table
                .get_mut(&name)
                .expect("typedef name is a table key")
                .target
                .resolved
                .assign(resolution);
        }
        if errored {
            RuleOutcome::Errored
        } else {
            RuleOutcome::Applied
        }
    }
}

/// Record a resolved base outcome for every member of a chain. The
/// diagnostic, if any, belongs to the last member (whose target failed);
/// earlier members fail silently through it.
fn record_chain(
    memo: &mut HashMap<String, TypedefOutcome>,
    chain: &[String],
    base: TypeNameOutcome,
) {
    let (last, rest) = chain.split_last().expect("chain is non-empty at base case");
    for link in rest {
        memo.insert(
            link.clone(),
            TypedefOutcome {
                resolution: base.resolution.clone(),
                diagnostic: None,
            },
        );
    }
    memo.insert(
        last.clone(),
        TypedefOutcome {
            resolution: base.resolution.clone(),
            diagnostic: base.diagnostic,
        },
    );
}
