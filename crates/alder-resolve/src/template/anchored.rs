//! Anchored feature-path resolution.
//!
//! An anchored type names a dotted identifier chain (`origin.distance`)
//! whose final resolved type is inferred by walking feature tables: each
//! intermediate step must resolve to a data-bearing feature whose entity
//! type provides the table for the next step, and the final step must
//! itself be data-bearing.
//!
//! Intermediate and final steps deliberately run through separate per-kind
//! switches: "the path continues through a value-typed feature" and "the
//! path must end in a value" allow different kind sets and produce
//! different messages. A creation or procedure mid-path means the next
//! step has nothing to look itself up in, so it is reported as an unknown
//! identifier at that next step; the same kinds as the *final* step are a
//! categorically disallowed terminus and report "not an anchor".
//!
//! The first diagnostic stops the walk: diagnostics are terminal, so the
//! template reports ready (with no resolved type) and is never retried.

use alder_ast::ast::class::Class;
use alder_ast::ast::feature::Feature;
use alder_ast::ast::types::{EntityType, TypeName};
use alder_ast::foundation::{DotPath, Identifier, SealableMap};
use alder_ast::{FeatureRef, Model};

use crate::error::{Diagnostic, DiagnosticKind};

use super::{Readiness, SourceTemplate};

/// What walking an anchored path produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResolution {
    /// Diagnostics collected before the walk stopped, in step order
    pub diagnostics: Vec<Diagnostic>,
    /// The final step's type, when every step resolved
    pub resolved: Option<(TypeName, EntityType)>,
}

impl PathResolution {
    fn error(diagnostic: Diagnostic) -> Readiness<Self> {
        Readiness::Ready(Some(Self {
            diagnostics: vec![diagnostic],
            resolved: None,
        }))
    }

    fn resolved(name: TypeName, ty: EntityType) -> Readiness<Self> {
        Readiness::Ready(Some(Self {
            diagnostics: Vec::new(),
            resolved: Some((name, ty)),
        }))
    }
}

/// Resolution of a dotted identifier chain against the embedding class's
/// feature tables.
pub struct AnchoredPathTemplate;

impl<'a> SourceTemplate<(&'a Class, &'a DotPath)> for AnchoredPathTemplate {
    type Payload = PathResolution;

    fn is_ready(
        &self,
        node: &(&'a Class, &'a DotPath),
        model: &Model,
    ) -> Readiness<PathResolution> {
        let (class, path) = *node;
        walk_path(class, path, model)
    }
}

/// Walk every step of an anchored path.
pub fn walk_path(class: &Class, path: &DotPath, model: &Model) -> Readiness<PathResolution> {
    let Some(mut table) = anchor_table(class) else {
        return Readiness::NotReady;
    };

    let steps = path.steps();
    for (index, step) in steps.iter().enumerate() {
        let is_last = index + 1 == steps.len();

        let Some(&fref) = table.get(step.text.as_str()) else {
            return PathResolution::error(unknown_identifier(step));
        };

        let feature = model.feature(fref);
        match feature {
            Feature::Creation(_) | Feature::Procedure(_) => {
                // No result to continue through or to anchor on.
                return if is_last {
                    PathResolution::error(Diagnostic::new(
                        DiagnosticKind::NotAnAnchor,
                        step.span,
                        format!(
                            "{} feature '{}' has no result and cannot anchor a type",
                            feature.kind().name(),
                            step.text
                        ),
                    ))
                } else {
                    PathResolution::error(unknown_identifier(&steps[index + 1]))
                };
            }
            Feature::Attribute(_)
            | Feature::Constant(_)
            | Feature::Function(_)
            | Feature::Property(_)
            | Feature::Indexer(_) => {
                // Data-bearing: wait until the feature's own entity-type
                // inference has completed. For functions this is already
                // the most common of the overloaded result types.
                let cell = feature
                    .entity_type()
                    .expect("data-bearing kinds expose an entity type");
                let Some(entity) = cell.get() else {
                    return Readiness::NotReady;
                };

                if is_last {
                    return PathResolution::resolved(entity.name.clone(), entity.clone());
                }

                match entity.base {
                    Some(base) => match anchor_table(model.class(base)) {
                        Some(next) => table = next,
                        None => return Readiness::NotReady,
                    },
                    // No feature table to continue into (e.g. a formal
                    // generic), so the next step cannot resolve.
                    None => {
                        return PathResolution::error(unknown_identifier(&steps[index + 1]));
                    }
                }
            }
        }
    }

    unreachable!("dot path has at least one step")
}

/// The feature table a walk consults for a class: the flattened table if
/// sealed, else the local table if sealed, else none yet.
fn anchor_table(class: &Class) -> Option<&SealableMap<String, FeatureRef>> {
    if class.feature_table.is_sealed() {
        Some(&class.feature_table)
    } else if class.local_feature_table.is_sealed() {
        Some(&class.local_feature_table)
    } else {
        None
    }
}

fn unknown_identifier(step: &Identifier) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnknownIdentifier,
        step.span,
        format!("unknown feature '{}'", step.text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alder_ast::ast::feature::{
        AttributeFeature, CreationFeature, FunctionFeature, OptionalBody,
    };
    use alder_ast::ast::types::TypeIdentifier;
    use alder_ast::foundation::{OnceRef, Span};
    use alder_ast::ClassId;

    fn test_span() -> Span {
        Span::new(0, 0, 0, 1)
    }

    fn ident(text: &str) -> Identifier {
        Identifier::new(text, test_span())
    }

    fn attribute(name: &str, declared: &str) -> Feature {
        Feature::Attribute(AttributeFeature {
            name: ident(name),
            declared: TypeIdentifier::new(declared, test_span()),
            default: OptionalBody::absent(),
            entity_type: OnceRef::new(),
        })
    }

    fn dot_path(steps: &[&str]) -> DotPath {
        DotPath::new(steps.iter().map(|s| ident(s)).collect())
    }

    /// `Segment` has attribute `origin: Point`; `Point` has attribute
    /// `x: Real` plus a creation feature `make`.
    fn fixture() -> (Model, ClassId, ClassId, ClassId) {
        let mut model = Model::new();
        let real = model.add_class(ident("Real"));
        let point = model.add_class(ident("Point"));
        let segment = model.add_class(ident("Segment"));

        let x = model.add_feature(point, attribute("x", "Real"));
        model.add_feature(
            point,
            Feature::Creation(CreationFeature { name: ident("make") }),
        );
        let origin = model.add_feature(segment, attribute("origin", "Point"));

        for id in [real, point, segment] {
            model.class_mut(id).local_feature_table.seal();
        }

        // Entity types as the feature-type rule would assign them.
        model
            .class_mut(point)
            .feature_mut(x)
            .entity_type_mut()
            .unwrap()
            .assign(EntityType {
                name: TypeName::new("Real"),
                base: Some(real),
            });
        model
            .class_mut(segment)
            .feature_mut(origin)
            .entity_type_mut()
            .unwrap()
            .assign(EntityType {
                name: TypeName::new("Point"),
                base: Some(point),
            });

        (model, real, point, segment)
    }

    #[test]
    fn test_two_step_path_resolves() {
        let (model, real, _, segment) = fixture();
        let path = dot_path(&["origin", "x"]);
        let resolution = walk_path(model.class(segment), &path, &model)
            .payload()
            .unwrap();
        assert!(resolution.diagnostics.is_empty());
        let (name, entity) = resolution.resolved.unwrap();
        assert_eq!(name.as_str(), "Real");
        assert_eq!(entity.base, Some(real));
    }

    #[test]
    fn test_not_ready_until_anchor_table_seals() {
        let (mut model, _, _, segment) = fixture();
        let unsealed = model.add_class(ident("Late"));
        model.add_feature(unsealed, attribute("a", "Real"));
        let path = dot_path(&["a"]);
        assert_eq!(
            walk_path(model.class(unsealed), &path, &model),
            Readiness::NotReady
        );
        // Sealed classes resolve fine in the same model state.
        let ok = dot_path(&["origin"]);
        assert!(walk_path(model.class(segment), &ok, &model).is_ready());
    }

    #[test]
    fn test_unknown_first_step_is_terminal() {
        let (model, _, _, segment) = fixture();
        let path = dot_path(&["missing", "x"]);
        let resolution = walk_path(model.class(segment), &path, &model)
            .payload()
            .unwrap();
        assert!(resolution.resolved.is_none());
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(
            resolution.diagnostics[0].kind,
            DiagnosticKind::UnknownIdentifier
        );
        assert!(resolution.diagnostics[0].message.contains("missing"));
    }

    #[test]
    fn test_creation_mid_path_reports_next_step() {
        // `make.x`: the walk stops at the creation feature; the diagnostic
        // lands on `x`, the step with nothing to resolve in, regardless of
        // whether `x` exists elsewhere.
        let (model, _, point, _) = fixture();
        let path = dot_path(&["make", "x"]);
        let resolution = walk_path(model.class(point), &path, &model)
            .payload()
            .unwrap();
        assert!(resolution.resolved.is_none());
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(
            resolution.diagnostics[0].kind,
            DiagnosticKind::UnknownIdentifier
        );
        assert!(resolution.diagnostics[0].message.contains("'x'"));
    }

    #[test]
    fn test_creation_as_final_step_is_not_an_anchor() {
        let (model, _, point, _) = fixture();
        let path = dot_path(&["make"]);
        let resolution = walk_path(model.class(point), &path, &model)
            .payload()
            .unwrap();
        assert!(resolution.resolved.is_none());
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].kind, DiagnosticKind::NotAnAnchor);
        assert!(resolution.diagnostics[0].message.contains("creation"));
    }

    #[test]
    fn test_waits_for_intermediate_entity_type() {
        let (mut model, _, point, _) = fixture();
        // A function whose entity type is not assigned yet.
        let holder = model.add_class(ident("Holder"));
        let f = model.add_feature(
            holder,
            Feature::Function(FunctionFeature {
                name: ident("nearest"),
                results: vec![TypeIdentifier::new("Point", test_span())],
                most_common: 0,
                body: OptionalBody::absent(),
                entity_type: OnceRef::new(),
            }),
        );
        model.class_mut(holder).local_feature_table.seal();

        let path = dot_path(&["nearest", "x"]);
        assert_eq!(
            walk_path(model.class(holder), &path, &model),
            Readiness::NotReady
        );

        // Once the function's most-common result type is known, the walk
        // continues into Point's table and resolves.
        model
            .class_mut(holder)
            .feature_mut(f)
            .entity_type_mut()
            .unwrap()
            .assign(EntityType {
                name: TypeName::new("Point"),
                base: Some(point),
            });
        let resolution = walk_path(model.class(holder), &path, &model)
            .payload()
            .unwrap();
        assert_eq!(resolution.resolved.unwrap().0.as_str(), "Real");
    }

    #[test]
    fn test_generic_typed_step_cannot_continue() {
        let (mut model, _, _, _) = fixture();
        let holder = model.add_class(ident("Holder"));
        let f = model.add_feature(holder, attribute("item", "T"));
        model.class_mut(holder).local_feature_table.seal();
        model
            .class_mut(holder)
            .feature_mut(f)
            .entity_type_mut()
            .unwrap()
            .assign(EntityType {
                name: TypeName::new("T"),
                base: None,
            });

        let path = dot_path(&["item", "x"]);
        let resolution = walk_path(model.class(holder), &path, &model)
            .payload()
            .unwrap();
        assert!(resolution.resolved.is_none());
        assert_eq!(
            resolution.diagnostics[0].kind,
            DiagnosticKind::UnknownIdentifier
        );
    }

    #[test]
    fn test_walk_is_deterministic() {
        let (model, _, _, segment) = fixture();
        let path = dot_path(&["origin", "x"]);
        let first = walk_path(model.class(segment), &path, &model)
            .payload()
            .unwrap();
        let second = walk_path(model.class(segment), &path, &model)
            .payload()
            .unwrap();
        assert_eq!(first.resolved, second.resolved);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
