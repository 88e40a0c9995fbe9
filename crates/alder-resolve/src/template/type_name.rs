//! Type-identifier resolution.
//!
//! Classifies a bare type identifier written in a class: a built-in root
//! class, an imported class, a formal generic parameter, or a local
//! typedef — in that order, case-insensitively for builtins. Anything else
//! is an unknown identifier, which is terminal: the template reports ready
//! carrying the diagnostic so the owning rule records it and retires
//! instead of retrying forever.

use alder_ast::ast::class::Class;
use alder_ast::ast::types::{
    Builtin, FormalGenericType, Resolution, ResolvedType, TypeIdentifier, TypeName,
};
use alder_ast::Model;

use crate::error::{Diagnostic, DiagnosticKind};

use super::{Readiness, SourceTemplate};

/// What resolving a type identifier produced.
///
/// Exactly one of `resolution` / `diagnostic` is populated, except for the
/// silent-failure case (both `None`): the identifier chains through a
/// declaration whose own resolution already failed and was already
/// reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNameOutcome {
    /// The resolved name and type, on success
    pub resolution: Option<(TypeName, ResolvedType)>,
    /// Terminal diagnostic, when the identifier can never resolve
    pub diagnostic: Option<Diagnostic>,
}

impl TypeNameOutcome {
    fn resolved(name: TypeName, ty: ResolvedType) -> Self {
        Self {
            resolution: Some((name, ty)),
            diagnostic: None,
        }
    }

    fn error(diagnostic: Diagnostic) -> Self {
        Self {
            resolution: None,
            diagnostic: Some(diagnostic),
        }
    }

    fn already_reported() -> Self {
        Self {
            resolution: None,
            diagnostic: None,
        }
    }
}

/// Resolution of a type identifier within its embedding class.
///
/// Not ready until the embedding class's declaration tables and flattened
/// feature table are sealed and its own compiled type is assigned — and,
/// for imports, until the imported class's generic table and compiled type
/// are final too.
pub struct TypeNameTemplate;

impl<'a> SourceTemplate<(&'a Class, &'a TypeIdentifier)> for TypeNameTemplate {
    type Payload = TypeNameOutcome;

    fn is_ready(
        &self,
        node: &(&'a Class, &'a TypeIdentifier),
        model: &Model,
    ) -> Readiness<TypeNameOutcome> {
        let (class, ident) = *node;
        resolve_type_identifier(class, ident, model)
    }
}

/// Classify and resolve one type identifier.
pub fn resolve_type_identifier(
    class: &Class,
    ident: &TypeIdentifier,
    model: &Model,
) -> Readiness<TypeNameOutcome> {
    if !class.declaration_tables_sealed()
        || !class.feature_table.is_sealed()
        || !class.resolved_type.is_assigned()
    {
        return Readiness::NotReady;
    }

    // Built-in root classes win over any same-named import.
    if let Some(builtin) = Builtin::lookup(&ident.text) {
        let target = model.class(model.builtin(builtin));
        let Some(class_type) = target.resolved_type.get() else {
            return Readiness::NotReady;
        };
        return Readiness::Ready(Some(TypeNameOutcome::resolved(
            class_type.name.clone(),
            ResolvedType::Class(class_type.clone()),
        )));
    }

    if let Some(import) = class.import_table.get(ident.text.as_str()) {
        let target = model.class(import.class);
        if !target.generic_table.is_sealed() {
            return Readiness::NotReady;
        }
        if !target.generic_table.is_empty() {
            // Terminal: a generic class cannot be used without arguments.
            return Readiness::Ready(Some(TypeNameOutcome::error(Diagnostic::new(
                DiagnosticKind::GenericWithoutArguments,
                ident.span,
                format!(
                    "generic class '{}' used without type arguments",
                    target.name.text
                ),
            ))));
        }
        let Some(class_type) = target.resolved_type.get() else {
            return Readiness::NotReady;
        };
        return Readiness::Ready(Some(TypeNameOutcome::resolved(
            class_type.name.clone(),
            ResolvedType::Class(class_type.clone()),
        )));
    }

    if let Some(generic) = class.generic_table.get(ident.text.as_str()) {
        let name = TypeName::new(generic.name.text.clone());
        return Readiness::Ready(Some(TypeNameOutcome::resolved(
            name.clone(),
            ResolvedType::Generic(FormalGenericType { name }),
        )));
    }

    if let Some(typedef) = class.typedef_table.get(ident.text.as_str()) {
        return match typedef.target.resolved.get() {
            None => Readiness::NotReady,
            Some(Resolution::Known((name, ty))) => Readiness::Ready(Some(
                TypeNameOutcome::resolved(name.clone(), ty.clone()),
            )),
            Some(Resolution::Failed) => {
                Readiness::Ready(Some(TypeNameOutcome::already_reported()))
            }
        };
    }

    Readiness::Ready(Some(TypeNameOutcome::error(Diagnostic::new(
        DiagnosticKind::UnknownIdentifier,
        ident.span,
        format!("unknown type identifier '{}'", ident.text),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alder_ast::ast::class::{GenericParameter, ImportedClass, Typedef};
    use alder_ast::ast::types::ClassType;
    use alder_ast::foundation::{Identifier, Span};
    use alder_ast::ClassId;

    fn test_span() -> Span {
        Span::new(0, 0, 0, 1)
    }

    fn ident(text: &str) -> Identifier {
        Identifier::new(text, test_span())
    }

    /// Model with builtins sealed and typed, plus one empty user class
    /// whose tables are sealed and whose type is assigned.
    fn ready_model() -> (Model, ClassId) {
        let mut model = Model::new();
        let user = model.add_class(ident("Point"));
        let ids: Vec<_> = model.classes().map(|(id, _)| id).collect();
        for id in ids {
            let class = model.class_mut(id);
            let name = class.name.text.clone();
            class.parents.seal();
            class.import_table.seal();
            class.generic_table.seal();
            class.typedef_table.seal();
            class.export_table.seal();
            class.discrete_table.seal();
            class.local_feature_table.seal();
            class.feature_table.seal();
            class
                .resolved_type
                .assign(ClassType {
                    name: TypeName::new(name),
                    class: id,
                });
        }
        (model, user)
    }

    #[test]
    fn test_builtin_wins_over_import_case_insensitively() {
        // "any" resolves to the root class even though the embedding class
        // imports a user class named "any".
        let mut model = Model::new();
        let builtins: Vec<_> = model.classes().map(|(id, _)| id).collect();
        for id in builtins {
            let class = model.class_mut(id);
            let name = class.name.text.clone();
            class.generic_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new(name),
                class: id,
            });
        }
        let decoy = model.add_class(ident("any"));
        {
            let class = model.class_mut(decoy);
            class.generic_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("any"),
                class: decoy,
            });
        }
        let user = model.add_class(ident("Point"));
        {
            let class = model.class_mut(user);
            class.import_table.insert(
                "any".to_string(),
                ImportedClass {
                    class: decoy,
                    span: test_span(),
                },
            );
            class.parents.seal();
            class.import_table.seal();
            class.generic_table.seal();
            class.typedef_table.seal();
            class.export_table.seal();
            class.discrete_table.seal();
            class.local_feature_table.seal();
            class.feature_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("Point"),
                class: user,
            });
        }
        let ti = TypeIdentifier::new("any", test_span());
        let outcome = resolve_type_identifier(model.class(user), &ti, &model)
            .payload()
            .unwrap();
        let (name, ty) = outcome.resolution.unwrap();
        assert_eq!(name.as_str(), "Any");
        assert_eq!(ty.base_class(), Some(model.builtin(Builtin::Any)));
    }

    #[test]
    fn test_not_ready_until_embedding_class_is_final() {
        let mut model = Model::new();
        let user = model.add_class(ident("Point"));
        let ti = TypeIdentifier::new("Any", test_span());
        // Nothing sealed yet.
        assert_eq!(
            resolve_type_identifier(model.class(user), &ti, &model),
            Readiness::NotReady
        );
    }

    #[test]
    fn test_unknown_identifier_is_terminal() {
        let (model, user) = ready_model();
        let ti = TypeIdentifier::new("Bogus", test_span());
        let outcome = resolve_type_identifier(model.class(user), &ti, &model)
            .payload()
            .unwrap();
        let diagnostic = outcome.diagnostic.unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnknownIdentifier);
        assert!(diagnostic.message.contains("Bogus"));
        assert!(outcome.resolution.is_none());
    }

    #[test]
    fn test_generic_parameter_resolves_locally() {
        let (mut model, user) = ready_model();
        // Rebuild a class with a generic table entry; tables must be
        // re-created since the ready fixture sealed them.
        let list = model.add_class(ident("List"));
        {
            let class = model.class_mut(list);
            class.generic_table.insert(
                "T".to_string(),
                GenericParameter { name: ident("T") },
            );
            class.parents.seal();
            class.import_table.seal();
            class.generic_table.seal();
            class.typedef_table.seal();
            class.export_table.seal();
            class.discrete_table.seal();
            class.local_feature_table.seal();
            class.feature_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("List"),
                class: list,
            });
        }
        let ti = TypeIdentifier::new("T", test_span());
        let outcome = resolve_type_identifier(model.class(list), &ti, &model)
            .payload()
            .unwrap();
        let (name, ty) = outcome.resolution.unwrap();
        assert_eq!(name.as_str(), "T");
        assert_eq!(ty.base_class(), None);

        // The generic-less user class does not see the parameter.
        let outcome = resolve_type_identifier(model.class(user), &ti, &model)
            .payload()
            .unwrap();
        assert_eq!(
            outcome.diagnostic.unwrap().kind,
            DiagnosticKind::UnknownIdentifier
        );
    }

    #[test]
    fn test_generic_import_without_arguments_is_diagnosed() {
        let mut model = Model::new();
        let list = model.add_class(ident("List"));
        let user = model.add_class(ident("Point"));
        {
            let class = model.class_mut(list);
            class
                .generic_table
                .insert("T".to_string(), GenericParameter { name: ident("T") });
            class.generic_table.seal();
        }
        {
            let class = model.class_mut(user);
            class.import_table.insert(
                "List".to_string(),
                ImportedClass {
                    class: list,
                    span: test_span(),
                },
            );
            class.parents.seal();
            class.import_table.seal();
            class.generic_table.seal();
            class.typedef_table.seal();
            class.export_table.seal();
            class.discrete_table.seal();
            class.local_feature_table.seal();
            class.feature_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("Point"),
                class: user,
            });
        }
        let ti = TypeIdentifier::new("List", test_span());
        let outcome = resolve_type_identifier(model.class(user), &ti, &model)
            .payload()
            .unwrap();
        let diagnostic = outcome.diagnostic.unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::GenericWithoutArguments);
        assert!(diagnostic.message.contains("List"));
    }

    #[test]
    fn test_typedef_chains_through_resolved_target() {
        let (mut model, _) = ready_model();
        let real = model.add_class(ident("Real"));
        let holder = model.add_class(ident("Holder"));
        {
            let class = model.class_mut(real);
            class.generic_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("Real"),
                class: real,
            });
        }
        {
            let class = model.class_mut(holder);
            let mut target = TypeIdentifier::new("Real", test_span());
            target.resolved.assign(Resolution::Known((
                TypeName::new("Real"),
                ResolvedType::Class(ClassType {
                    name: TypeName::new("Real"),
                    class: real,
                }),
            )));
            class.typedef_table.insert(
                "Scalar".to_string(),
                Typedef {
                    name: ident("Scalar"),
                    target,
                },
            );
            class.parents.seal();
            class.import_table.seal();
            class.generic_table.seal();
            class.typedef_table.seal();
            class.export_table.seal();
            class.discrete_table.seal();
            class.local_feature_table.seal();
            class.feature_table.seal();
            class.resolved_type.assign(ClassType {
                name: TypeName::new("Holder"),
                class: holder,
            });
        }
        let ti = TypeIdentifier::new("Scalar", test_span());
        let outcome = resolve_type_identifier(model.class(holder), &ti, &model)
            .payload()
            .unwrap();
        let (name, ty) = outcome.resolution.unwrap();
        assert_eq!(name.as_str(), "Real");
        assert_eq!(ty.base_class(), Some(real));
    }
}
