//! Features: the members of a class.
//!
//! A feature is one of seven kinds — attribute, constant, creation,
//! procedure, function, property, indexer — each with its own
//! type-resolution rules. The kinds form a closed sum type so every
//! per-kind dispatch in the engine is an exhaustive `match`; there is no
//! runtime kind check to forget a case in.
//!
//! Creation and procedure features carry no result: their variants have no
//! entity-type cell at all, so "a path continues through a no-result
//! feature" is unrepresentable rather than merely invalid.

use crate::foundation::{Identifier, OnceRef, SealableMap, Span};

use super::expr::Expression;
use super::types::{EntityType, TypeIdentifier, TypeName};

/// An optional sub-node that is present or absent as a fact of the model.
///
/// Distinct from an unassigned [`OnceRef`]: absence here means the source
/// simply does not declare the part (no default value, no getter), which
/// readiness predicates treat as vacuously satisfied, never as "not yet".
#[derive(Debug, Clone, Default)]
pub struct OptionalBody<T> {
    inner: Option<T>,
}

impl<T> OptionalBody<T> {
    /// An absent part.
    pub fn absent() -> Self {
        Self { inner: None }
    }

    /// A present part.
    pub fn assigned(value: T) -> Self {
        Self { inner: Some(value) }
    }

    /// Whether the part is present in the model.
    pub fn is_assigned(&self) -> bool {
        self.inner.is_some()
    }

    /// The part, if present.
    pub fn get(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    /// Mutable access to the part, if present.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.inner.as_mut()
    }
}

/// A local-variable declaration inside a body.
#[derive(Debug, Clone)]
pub struct Local {
    /// Declared name
    pub name: Identifier,
}

/// A routine or accessor body.
#[derive(Debug, Clone)]
pub struct Body {
    /// Source location
    pub span: Span,
    /// Local declarations, sealed once scanning the body is complete
    pub locals: SealableMap<String, Local>,
    /// The body's result type, once inferred from its embedding feature
    pub result: OnceRef<TypeName>,
}

impl Body {
    /// Create an empty body.
    pub fn new(span: Span) -> Self {
        Self {
            span,
            locals: SealableMap::new(),
            result: OnceRef::new(),
        }
    }
}

/// The category of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Attribute,
    Constant,
    Creation,
    Procedure,
    Function,
    Property,
    Indexer,
}

impl FeatureKind {
    /// Human-readable kind name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Attribute => "attribute",
            FeatureKind::Constant => "constant",
            FeatureKind::Creation => "creation",
            FeatureKind::Procedure => "procedure",
            FeatureKind::Function => "function",
            FeatureKind::Property => "property",
            FeatureKind::Indexer => "indexer",
        }
    }
}

/// A stored field of a class instance.
#[derive(Debug, Clone)]
pub struct AttributeFeature {
    pub name: Identifier,
    /// Declared type as written
    pub declared: TypeIdentifier,
    /// Optional manifest default value
    pub default: OptionalBody<Expression>,
    /// Resolved type of the attribute
    pub entity_type: OnceRef<EntityType>,
}

/// A named manifest constant.
#[derive(Debug, Clone)]
pub struct ConstantFeature {
    pub name: Identifier,
    pub declared: TypeIdentifier,
    /// The constant's manifest value expression
    pub literal: Expression,
    pub entity_type: OnceRef<EntityType>,
}

/// An object constructor. Produces no result.
#[derive(Debug, Clone)]
pub struct CreationFeature {
    pub name: Identifier,
}

/// A routine with no result.
#[derive(Debug, Clone)]
pub struct ProcedureFeature {
    pub name: Identifier,
}

/// A routine with one or more overloaded result types.
#[derive(Debug, Clone)]
pub struct FunctionFeature {
    pub name: Identifier,
    /// Result type of each overload, in declaration order; never empty
    pub results: Vec<TypeIdentifier>,
    /// Index into `results` of the most common result type, used when a
    /// path continues through this function
    pub most_common: usize,
    /// Optional body
    pub body: OptionalBody<Body>,
    pub entity_type: OnceRef<EntityType>,
}

/// A computed member with optional getter/setter bodies.
#[derive(Debug, Clone)]
pub struct PropertyFeature {
    pub name: Identifier,
    pub declared: TypeIdentifier,
    pub getter: OptionalBody<Body>,
    pub setter: OptionalBody<Body>,
    pub entity_type: OnceRef<EntityType>,
}

/// An indexed accessor, e.g. `items[i]`. Typed by its element type.
#[derive(Debug, Clone)]
pub struct IndexerFeature {
    pub name: Identifier,
    /// Element type as written
    pub declared: TypeIdentifier,
    pub entity_type: OnceRef<EntityType>,
}

/// A class member, closed over the seven feature kinds.
#[derive(Debug, Clone)]
pub enum Feature {
    Attribute(AttributeFeature),
    Constant(ConstantFeature),
    Creation(CreationFeature),
    Procedure(ProcedureFeature),
    Function(FunctionFeature),
    Property(PropertyFeature),
    Indexer(IndexerFeature),
}

impl Feature {
    /// Declared name.
    pub fn name(&self) -> &Identifier {
        match self {
            Feature::Attribute(f) => &f.name,
            Feature::Constant(f) => &f.name,
            Feature::Creation(f) => &f.name,
            Feature::Procedure(f) => &f.name,
            Feature::Function(f) => &f.name,
            Feature::Property(f) => &f.name,
            Feature::Indexer(f) => &f.name,
        }
    }

    /// Source location of the declaration.
    pub fn span(&self) -> Span {
        self.name().span
    }

    /// The feature's kind.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Attribute(_) => FeatureKind::Attribute,
            Feature::Constant(_) => FeatureKind::Constant,
            Feature::Creation(_) => FeatureKind::Creation,
            Feature::Procedure(_) => FeatureKind::Procedure,
            Feature::Function(_) => FeatureKind::Function,
            Feature::Property(_) => FeatureKind::Property,
            Feature::Indexer(_) => FeatureKind::Indexer,
        }
    }

    /// Whether this kind carries a result a path can continue through.
    pub fn has_result(&self) -> bool {
        !matches!(self, Feature::Creation(_) | Feature::Procedure(_))
    }

    /// The feature's resolved entity type, for data-bearing kinds.
    pub fn entity_type(&self) -> Option<&OnceRef<EntityType>> {
        match self {
            Feature::Attribute(f) => Some(&f.entity_type),
            Feature::Constant(f) => Some(&f.entity_type),
            Feature::Function(f) => Some(&f.entity_type),
            Feature::Property(f) => Some(&f.entity_type),
            Feature::Indexer(f) => Some(&f.entity_type),
            Feature::Creation(_) | Feature::Procedure(_) => None,
        }
    }

    /// Mutable access to the entity-type cell, for data-bearing kinds.
    pub fn entity_type_mut(&mut self) -> Option<&mut OnceRef<EntityType>> {
        match self {
            Feature::Attribute(f) => Some(&mut f.entity_type),
            Feature::Constant(f) => Some(&mut f.entity_type),
            Feature::Function(f) => Some(&mut f.entity_type),
            Feature::Property(f) => Some(&mut f.entity_type),
            Feature::Indexer(f) => Some(&mut f.entity_type),
            Feature::Creation(_) | Feature::Procedure(_) => None,
        }
    }

    /// Every type identifier written in this feature's declaration.
    pub fn type_identifiers(&self) -> Vec<&TypeIdentifier> {
        match self {
            Feature::Attribute(f) => vec![&f.declared],
            Feature::Constant(f) => vec![&f.declared],
            Feature::Function(f) => f.results.iter().collect(),
            Feature::Property(f) => vec![&f.declared],
            Feature::Indexer(f) => vec![&f.declared],
            Feature::Creation(_) | Feature::Procedure(_) => Vec::new(),
        }
    }

    /// Mutable access to the declaration's type identifiers.
    pub fn type_identifiers_mut(&mut self) -> Vec<&mut TypeIdentifier> {
        match self {
            Feature::Attribute(f) => vec![&mut f.declared],
            Feature::Constant(f) => vec![&mut f.declared],
            Feature::Function(f) => f.results.iter_mut().collect(),
            Feature::Property(f) => vec![&mut f.declared],
            Feature::Indexer(f) => vec![&mut f.declared],
            Feature::Creation(_) | Feature::Procedure(_) => Vec::new(),
        }
    }

    /// Every body owned by this feature.
    pub fn bodies(&self) -> Vec<&Body> {
        match self {
            Feature::Function(f) => f.body.get().into_iter().collect(),
            Feature::Property(f) => f.getter.get().into_iter().chain(f.setter.get()).collect(),
            _ => Vec::new(),
        }
    }

    /// Mutable access to every body owned by this feature.
    pub fn bodies_mut(&mut self) -> Vec<&mut Body> {
        match self {
            Feature::Function(f) => f.body.get_mut().into_iter().collect(),
            Feature::Property(f) => {
                let mut out = Vec::new();
                if let Some(b) = f.getter.get_mut() {
                    out.push(b);
                }
                if let Some(b) = f.setter.get_mut() {
                    out.push(b);
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Span;

    fn test_span() -> Span {
        Span::new(0, 0, 0, 1)
    }

    fn ident(text: &str) -> Identifier {
        Identifier::new(text, test_span())
    }

    #[test]
    fn test_no_result_kinds() {
        let creation = Feature::Creation(CreationFeature { name: ident("make") });
        let procedure = Feature::Procedure(ProcedureFeature { name: ident("run") });
        assert!(!creation.has_result());
        assert!(!procedure.has_result());
        assert!(creation.entity_type().is_none());
        assert!(procedure.type_identifiers().is_empty());
    }

    #[test]
    fn test_function_type_identifiers_in_order() {
        let f = Feature::Function(FunctionFeature {
            name: ident("distance"),
            results: vec![
                TypeIdentifier::new("Real", test_span()),
                TypeIdentifier::new("Integer", test_span()),
            ],
            most_common: 0,
            body: OptionalBody::absent(),
            entity_type: OnceRef::new(),
        });
        let idents: Vec<_> = f.type_identifiers().iter().map(|t| t.text.clone()).collect();
        assert_eq!(idents, vec!["Real", "Integer"]);
    }

    #[test]
    fn test_property_bodies() {
        let f = Feature::Property(PropertyFeature {
            name: ident("magnitude"),
            declared: TypeIdentifier::new("Real", test_span()),
            getter: OptionalBody::assigned(Body::new(test_span())),
            setter: OptionalBody::absent(),
            entity_type: OnceRef::new(),
        });
        assert_eq!(f.bodies().len(), 1);
        assert_eq!(f.kind().name(), "property");
    }
}
