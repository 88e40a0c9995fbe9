//! Semantic type values produced by resolution.
//!
//! Type identifiers in declarations start as bare text and are resolved by
//! the engine into [`ResolvedType`] values: either a compiled class type or
//! a formal generic parameter. Features additionally record an
//! [`EntityType`], the value the anchored-path walk navigates through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::foundation::{OnceRef, Span};
use crate::model::ClassId;

/// A rendered, resolution-produced type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name from rendered text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The rendered text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The compiled type of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    /// Rendered name, e.g. `Point`
    pub name: TypeName,
    /// The class this type was compiled from
    pub class: ClassId,
}

/// The type of a formal generic parameter, e.g. `T` in `List[T]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalGenericType {
    /// Parameter name as declared
    pub name: TypeName,
}

/// A resolved type: what a type identifier denotes after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// A class type, possibly reached through a typedef
    Class(ClassType),
    /// A formal generic parameter of the embedding class
    Generic(FormalGenericType),
}

impl ResolvedType {
    /// Rendered name of the type.
    pub fn name(&self) -> &TypeName {
        match self {
            ResolvedType::Class(c) => &c.name,
            ResolvedType::Generic(g) => &g.name,
        }
    }

    /// The class providing this type's feature table, if any.
    ///
    /// Formal generics have no feature table; a path cannot continue
    /// through them.
    pub fn base_class(&self) -> Option<ClassId> {
        match self {
            ResolvedType::Class(c) => Some(c.class),
            ResolvedType::Generic(_) => None,
        }
    }
}

/// The navigable type of a data-bearing feature.
///
/// Carries the rendered name plus the class whose feature table a dotted
/// path continues into (absent for types with no feature table, such as
/// formal generics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    /// Rendered type name
    pub name: TypeName,
    /// Class whose feature table continues a path through this feature
    pub base: Option<ClassId>,
}

impl EntityType {
    /// Entity type derived from a resolved type.
    pub fn from_resolved(ty: &ResolvedType) -> Self {
        Self {
            name: ty.name().clone(),
            base: ty.base_class(),
        }
    }
}

/// Outcome of a terminal resolution attempt, recorded on the AST.
///
/// `Failed` marks a node whose resolution produced a diagnostic; the
/// diagnostic was appended when the marker was assigned, so downstream
/// rules retire silently instead of reporting the same cause again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Resolution succeeded
    Known(T),
    /// Resolution failed; the diagnostic has already been reported
    Failed,
}

impl<T> Resolution<T> {
    /// The resolved value, if resolution succeeded.
    pub fn known(&self) -> Option<&T> {
        match self {
            Resolution::Known(v) => Some(v),
            Resolution::Failed => None,
        }
    }

    /// Whether resolution succeeded.
    pub fn is_known(&self) -> bool {
        matches!(self, Resolution::Known(_))
    }
}

/// A type identifier as written in a declaration, e.g. `Point` in
/// `origin: Point`.
#[derive(Debug, Clone)]
pub struct TypeIdentifier {
    /// Identifier text as written
    pub text: String,
    /// Source location
    pub span: Span,
    /// What the identifier denotes, once resolved
    pub resolved: OnceRef<Resolution<(TypeName, ResolvedType)>>,
}

impl TypeIdentifier {
    /// Create an unresolved type identifier.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            resolved: OnceRef::new(),
        }
    }
}

/// The built-in root classes every compilation unit starts from.
///
/// Matched case-insensitively during type-identifier resolution, before
/// the import table is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Root of the class hierarchy
    Any,
    /// Root of all reference types
    AnyReference,
    /// Root of all value types
    AnyValue,
}

impl Builtin {
    /// All builtins, in registration order.
    pub const ALL: [Builtin; 3] = [Builtin::Any, Builtin::AnyReference, Builtin::AnyValue];

    /// Canonical class name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Any => "Any",
            Builtin::AnyReference => "AnyReference",
            Builtin::AnyValue => "AnyValue",
        }
    }

    /// Case-insensitive lookup by identifier text.
    pub fn lookup(text: &str) -> Option<Builtin> {
        Builtin::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        assert_eq!(Builtin::lookup("Any"), Some(Builtin::Any));
        assert_eq!(Builtin::lookup("any"), Some(Builtin::Any));
        assert_eq!(Builtin::lookup("ANYVALUE"), Some(Builtin::AnyValue));
        assert_eq!(Builtin::lookup("anyreference"), Some(Builtin::AnyReference));
        assert_eq!(Builtin::lookup("Point"), None);
    }

    #[test]
    fn test_entity_type_from_resolved() {
        let generic = ResolvedType::Generic(FormalGenericType {
            name: TypeName::new("T"),
        });
        let et = EntityType::from_resolved(&generic);
        assert_eq!(et.name.as_str(), "T");
        assert_eq!(et.base, None);
    }

    #[test]
    fn test_resolution_known() {
        let known: Resolution<i32> = Resolution::Known(3);
        assert!(known.is_known());
        assert_eq!(known.known(), Some(&3));
        let failed: Resolution<i32> = Resolution::Failed;
        assert!(!failed.is_known());
        assert_eq!(failed.known(), None);
    }
}
