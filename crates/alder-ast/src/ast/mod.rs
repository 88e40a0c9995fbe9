//! The class/feature node model.
//!
//! This is the tree the resolution engine operates over: classes owning
//! sealable declaration tables, features as a closed sum over the seven
//! feature kinds, manifest literal expressions, and the semantic type
//! values that resolution produces.
//!
//! Nodes accumulate resolution state in place: every derived fact lives in
//! an [`OnceRef`](crate::foundation::OnceRef) or behind a seal, so partial
//! knowledge is observable and never retracted.

pub mod class;
pub mod expr;
pub mod feature;
pub mod types;

pub use class::{
    AnchoredType, Class, Discrete, Export, GenericParameter, ImportedClass, Typedef,
};
pub use expr::{Expression, ManifestValue};
pub use feature::{
    AttributeFeature, Body, ConstantFeature, CreationFeature, Feature, FeatureKind,
    FunctionFeature, IndexerFeature, Local, OptionalBody, ProcedureFeature, PropertyFeature,
};
pub use types::{
    Builtin, ClassType, EntityType, FormalGenericType, Resolution, ResolvedType, TypeIdentifier,
    TypeName,
};
