//! Classes and their declaration tables.
//!
//! A class owns every table the analyzer consults: imported classes,
//! formal generic parameters, typedefs, export groups, discrete members,
//! and the local and inherited-flattened feature tables. Each table is
//! seal-once: populated while declarations are scanned, sealed by the rule
//! that determines its contents are final, and gated on by every readiness
//! predicate downstream.

use crate::foundation::{DotPath, Identifier, OnceRef, SealableList, SealableMap, Span};
use crate::model::{ClassId, FeatureId, FeatureRef};

use super::expr::Expression;
use super::feature::Feature;
use super::types::{ClassType, EntityType, Resolution, TypeIdentifier, TypeName};

/// An entry of a class's import table.
#[derive(Debug, Clone)]
pub struct ImportedClass {
    /// The imported class
    pub class: ClassId,
    /// Location of the import declaration
    pub span: Span,
}

/// A formal generic parameter of a class.
#[derive(Debug, Clone)]
pub struct GenericParameter {
    pub name: Identifier,
}

/// A local type alias.
#[derive(Debug, Clone)]
pub struct Typedef {
    pub name: Identifier,
    /// The aliased type as written; resolution chains through its
    /// `resolved` cell
    pub target: TypeIdentifier,
}

/// A named export group.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: Identifier,
    /// Features exported under this group
    pub features: Vec<Identifier>,
}

/// A discrete (enumeration-like) member with a manifest value.
#[derive(Debug, Clone)]
pub struct Discrete {
    pub name: Identifier,
    pub literal: Expression,
}

/// An anchored type declaration: `like a.b.c`.
///
/// The dotted chain is resolved by walking feature tables; the final
/// step's entity type becomes the declared type.
#[derive(Debug, Clone)]
pub struct AnchoredType {
    /// The dotted identifier chain
    pub path: DotPath,
    /// The anchor's entity type, once the walk completes
    pub resolved: OnceRef<Resolution<EntityType>>,
}

impl AnchoredType {
    /// Create an unresolved anchored type.
    pub fn new(path: DotPath) -> Self {
        Self {
            path,
            resolved: OnceRef::new(),
        }
    }
}

/// A class declaration with its accumulated resolution state.
#[derive(Debug, Clone)]
pub struct Class {
    /// Declared class name
    pub name: Identifier,
    /// Location of the declaration
    pub span: Span,
    /// Direct parent classes, sealed once the inheritance clause is final
    pub parents: SealableList<ClassId>,
    /// Imported classes by name
    pub import_table: SealableMap<String, ImportedClass>,
    /// Formal generic parameters by name
    pub generic_table: SealableMap<String, GenericParameter>,
    /// Local typedefs by name
    pub typedef_table: SealableMap<String, Typedef>,
    /// Export groups by name
    pub export_table: SealableMap<String, Export>,
    /// Discrete members by name
    pub discrete_table: SealableMap<String, Discrete>,
    /// This class's own features; table entries refer into this arena so
    /// local and inherited views share one resolution state
    pub features: Vec<Feature>,
    /// Features declared in this class, by name
    pub local_feature_table: SealableMap<String, FeatureRef>,
    /// Local plus inherited features, by name; sealed once inheritance
    /// is flattened
    pub feature_table: SealableMap<String, FeatureRef>,
    /// Summary of resolved feature types, sealed once every data-bearing
    /// feature's entity type is known
    pub resolved_feature_types: SealableMap<String, TypeName>,
    /// Anchored type declarations of this class
    pub anchored_types: Vec<AnchoredType>,
    /// The class's compiled type
    pub resolved_type: OnceRef<ClassType>,
}

impl Class {
    /// Create a class with empty, unsealed tables.
    pub fn new(name: Identifier) -> Self {
        let span = name.span;
        Self {
            name,
            span,
            parents: SealableList::new(),
            import_table: SealableMap::new(),
            generic_table: SealableMap::new(),
            typedef_table: SealableMap::new(),
            export_table: SealableMap::new(),
            discrete_table: SealableMap::new(),
            features: Vec::new(),
            local_feature_table: SealableMap::new(),
            feature_table: SealableMap::new(),
            resolved_feature_types: SealableMap::new(),
            anchored_types: Vec::new(),
            resolved_type: OnceRef::new(),
        }
    }

    /// Access one of this class's own features.
    pub fn feature(&self, id: FeatureId) -> &Feature {
        &self.features[id.index()]
    }

    /// Mutable access to one of this class's own features.
    pub fn feature_mut(&mut self, id: FeatureId) -> &mut Feature {
        &mut self.features[id.index()]
    }

    /// Whether every declaration table is sealed.
    ///
    /// Covers the tables populated directly from the declaration scan;
    /// the flattened feature table and the resolved summary table are
    /// sealed later, by their own rules.
    pub fn declaration_tables_sealed(&self) -> bool {
        self.parents.is_sealed()
            && self.import_table.is_sealed()
            && self.generic_table.is_sealed()
            && self.typedef_table.is_sealed()
            && self.export_table.is_sealed()
            && self.discrete_table.is_sealed()
            && self.local_feature_table.is_sealed()
    }
}
