//! The compilation-unit model: an arena of classes.
//!
//! Classes refer to each other by [`ClassId`] and feature-table entries
//! refer to features by [`FeatureRef`], so an inherited entry and the
//! local entry of the declaring class observe the same write-once
//! resolution state. The model is the single shared mutable resource of
//! the analyzer; rules mutate it one at a time and templates only read it.

use serde::{Deserialize, Serialize};

use crate::ast::class::Class;
use crate::ast::feature::Feature;
use crate::ast::types::Builtin;
use crate::foundation::{Identifier, SourceMap, Span};

/// Index of a class in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId(usize);

impl ClassId {
    /// The underlying index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a feature within its declaring class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(usize);

impl FeatureId {
    /// The underlying index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A feature-table entry: the declaring class plus the feature's index.
///
/// Flattened feature tables contain refs into ancestor classes, so a
/// feature resolved once in its declaring class is resolved everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureRef {
    /// Declaring class
    pub class: ClassId,
    /// Feature index within the declaring class
    pub feature: FeatureId,
}

/// All classes of a compilation unit.
#[derive(Debug)]
pub struct Model {
    classes: Vec<Class>,
    builtins: Vec<ClassId>,
    /// Source files, for diagnostic rendering
    pub sources: SourceMap,
}

impl Model {
    /// Create a model with the built-in root classes registered.
    ///
    /// Builtins are ordinary classes: their tables start unsealed and the
    /// same rules that process user classes seal them and assign their
    /// compiled types.
    pub fn new() -> Self {
        let mut model = Self {
            classes: Vec::new(),
            builtins: Vec::new(),
            sources: SourceMap::new(),
        };
        for builtin in Builtin::ALL {
            let id = model.add_class(Identifier::new(builtin.name(), Span::zero(0)));
            model.builtins.push(id);
        }
        model
    }

    /// Add a class and return its id.
    pub fn add_class(&mut self, name: Identifier) -> ClassId {
        let id = ClassId(self.classes.len());
        self.classes.push(Class::new(name));
        id
    }

    /// Add a feature to a class, recording it in the local feature table.
    ///
    /// # Panics
    /// Panics if the class's local feature table is already sealed.
    pub fn add_feature(&mut self, class: ClassId, feature: Feature) -> FeatureId {
        let name = feature.name().text.clone();
        let class_node = self.class_mut(class);
        let id = FeatureId(class_node.features.len());
        class_node.features.push(feature);
        class_node
            .local_feature_table
            .insert(name, FeatureRef { class, feature: id });
        id
    }

    /// Access a class.
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    /// Mutable access to a class.
    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0]
    }

    /// Access a feature through a table entry.
    pub fn feature(&self, fref: FeatureRef) -> &Feature {
        self.class(fref.class).feature(fref.feature)
    }

    /// Mutable access to a feature through a table entry.
    pub fn feature_mut(&mut self, fref: FeatureRef) -> &mut Feature {
        self.class_mut(fref.class).feature_mut(fref.feature)
    }

    /// Iterate all classes with their ids.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId(i), c))
    }

    /// Number of classes, builtins included.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// The id of a built-in root class.
    pub fn builtin(&self, builtin: Builtin) -> ClassId {
        self.builtins[Builtin::ALL
            .iter()
            .position(|b| *b == builtin)
            .expect("builtin is registered")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::feature::{CreationFeature, Feature};

    #[test]
    fn test_builtins_registered() {
        let model = Model::new();
        assert_eq!(model.class_count(), 3);
        let any = model.builtin(Builtin::Any);
        assert_eq!(model.class(any).name.text, "Any");
        assert!(!model.class(any).declaration_tables_sealed());
    }

    #[test]
    fn test_add_feature_records_local_entry() {
        let mut model = Model::new();
        let class = model.add_class(Identifier::new("Point", Span::zero(0)));
        let id = model.add_feature(
            class,
            Feature::Creation(CreationFeature {
                name: Identifier::new("make", Span::zero(0)),
            }),
        );
        let entry = model
            .class(class)
            .local_feature_table
            .get("make")
            .copied()
            .unwrap();
        assert_eq!(entry.class, class);
        assert_eq!(entry.feature, id);
        assert_eq!(model.feature(entry).name().text, "make");
    }
}
