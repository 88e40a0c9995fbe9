//! Templates over seal-once collections.
//!
//! Sealing, not emptiness, gates readiness: an empty sealed table is ready
//! immediately, an unsealed table with entries is not.

use alder_ast::foundation::{SealableList, SealableMap};
use alder_ast::Model;
use std::hash::Hash;

use super::{Readiness, SourceTemplate};

/// Readiness of a single seal-once list.
///
/// Ready when sealed; the payload is the (cloned) collection.
pub struct SealedListTemplate<N, T> {
    list: for<'a> fn(&'a N) -> &'a SealableList<T>,
}

impl<N, T: Clone> SealedListTemplate<N, T> {
    /// Create a sealed-list template.
    pub fn new(list: for<'a> fn(&'a N) -> &'a SealableList<T>) -> Self {
        Self { list }
    }
}

impl<N, T: Clone> SourceTemplate<N> for SealedListTemplate<N, T> {
    type Payload = SealableList<T>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<SealableList<T>> {
        let list = (self.list)(node);
        if list.is_sealed() {
            Readiness::Ready(Some(list.clone()))
        } else {
            Readiness::NotReady
        }
    }
}

/// Readiness of a single seal-once table.
///
/// Ready when sealed; the payload is the (cloned) collection.
pub struct SealedTableTemplate<N, K, V> {
    table: for<'a> fn(&'a N) -> &'a SealableMap<K, V>,
}

impl<N, K: Clone + Hash + Eq, V: Clone> SealedTableTemplate<N, K, V> {
    /// Create a sealed-table template.
    pub fn new(table: for<'a> fn(&'a N) -> &'a SealableMap<K, V>) -> Self {
        Self { table }
    }
}

impl<N, K: Clone + Hash + Eq, V: Clone> SourceTemplate<N> for SealedTableTemplate<N, K, V> {
    type Payload = SealableMap<K, V>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<SealableMap<K, V>> {
        let table = (self.table)(node);
        if table.is_sealed() {
            Readiness::Ready(Some(table.clone()))
        } else {
            Readiness::NotReady
        }
    }
}

/// Readiness of a collection of items, each exposing a seal-once table.
///
/// Ready when every item's table is sealed; the payload is the (cloned)
/// collections in item order.
pub struct SealedTableListTemplate<N, I, K, V> {
    items: for<'a> fn(&'a N) -> Vec<&'a I>,
    table: for<'a> fn(&'a I) -> &'a SealableMap<K, V>,
}

impl<N, I, K: Clone + Hash + Eq, V: Clone> SealedTableListTemplate<N, I, K, V> {
    /// Create a sealed-table-list template.
    pub fn new(
        items: for<'a> fn(&'a N) -> Vec<&'a I>,
        table: for<'a> fn(&'a I) -> &'a SealableMap<K, V>,
    ) -> Self {
        Self { items, table }
    }
}

impl<N, I, K: Clone + Hash + Eq, V: Clone> SourceTemplate<N>
    for SealedTableListTemplate<N, I, K, V>
{
    type Payload = Vec<SealableMap<K, V>>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<Vec<SealableMap<K, V>>> {
        let mut tables = Vec::new();
        for item in (self.items)(node) {
            let table = (self.table)(item);
            if !table.is_sealed() {
                return Readiness::NotReady;
            }
            tables.push(table.clone());
        }
        Readiness::Ready(Some(tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bin {
        names: SealableList<String>,
        index: SealableMap<String, u32>,
    }

    fn bin() -> Bin {
        Bin {
            names: SealableList::new(),
            index: SealableMap::new(),
        }
    }

    #[test]
    fn test_empty_sealed_table_is_ready() {
        // Sealing gates readiness, not emptiness.
        let mut b = bin();
        let template: SealedTableTemplate<Bin, String, u32> =
            SealedTableTemplate::new(|b| &b.index);
        let model = Model::new();

        assert_eq!(template.is_ready(&b, &model), Readiness::NotReady);

        b.index.seal();
        let payload = template.is_ready(&b, &model).payload().unwrap();
        assert!(payload.is_sealed());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_unsealed_list_with_items_is_not_ready() {
        let mut b = bin();
        b.names.push("x".to_string());
        let template: SealedListTemplate<Bin, String> = SealedListTemplate::new(|b| &b.names);
        let model = Model::new();

        assert_eq!(template.is_ready(&b, &model), Readiness::NotReady);

        b.names.seal();
        let payload = template.is_ready(&b, &model).payload().unwrap();
        assert_eq!(payload.items(), &["x".to_string()]);
    }

    #[test]
    fn test_table_list_waits_for_every_item() {
        struct Owner {
            bins: Vec<Bin>,
        }
        let mut owner = Owner {
            bins: vec![bin(), bin()],
        };
        let template: SealedTableListTemplate<Owner, Bin, String, u32> =
            SealedTableListTemplate::new(|o| o.bins.iter().collect(), |b| &b.index);
        let model = Model::new();

        owner.bins[0].index.seal();
        assert_eq!(template.is_ready(&owner, &model), Readiness::NotReady);

        owner.bins[1].index.seal();
        let payload = template.is_ready(&owner, &model).payload().unwrap();
        assert_eq!(payload.len(), 2);
    }
}
