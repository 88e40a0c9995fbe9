//! Seal-once collections.
//!
//! [`SealableMap`] and [`SealableList`] are ordinary containers that accept
//! insertion only until explicitly sealed, after which their membership is
//! permanently fixed and they report `is_sealed()`. Rules populate them
//! incrementally and
//! one rule seals each collection once every entry is known to be final;
//! readiness predicates downstream gate on the seal flag, never on entry
//! counts or other transient state.
//!
//! Mutating a sealed collection, or sealing twice, is a programming error
//! and panics.

use indexmap::IndexMap;
use std::hash::Hash;

/// A keyed table that becomes immutable once sealed.
///
/// Backed by an [`IndexMap`] so iteration order is deterministic, which
/// keeps diagnostics reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct SealableMap<K, V> {
    entries: IndexMap<K, V>,
    sealed: bool,
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for SealableMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.sealed == other.sealed && self.entries == other.entries
    }
}

impl<K: Hash + Eq, V> SealableMap<K, V> {
    /// Create an empty, unsealed table.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            sealed: false,
        }
    }

    /// Whether the table has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Insert an entry. Returns the previous value for the key, if any.
    ///
    /// # Panics
    /// Panics if the table is sealed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        assert!(!self.sealed, "insert into sealed table");
        self.entries.insert(key, value)
    }

    /// Seal the table, making it permanently immutable.
    ///
    /// # Panics
    /// Panics if the table is already sealed.
    pub fn seal(&mut self) {
        assert!(!self.sealed, "table sealed twice");
        self.sealed = true;
    }

    /// Look up an entry by key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Whether the table contains a key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Mutable access to a value.
    ///
    /// Sealing freezes the key set, not the values: entries are nodes
    /// whose own write-once state may still be assigned after the table
    /// is sealed.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key)
    }
}

/// An ordered list that becomes immutable once sealed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SealableList<T> {
    items: Vec<T>,
    sealed: bool,
}

impl<T> SealableList<T> {
    /// Create an empty, unsealed list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            sealed: false,
        }
    }

    /// Whether the list has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Append an item.
    ///
    /// # Panics
    /// Panics if the list is sealed.
    pub fn push(&mut self, item: T) {
        assert!(!self.sealed, "push onto sealed list");
        self.items.push(item);
    }

    /// Seal the list, making it permanently immutable.
    ///
    /// # Panics
    /// Panics if the list is already sealed.
    pub fn seal(&mut self) {
        assert!(!self.sealed, "list sealed twice");
        self.sealed = true;
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items, in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
