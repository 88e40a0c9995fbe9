//! Templates over write-once cells.

use alder_ast::foundation::SealableMap;
use alder_ast::Model;
use std::hash::Hash;

use super::{identity, OnceFn, Readiness, SourceTemplate, StartFn};

/// Readiness of a single write-once cell, reached through an optional
/// starting-point indirection.
///
/// Ready when the cell is assigned; the payload is the assigned value.
/// A missing starting-point context, or a context without the target cell,
/// is vacuous readiness.
pub struct OnceRefTemplate<N, C, T> {
    start: StartFn<N, C>,
    target: OnceFn<C, T>,
}

impl<N, T: Clone> OnceRefTemplate<N, N, T> {
    /// Template with no indirection: the node is the context.
    pub fn direct(target: OnceFn<N, T>) -> Self {
        Self {
            start: identity::<N>,
            target,
        }
    }
}

impl<N, C, T: Clone> OnceRefTemplate<N, C, T> {
    /// Template with a starting-point indirection.
    pub fn via(start: StartFn<N, C>, target: OnceFn<C, T>) -> Self {
        Self { start, target }
    }
}

impl<N, C, T: Clone> SourceTemplate<N> for OnceRefTemplate<N, C, T> {
    type Payload = T;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<T> {
        let Some(context) = (self.start)(node) else {
            return Readiness::Ready(None);
        };
        let Some(cell) = (self.target)(context) else {
            return Readiness::Ready(None);
        };
        match cell.get() {
            Some(value) => Readiness::Ready(Some(value.clone())),
            None => Readiness::NotReady,
        }
    }
}

/// Readiness of a list of items, each exposing a write-once cell.
///
/// Ready when every applicable item's cell is assigned; the payload is the
/// dereferenced values in source order. Items without the cell (the
/// accessor returns `None`) are skipped.
pub struct OnceRefListTemplate<N, I, T> {
    items: for<'a> fn(&'a N) -> &'a [I],
    item: OnceFn<I, T>,
}

impl<N, I, T: Clone> OnceRefListTemplate<N, I, T> {
    /// Create a list template.
    pub fn new(items: for<'a> fn(&'a N) -> &'a [I], item: OnceFn<I, T>) -> Self {
        Self { items, item }
    }
}

impl<N, I, T: Clone> SourceTemplate<N> for OnceRefListTemplate<N, I, T> {
    type Payload = Vec<T>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<Vec<T>> {
        let mut values = Vec::new();
        for it in (self.items)(node) {
            let Some(cell) = (self.item)(it) else {
                continue;
            };
            match cell.get() {
                Some(value) => values.push(value.clone()),
                None => return Readiness::NotReady,
            }
        }
        Readiness::Ready(Some(values))
    }
}

/// Readiness of a keyed table of items, each exposing a write-once cell.
///
/// Ready when the table is sealed and every applicable entry's cell is
/// assigned; the payload is the values in table order.
pub struct OnceRefTableTemplate<N, K, V, T> {
    table: for<'a> fn(&'a N) -> &'a SealableMap<K, V>,
    entry: OnceFn<V, T>,
}

impl<N, K: Hash + Eq, V, T: Clone> OnceRefTableTemplate<N, K, V, T> {
    /// Create a table template.
    pub fn new(
        table: for<'a> fn(&'a N) -> &'a SealableMap<K, V>,
        entry: OnceFn<V, T>,
    ) -> Self {
        Self { table, entry }
    }
}

impl<N, K: Hash + Eq, V, T: Clone> SourceTemplate<N> for OnceRefTableTemplate<N, K, V, T> {
    type Payload = Vec<T>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<Vec<T>> {
        let table = (self.table)(node);
        if !table.is_sealed() {
            return Readiness::NotReady;
        }
        let mut values = Vec::new();
        for value in table.values() {
            let Some(cell) = (self.entry)(value) else {
                continue;
            };
            match cell.get() {
                Some(v) => values.push(v.clone()),
                None => return Readiness::NotReady,
            }
        }
        Readiness::Ready(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alder_ast::foundation::OnceRef;

    struct Part {
        value: OnceRef<u32>,
    }

    struct Gadget {
        tag: OnceRef<u32>,
        parts: Vec<Part>,
        table: SealableMap<String, Part>,
    }

    fn gadget() -> Gadget {
        Gadget {
            tag: OnceRef::new(),
            parts: Vec::new(),
            table: SealableMap::new(),
        }
    }

    fn tag_template() -> OnceRefTemplate<Gadget, Gadget, u32> {
        OnceRefTemplate::direct(|g| Some(&g.tag))
    }

    #[test]
    fn test_unassigned_then_assigned() {
        // Not ready over an unassigned cell; ready with the value after
        // the single assignment.
        let mut g = gadget();
        let template = tag_template();
        let model = Model::new();

        assert_eq!(template.is_ready(&g, &model), Readiness::NotReady);

        g.tag.assign(42);
        assert_eq!(template.is_ready(&g, &model), Readiness::Ready(Some(42)));
    }

    #[test]
    fn test_idempotent_re_evaluation() {
        let mut g = gadget();
        g.tag.assign(7);
        let template = tag_template();
        let model = Model::new();

        let first = template.is_ready(&g, &model);
        let second = template.is_ready(&g, &model);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_start_context_is_vacuous() {
        // A node with no starting-point context is vacuously ready, not
        // stalled.
        let g = gadget();
        let template: OnceRefTemplate<Gadget, Gadget, u32> =
            OnceRefTemplate::via(|_| None, |g| Some(&g.tag));
        assert_eq!(
            template.is_ready(&g, &Model::new()),
            Readiness::Ready(None)
        );
    }

    #[test]
    fn test_list_waits_for_every_item() {
        let mut g = gadget();
        g.parts.push(Part {
            value: OnceRef::new(),
        });
        g.parts.push(Part {
            value: OnceRef::new(),
        });
        let template: OnceRefListTemplate<Gadget, Part, u32> =
            OnceRefListTemplate::new(|g| &g.parts, |p| Some(&p.value));
        let model = Model::new();

        assert_eq!(template.is_ready(&g, &model), Readiness::NotReady);

        g.parts[0].value.assign(1);
        assert_eq!(template.is_ready(&g, &model), Readiness::NotReady);

        g.parts[1].value.assign(2);
        assert_eq!(
            template.is_ready(&g, &model),
            Readiness::Ready(Some(vec![1, 2]))
        );
    }

    #[test]
    fn test_empty_list_is_ready() {
        let g = gadget();
        let template: OnceRefListTemplate<Gadget, Part, u32> =
            OnceRefListTemplate::new(|g| &g.parts, |p| Some(&p.value));
        assert_eq!(
            template.is_ready(&g, &Model::new()),
            Readiness::Ready(Some(vec![]))
        );
    }

    #[test]
    fn test_table_gated_on_seal_and_entries() {
        let mut g = gadget();
        g.table.insert(
            "a".to_string(),
            Part {
                value: OnceRef::new(),
            },
        );
        let template: OnceRefTableTemplate<Gadget, String, Part, u32> =
            OnceRefTableTemplate::new(|g| &g.table, |p| Some(&p.value));
        let model = Model::new();

        // Unsealed table: more entries could still appear.
        assert_eq!(template.is_ready(&g, &model), Readiness::NotReady);

        g.table.get_mut("a").unwrap().value.assign(5);
        assert_eq!(template.is_ready(&g, &model), Readiness::NotReady);

        g.table.seal();
        assert_eq!(
            template.is_ready(&g, &model),
            Readiness::Ready(Some(vec![5]))
        );
    }
}
