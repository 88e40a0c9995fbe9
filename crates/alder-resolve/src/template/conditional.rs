//! Templates over conditionally-assigned references.
//!
//! An [`OptionalBody`] is present or absent as a fact of the model, not as
//! a stage of resolution. An absent part therefore satisfies the
//! constraint vacuously; only a present part whose nested state is still
//! pending makes the template wait.

use alder_ast::ast::feature::OptionalBody;
use alder_ast::foundation::{OnceRef, SealableMap};
use alder_ast::Model;
use std::hash::Hash;

use super::{Readiness, SourceTemplate};

/// Accessor from a node to its optional part.
///
/// Returning `None` means items of this shape carry no such part at all
/// (vacuous), as opposed to `Some(absent)` where the part is modeled but
/// not declared.
pub type OptionalFn<N, B> = for<'a> fn(&'a N) -> Option<&'a OptionalBody<B>>;

/// Readiness of an optional part wrapping a write-once cell.
///
/// Ready with no payload when the optional is unassigned; ready with the
/// nested value when the optional is assigned and the nested cell is too.
pub struct ConditionalOnceRefTemplate<N, B, T> {
    optional: OptionalFn<N, B>,
    nested: for<'a> fn(&'a B) -> &'a OnceRef<T>,
}

impl<N, B, T: Clone> ConditionalOnceRefTemplate<N, B, T> {
    /// Create a conditional template.
    pub fn new(optional: OptionalFn<N, B>, nested: for<'a> fn(&'a B) -> &'a OnceRef<T>) -> Self {
        Self { optional, nested }
    }
}

impl<N, B, T: Clone> SourceTemplate<N> for ConditionalOnceRefTemplate<N, B, T> {
    type Payload = T;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<T> {
        let Some(optional) = (self.optional)(node) else {
            return Readiness::Ready(None);
        };
        let Some(inner) = optional.get() else {
            return Readiness::Ready(None);
        };
        match (self.nested)(inner).get() {
            Some(value) => Readiness::Ready(Some(value.clone())),
            None => Readiness::NotReady,
        }
    }
}

/// Readiness of an optional part wrapping a seal-once table.
///
/// Ready with no payload when the optional is unassigned; ready with the
/// (cloned) table when the optional is assigned and the table is sealed.
pub struct ConditionalSealedTableTemplate<N, B, K, V> {
    optional: OptionalFn<N, B>,
    nested: for<'a> fn(&'a B) -> &'a SealableMap<K, V>,
}

impl<N, B, K: Clone + Hash + Eq, V: Clone> ConditionalSealedTableTemplate<N, B, K, V> {
    /// Create a conditional sealed-table template.
    pub fn new(
        optional: OptionalFn<N, B>,
        nested: for<'a> fn(&'a B) -> &'a SealableMap<K, V>,
    ) -> Self {
        Self { optional, nested }
    }
}

impl<N, B, K: Clone + Hash + Eq, V: Clone> SourceTemplate<N>
    for ConditionalSealedTableTemplate<N, B, K, V>
{
    type Payload = SealableMap<K, V>;

    fn is_ready(&self, node: &N, _model: &Model) -> Readiness<SealableMap<K, V>> {
        let Some(optional) = (self.optional)(node) else {
            return Readiness::Ready(None);
        };
        let Some(inner) = optional.get() else {
            return Readiness::Ready(None);
        };
        let table = (self.nested)(inner);
        if table.is_sealed() {
            Readiness::Ready(Some(table.clone()))
        } else {
            Readiness::NotReady
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        value: OnceRef<u32>,
        locals: SealableMap<String, u32>,
    }

    fn inner() -> Inner {
        Inner {
            value: OnceRef::new(),
            locals: SealableMap::new(),
        }
    }

    struct Holder {
        part: OptionalBody<Inner>,
    }

    fn value_template() -> ConditionalOnceRefTemplate<Holder, Inner, u32> {
        ConditionalOnceRefTemplate::new(|h| Some(&h.part), |i| &i.value)
    }

    #[test]
    fn test_absent_part_is_vacuously_ready() {
        let holder = Holder {
            part: OptionalBody::absent(),
        };
        assert_eq!(
            value_template().is_ready(&holder, &Model::new()),
            Readiness::Ready(None)
        );
    }

    #[test]
    fn test_present_part_waits_for_nested_cell() {
        let mut holder = Holder {
            part: OptionalBody::assigned(inner()),
        };
        let template = value_template();
        let model = Model::new();

        assert_eq!(template.is_ready(&holder, &model), Readiness::NotReady);

        holder.part.get_mut().unwrap().value.assign(9);
        assert_eq!(template.is_ready(&holder, &model), Readiness::Ready(Some(9)));
    }

    #[test]
    fn test_present_part_waits_for_nested_seal() {
        let mut holder = Holder {
            part: OptionalBody::assigned(inner()),
        };
        let template: ConditionalSealedTableTemplate<Holder, Inner, String, u32> =
            ConditionalSealedTableTemplate::new(|h| Some(&h.part), |i| &i.locals);
        let model = Model::new();

        assert_eq!(template.is_ready(&holder, &model), Readiness::NotReady);

        holder.part.get_mut().unwrap().locals.seal();
        let payload = template.is_ready(&holder, &model).payload().unwrap();
        assert!(payload.is_sealed());
    }
}
