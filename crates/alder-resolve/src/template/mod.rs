//! Source templates: declarative readiness predicates over the AST.
//!
//! A source template expresses one dependency of a semantic rule as a
//! navigable path plus a readiness predicate: starting from a node, apply
//! an optional starting-point indirection to obtain a context, walk typed
//! accessors to a target, and report whether the target is final. A rule
//! holds one or more templates and is ready only when all of them are.
//!
//! Evaluating a template is a pure read. Because every target is a
//! write-once cell or a seal-once collection, readiness is monotonic: once
//! a template reports ready for a node it reports ready forever, with the
//! same payload.
//!
//! # Readiness channels
//!
//! [`Readiness`] keeps two outcomes that are easy to conflate strictly
//! apart:
//!
//! - `NotReady` — the dependency exists but is not finalized; the solver
//!   retries on a later pass.
//! - `Ready(None)` — the constraint does not apply to this node (the
//!   starting-point indirection found no context, or an optional part is
//!   absent from the model). Vacuously satisfied, never retried.
//!
//! Collapsing these would either stall forever on optional contexts or
//! silently treat a real stall as satisfied.
//!
//! Navigation is captured at template construction as plain function
//! pointers, so a template built once at rule registration is reused
//! across every node of the matching kind with no per-node setup.

pub mod anchored;
pub mod conditional;
pub mod once_ref;
pub mod sealed;
pub mod type_name;

use alder_ast::foundation::OnceRef;
use alder_ast::Model;

pub use anchored::{AnchoredPathTemplate, PathResolution};
pub use conditional::{ConditionalOnceRefTemplate, ConditionalSealedTableTemplate};
pub use once_ref::{OnceRefListTemplate, OnceRefTableTemplate, OnceRefTemplate};
pub use sealed::{SealedListTemplate, SealedTableListTemplate, SealedTableTemplate};
pub use type_name::{TypeNameOutcome, TypeNameTemplate};

/// Outcome of evaluating a template against a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<P> {
    /// The dependency exists but is not finalized; retry on a later pass.
    NotReady,
    /// The dependency is satisfied. `Some` carries the navigated payload;
    /// `None` means the constraint does not apply to this node.
    Ready(Option<P>),
}

impl<P> Readiness<P> {
    /// Whether the template is satisfied, vacuously or with a payload.
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    /// The payload, if ready with one.
    pub fn payload(self) -> Option<P> {
        match self {
            Readiness::Ready(p) => p,
            Readiness::NotReady => None,
        }
    }
}

/// A declarative (path, readiness-predicate) pair.
///
/// This is the whole surface rules see: they compose templates and call
/// `is_ready` uniformly, without knowing which variant they hold. The
/// driver in turn composes rules. Neither layer navigates the AST itself.
pub trait SourceTemplate<N: ?Sized> {
    /// What a successful navigation yields.
    type Payload;

    /// Evaluate the readiness predicate against `node`.
    ///
    /// Pure: never mutates the AST, and two calls without an intervening
    /// mutation return the same result.
    fn is_ready(&self, node: &N, model: &Model) -> Readiness<Self::Payload>;
}

/// Starting-point indirection: derive the navigation context from a node.
///
/// Returning `None` means the node has no such context (for example, it is
/// not embedded in a property); the template is then vacuously ready.
pub type StartFn<N, C> = for<'a> fn(&'a N) -> Option<&'a C>;

/// Accessor from a context to a write-once target cell.
///
/// Returning `None` means the context has no such cell (the constraint
/// does not apply to items of this shape).
pub type OnceFn<C, T> = for<'a> fn(&'a C) -> Option<&'a OnceRef<T>>;

/// Identity starting point: the node is its own context.
pub fn identity<N>(node: &N) -> Option<&N> {
    Some(node)
}
