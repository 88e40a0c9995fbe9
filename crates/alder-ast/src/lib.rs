// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST and foundation types for the Alder compiler front end.
//!
//! This crate defines the class/feature node model the semantic analyzer
//! operates over, together with the foundation primitives that make partial
//! resolution state observable and non-retractable:
//!
//! - [`foundation::OnceRef`] — a write-once cell
//! - [`foundation::SealableMap`] / [`foundation::SealableList`] — collections
//!   that become permanently immutable once sealed
//! - [`foundation::Span`] / [`foundation::SourceMap`] — compact source
//!   locations for diagnostics
//!
//! Resolution itself lives in `alder-resolve`; this crate carries no
//! analysis logic, only the data the analyzer reads and mutates.

pub mod ast;
pub mod foundation;
pub mod model;

pub use ast::*;
pub use foundation::{
    DotPath, Identifier, OnceRef, SealableList, SealableMap, SourceFile, SourceMap, Span,
};
pub use model::{ClassId, FeatureId, FeatureRef, Model};
