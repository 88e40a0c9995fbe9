// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Rule-readiness resolution engine for the Alder compiler front end.
//!
//! Semantic analysis over a class/feature AST cannot run in a fixed pass
//! order: a type waits on a class's generic table, a feature's type on its
//! declaration, a dotted path on every feature along the way. Instead of a
//! hand-written traversal, this crate re-evaluates a set of declarative
//! rules — each guarded by source templates that say when its inputs are
//! final — until a full pass makes no further progress.
//!
//! - [`template`] — readiness predicates over write-once cells, seal-once
//!   collections, type identifiers, and anchored feature paths
//! - [`rules`] — the rules composing those templates, and their effects
//! - [`engine`] — the bounded fixpoint driver
//! - [`error`] — diagnostics, their list, and the source-snippet formatter

pub mod engine;
pub mod error;
pub mod rules;
pub mod template;

pub use engine::{resolve, SolveReport, Solver, SolverConfig};
pub use error::{Diagnostic, DiagnosticFormatter, DiagnosticKind, DiagnosticList, Severity};
pub use template::{Readiness, SourceTemplate};
