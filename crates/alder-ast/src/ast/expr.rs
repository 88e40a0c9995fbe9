//! Manifest literal expressions.
//!
//! The analyzer only needs the literal subset of the expression grammar:
//! constant declarations, attribute defaults, and discrete members carry a
//! manifest lexeme whose value is validated and recorded by a rule. The
//! full expression tree is owned by the parser and is out of scope here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::foundation::{OnceRef, Span};

use super::types::Resolution;

/// A validated manifest constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ManifestValue {
    /// Integer literal, e.g. `42`
    Integer(i64),
    /// Real literal, e.g. `3.25`
    Real(f64),
}

impl fmt::Display for ManifestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestValue::Integer(n) => write!(f, "{n}"),
            ManifestValue::Real(x) => write!(f, "{x}"),
        }
    }
}

/// A manifest literal expression, e.g. the `42` in `limit: Natural = 42`.
#[derive(Debug, Clone)]
pub struct Expression {
    /// Raw lexeme as written in source
    pub lexeme: String,
    /// Source location
    pub span: Span,
    /// Validated value, once the manifest rule has run
    pub value: OnceRef<Resolution<ManifestValue>>,
}

impl Expression {
    /// Create an unvalidated manifest expression.
    pub fn new(lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            lexeme: lexeme.into(),
            span,
            value: OnceRef::new(),
        }
    }
}
