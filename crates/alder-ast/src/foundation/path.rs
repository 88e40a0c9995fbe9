//! Identifiers and dotted feature paths.
//!
//! An [`Identifier`] carries pre-validated text together with its source
//! span. A [`DotPath`] is the payload of an anchored type declaration: a
//! non-empty chain of identifiers (`a.b.c`) whose final resolved type is
//! inferred by walking feature tables step by step.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::span::Span;

/// A validated identifier with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// Validated identifier text
    pub text: String,
    /// Source location for error messages
    pub span: Span,
}

impl Identifier {
    /// Create a new identifier.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A non-empty dotted identifier chain, e.g. `origin.distance.magnitude`.
///
/// Each step keeps its own span so path diagnostics point at the offending
/// step rather than the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotPath {
    steps: Vec<Identifier>,
}

impl DotPath {
    /// Create a path from its steps.
    ///
    /// # Panics
    /// Panics if `steps` is empty; a path always has at least one step.
    pub fn new(steps: Vec<Identifier>) -> Self {
        assert!(!steps.is_empty(), "dot path must have at least one step");
        Self { steps }
    }

    /// The steps, in source order.
    pub fn steps(&self) -> &[Identifier] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; a path has at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The final step.
    pub fn last(&self) -> &Identifier {
        self.steps.last().expect("dot path is non-empty")
    }

    /// Span covering the whole chain.
    pub fn span(&self) -> Span {
        let first = self.steps.first().expect("dot path is non-empty");
        first.span.merge(&self.last().span)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.steps {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", step.text)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(text: &str, start: u32) -> Identifier {
        let end = start + text.len() as u32;
        Identifier::new(text, Span::new(0, start, end, 1))
    }

    #[test]
    fn test_display() {
        let path = DotPath::new(vec![ident("a", 0), ident("b", 2), ident("c", 4)]);
        assert_eq!(path.to_string(), "a.b.c");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last().text, "c");
    }

    #[test]
    fn test_span_covers_chain() {
        let path = DotPath::new(vec![ident("origin", 0), ident("distance", 7)]);
        let span = path.span();
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 15);
    }

    #[test]
    #[should_panic(expected = "at least one step")]
    fn test_empty_path_panics() {
        let _ = DotPath::new(vec![]);
    }
}
