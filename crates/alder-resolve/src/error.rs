//! Diagnostics for the resolution engine.
//!
//! A [`Diagnostic`] is a plain value: a kind, a severity, a source span,
//! and a rendered message. Diagnostics are accumulated in an ordered,
//! append-only [`DiagnosticList`] at the compilation-unit level and never
//! thrown across rule boundaries; a rule that determines its input can
//! never be valid appends a diagnostic and retires instead of retrying.
//!
//! The modeled kinds are representative of a much larger taxonomy; the
//! engine itself only distinguishes [`DiagnosticKind::Internal`] (an engine
//! defect, reported when the retry budget is exhausted with nothing else to
//! say) from the language-level kinds.

use alder_ast::foundation::{SourceMap, Span};
use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Identifier does not name anything in the consulted table
    UnknownIdentifier,
    /// A no-result feature used as the final step of an anchored path
    NotAnAnchor,
    /// A generic class used without type arguments
    GenericWithoutArguments,
    /// Duplicate definition under one name
    DuplicateName,
    /// Circular dependency between declarations
    CyclicDependency,
    /// A manifest literal contains a character outside the literal grammar
    InvalidManifestCharacter,
    /// A manifest literal is not a well-formed number
    InvalidManifestNumber,
    /// Engine defect: resolution stalled without producing a diagnostic
    Internal,
}

impl DiagnosticKind {
    /// Human-readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownIdentifier => "unknown identifier",
            DiagnosticKind::NotAnAnchor => "not an anchor",
            DiagnosticKind::GenericWithoutArguments => "generic class without arguments",
            DiagnosticKind::DuplicateName => "duplicate name",
            DiagnosticKind::CyclicDependency => "cyclic dependency",
            DiagnosticKind::InvalidManifestCharacter => "invalid manifest character",
            DiagnosticKind::InvalidManifestNumber => "invalid manifest number",
            DiagnosticKind::Internal => "internal resolver error",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note
    Note,
    /// Code is valid but suspicious
    Warning,
    /// Compilation cannot succeed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A compilation diagnostic with source location and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of this diagnostic
    pub kind: DiagnosticKind,
    /// Severity level
    pub severity: Severity,
    /// Primary source location
    pub span: Span,
    /// Human-readable message
    pub message: String,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn new(kind: DiagnosticKind, span: Span, message: String) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            span,
            message,
            notes: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, span: Span, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(kind, span, message)
        }
    }

    /// Add a note or hint. Returns self for chaining.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Ordered, append-only list of diagnostics for a compilation unit.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList {
    items: Vec<Diagnostic>,
}

impl DiagnosticList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Append several diagnostics, preserving their order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Whether no diagnostic has been appended.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first appended diagnostic, if any.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.items.first()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate in append order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// Formats diagnostics with source context.
///
/// Produces `severity: kind: message`, the `file:line:col` location, the
/// source line with a caret underline, and any notes. Spans pointing at no
/// registered file (engine-level diagnostics) render the header only.
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    /// Create a formatter over a source map.
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Format one diagnostic.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}: {}: {}\n",
            diagnostic.severity,
            diagnostic.kind.name(),
            diagnostic.message
        ));

        if (diagnostic.span.file_id as usize) < self.sources.file_count() {
            let (line, col) = self.sources.line_col(&diagnostic.span);
            let path = self.sources.file_path(&diagnostic.span);
            output.push_str(&format!("  --> {}:{}:{}\n", path.display(), line, col));

            let file = self.sources.file(&diagnostic.span);
            if let Some(source_line) = file.line_text(line) {
                let source_line = source_line.trim_end_matches('\n');
                output.push_str("   |\n");
                output.push_str(&format!("{line:3} | {source_line}\n"));

                let start_col = col as usize;
                let span_len = diagnostic.span.len() as usize;
                let end_col = (start_col + span_len).min(source_line.len() + 1);
                let underline = " ".repeat(start_col.saturating_sub(1))
                    + &"^".repeat(end_col.saturating_sub(start_col).max(1));
                output.push_str(&format!("   | {underline}\n"));
            }
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = help: {note}\n"));
        }

        output
    }

    /// Format every diagnostic of a list, separated by blank lines.
    pub fn format_all(&self, diagnostics: &DiagnosticList) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
