//! Diagnostic types for translation errors, warnings, and hints.

use crate::span::{Label, Span};
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational hint
    Hint,
    /// Warning (translation proceeds)
    Warning,
    /// Error (the statement produces no output)
    Error,
}

impl Severity {
    /// Get the string representation for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Parse errors (P001-P099)
    /// The node source reported malformed input
    ParseError,

    // Lexical binding errors (B001-B099)
    /// A name was declared twice in the same scope
    DuplicateIdentifier,
    /// A name was written to (or `callee` used) without a declaration
    UndeclaredIdentifier,
    /// A `const` binding was written to
    ConstantAssignment,

    // Control flow errors (F001-F099)
    /// `break` with no enclosing loop and no destination
    InvalidBreak,
    /// `continue` with no enclosing loop and no destination
    InvalidContinue,
    /// Loop aggregator that has no runtime reduction function
    UnsupportedAggregation,

    // Structural errors (S001-S099)
    /// AST node kind without a translation rule
    UnsupportedNode,

    // Internal errors (I001-I099)
    /// Internal translator error
    InternalError,
}

/// Long-form explanation of an error code.
#[derive(Debug, Clone, Copy)]
pub struct Explanation {
    pub title: &'static str,
    pub description: &'static str,
    pub example: Option<&'static str>,
}

impl DiagnosticCode {
    /// Every code, in catalog order.
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::ParseError,
        Self::DuplicateIdentifier,
        Self::UndeclaredIdentifier,
        Self::ConstantAssignment,
        Self::InvalidBreak,
        Self::InvalidContinue,
        Self::UnsupportedAggregation,
        Self::UnsupportedNode,
        Self::InternalError,
    ];

    /// Get the error code string (e.g., "B001").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "P001",

            Self::DuplicateIdentifier => "B001",
            Self::UndeclaredIdentifier => "B002",
            Self::ConstantAssignment => "B003",

            Self::InvalidBreak => "F001",
            Self::InvalidContinue => "F002",
            Self::UnsupportedAggregation => "F003",

            Self::UnsupportedNode => "S001",

            Self::InternalError => "I001",
        }
    }

    /// Look a code up by its string form.
    pub fn parse(code: &str) -> Option<DiagnosticCode> {
        let code = code.trim().to_ascii_uppercase();
        Self::ALL.iter().copied().find(|c| c.as_str() == code)
    }

    /// Human-readable category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::ParseError => "parse",
            Self::DuplicateIdentifier | Self::UndeclaredIdentifier | Self::ConstantAssignment => {
                "lexical binding"
            }
            Self::InvalidBreak | Self::InvalidContinue | Self::UnsupportedAggregation => {
                "control flow"
            }
            Self::UnsupportedNode => "structural",
            Self::InternalError => "internal",
        }
    }

    /// Get the default severity for this error code.
    pub fn default_severity(&self) -> Severity {
        // Every translation failure drops the statement, so all codes are errors.
        Severity::Error
    }

    /// Explanation shown by tooling that documents error codes.
    pub fn explain(&self) -> Explanation {
        match self {
            Self::ParseError => Explanation {
                title: "Parse Error",
                description: "The node source could not produce a syntax tree for this statement.",
                example: None,
            },
            Self::DuplicateIdentifier => Explanation {
                title: "Duplicate Identifier",
                description: "A local variable, parameter, await binding or container slot \
                              was declared twice within the same scope.",
                example: Some("let x = 1; let x = 2;"),
            },
            Self::UndeclaredIdentifier => Explanation {
                title: "Undeclared Identifier",
                description: "The name is assigned to, or `callee` is used, where no \
                              declaration is visible.",
                example: Some("y = 10;  // no `let y` in scope"),
            },
            Self::ConstantAssignment => Explanation {
                title: "Constant Assignment",
                description: "A name declared with `const` is inlined at every use and cannot \
                              be assigned to afterwards.",
                example: Some("const limit = 10; limit = 20;"),
            },
            Self::InvalidBreak => Explanation {
                title: "Invalid Break",
                description: "`break` was used outside of any loop and without a destination.",
                example: Some("break 10;"),
            },
            Self::InvalidContinue => Explanation {
                title: "Invalid Continue",
                description: "`continue` was used outside of any loop and without a destination.",
                example: Some("continue;"),
            },
            Self::UnsupportedAggregation => Explanation {
                title: "Unsupported Aggregation",
                description: "Assignment-style operators cannot reduce loop results.",
                example: Some("repeat -> break 1, 2; +="),
            },
            Self::UnsupportedNode => Explanation {
                title: "Unsupported Node",
                description: "The syntax tree contains a node kind the translator has no rule for.",
                example: None,
            },
            Self::InternalError => Explanation {
                title: "Internal Error",
                description: "The translator reached a state it cannot handle.",
                example: None,
            },
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A translator diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Unique error code
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: Severity,
    /// Short message (single line)
    pub message: String,
    /// Longer explanation (optional)
    pub help: Option<String>,
    /// Primary span (where the error is)
    pub span: Span,
    /// Additional labels (related locations)
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    /// Create a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, code.default_severity(), message)
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Check if this is a hint.
    pub fn is_hint(&self) -> bool {
        self.severity == Severity::Hint
    }
}

/// Builder for constructing diagnostics fluently.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    /// Create a new diagnostic builder.
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
                labels: Vec::new(),
            },
        }
    }

    /// Set the primary span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    /// Add a secondary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.inner.labels.push(Label::secondary(span, message));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    /// Build the diagnostic.
    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// Collection of diagnostics with summary statistics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// All diagnostics
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Extend with multiple diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.is_error())
    }

    /// Count errors.
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    /// Count warnings.
    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    /// Count hints.
    pub fn hint_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_hint()).count()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{FileId, Position};

    #[test]
    fn test_code_strings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in DiagnosticCode::ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {}", code);
        }
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(DiagnosticCode::parse("b001"), Some(DiagnosticCode::DuplicateIdentifier));
        assert_eq!(DiagnosticCode::parse("F003"), Some(DiagnosticCode::UnsupportedAggregation));
        assert_eq!(DiagnosticCode::parse("X999"), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(DiagnosticCode::InvalidBreak.category(), "control flow");
        assert_eq!(DiagnosticCode::UndeclaredIdentifier.category(), "lexical binding");
        assert_eq!(DiagnosticCode::UnsupportedNode.category(), "structural");
    }

    #[test]
    fn test_builder_and_counts() {
        let span = Span::at(FileId(0), Position::new(2, 7));
        let diag = Diagnostic::new(DiagnosticCode::DuplicateIdentifier, "duplicate identifier 'x'")
            .with_span(span)
            .with_label(Span::at(FileId(0), Position::new(1, 5)), "first declared here")
            .build();

        assert!(diag.is_error());
        assert_eq!(diag.span.start, Position::new(2, 7));
        assert_eq!(diag.labels.len(), 1);

        let mut all = Diagnostics::new();
        all.push(diag);
        all.push(Diagnostic::warning(DiagnosticCode::InternalError, "odd").build());
        assert_eq!(all.error_count(), 1);
        assert_eq!(all.warning_count(), 1);
        assert!(all.has_errors());
    }
}
