//! Translation errors

use ember_ast::{BinaryOperator, ParseError, Position};
use ember_diagnostics::{Diagnostic, DiagnosticCode, FileId, Span};
use thiserror::Error;

/// Error taxonomy shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexicalBinding,
    ControlFlow,
    Structural,
}

/// Why a statement could not be translated.
///
/// The first error produced while translating a statement aborts it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    #[error("duplicate identifier '{name}'")]
    DuplicateIdentifier {
        name: String,
        position: Position,
        previous: Option<Position>,
    },

    #[error("undeclared identifier '{name}'")]
    UndeclaredIdentifier { name: String, position: Position },

    #[error("cannot assign to constant '{name}'")]
    ConstantAssignment {
        name: String,
        position: Position,
        declared: Position,
    },

    #[error("invalid break outside of loop")]
    InvalidBreak { position: Position },

    #[error("invalid continue outside of loop")]
    InvalidContinue { position: Position },

    #[error("unsupported aggregation operator '{operator}'")]
    UnsupportedAggregation {
        operator: BinaryOperator,
        position: Position,
    },

    #[error("unsupported node kind '{kind}'")]
    UnsupportedNode {
        kind: &'static str,
        position: Position,
    },

    #[error("internal error: {message}")]
    Internal { message: String, position: Position },
}

impl TranslationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateIdentifier { .. }
            | Self::UndeclaredIdentifier { .. }
            | Self::ConstantAssignment { .. } => ErrorKind::LexicalBinding,
            Self::InvalidBreak { .. }
            | Self::InvalidContinue { .. }
            | Self::UnsupportedAggregation { .. } => ErrorKind::ControlFlow,
            Self::UnsupportedNode { .. } | Self::Internal { .. } => ErrorKind::Structural,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::DuplicateIdentifier { .. } => DiagnosticCode::DuplicateIdentifier,
            Self::UndeclaredIdentifier { .. } => DiagnosticCode::UndeclaredIdentifier,
            Self::ConstantAssignment { .. } => DiagnosticCode::ConstantAssignment,
            Self::InvalidBreak { .. } => DiagnosticCode::InvalidBreak,
            Self::InvalidContinue { .. } => DiagnosticCode::InvalidContinue,
            Self::UnsupportedAggregation { .. } => DiagnosticCode::UnsupportedAggregation,
            Self::UnsupportedNode { .. } => DiagnosticCode::UnsupportedNode,
            Self::Internal { .. } => DiagnosticCode::InternalError,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::DuplicateIdentifier { position, .. }
            | Self::UndeclaredIdentifier { position, .. }
            | Self::ConstantAssignment { position, .. }
            | Self::InvalidBreak { position }
            | Self::InvalidContinue { position }
            | Self::UnsupportedAggregation { position, .. }
            | Self::UnsupportedNode { position, .. }
            | Self::Internal { position, .. } => *position,
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic {
        let mut builder = Diagnostic::new(self.code(), self.to_string())
            .with_span(Span::at(file_id, self.position()));

        match self {
            Self::DuplicateIdentifier {
                previous: Some(previous),
                ..
            } => {
                builder = builder.with_label(Span::at(file_id, *previous), "first declared here");
            }
            Self::ConstantAssignment { declared, .. } => {
                builder = builder
                    .with_label(Span::at(file_id, *declared), "declared as constant here")
                    .with_help("declare it with `let` to allow assignment");
            }
            Self::UndeclaredIdentifier { name, .. } if name != "callee" => {
                builder = builder.with_help(format!("declare it first: `let {} = ...`", name));
            }
            Self::InvalidBreak { .. } | Self::InvalidContinue { .. } => {
                builder = builder.with_help("move the statement inside a `repeat` or `for` loop");
            }
            _ => {}
        }

        builder.build()
    }
}

/// Outcome of a failed top-level statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl StatementError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::Parse(_) => DiagnosticCode::ParseError,
            Self::Translation(err) => err.code(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Parse(err) => err.position,
            Self::Translation(err) => err.position(),
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic {
        match self {
            Self::Parse(err) => err.to_diagnostic(file_id),
            Self::Translation(err) => err.to_diagnostic(file_id),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_codes() {
        let err = TranslationError::InvalidBreak {
            position: Position::new(3, 1),
        };
        assert_eq!(err.kind(), ErrorKind::ControlFlow);
        assert_eq!(err.code().as_str(), "F001");
        assert_eq!(err.to_string(), "invalid break outside of loop");

        let err = TranslationError::UnsupportedNode {
            kind: "Yield",
            position: Position::UNKNOWN,
        };
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(err.to_string(), "unsupported node kind 'Yield'");
    }

    #[test]
    fn test_duplicate_diagnostic_points_at_both_declarations() {
        let err = TranslationError::DuplicateIdentifier {
            name: "x".into(),
            position: Position::new(2, 5),
            previous: Some(Position::new(1, 5)),
        };
        let diag = err.to_diagnostic(FileId(0));
        assert_eq!(diag.code, DiagnosticCode::DuplicateIdentifier);
        assert_eq!(diag.message, "duplicate identifier 'x'");
        assert_eq!(diag.span.start, Position::new(2, 5));
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].span.start, Position::new(1, 5));
    }

    #[test]
    fn test_statement_error_from_parse() {
        let err: StatementError = ParseError::new("unexpected token", Position::new(1, 2)).into();
        assert_eq!(err.code(), DiagnosticCode::ParseError);
        assert_eq!(err.position(), Position::new(1, 2));
        assert_eq!(err.to_string(), "unexpected token");
    }
}
