//! Pull-style sources of top-level statements.

use std::collections::VecDeque;

use ember_diagnostics::{Diagnostic, DiagnosticCode, FileId, Position, Span};
use thiserror::Error;

use crate::node::Expr;

/// A statement the parser could not produce.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic {
        Diagnostic::new(DiagnosticCode::ParseError, self.message.clone())
            .with_span(Span::at(file_id, self.position))
            .build()
    }
}

/// Yields one top-level statement at a time.
///
/// `None` means the input is exhausted. A malformed statement yields
/// `Some(Err(..))` and the source may continue with the next one.
pub trait NodeSource {
    fn next_node(&mut self) -> Option<Result<Expr, ParseError>>;
}

/// Any iterator of parse results is a node source.
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Expr, ParseError>>,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> NodeSource for IterSource<I>
where
    I: Iterator<Item = Result<Expr, ParseError>>,
{
    fn next_node(&mut self) -> Option<Result<Expr, ParseError>> {
        self.inner.next()
    }
}

impl NodeSource for VecDeque<Expr> {
    fn next_node(&mut self) -> Option<Result<Expr, ParseError>> {
        self.pop_front().map(Ok)
    }
}

/// Reads a serialized tree: a JSON array with one element per statement.
///
/// Elements are decoded lazily, so a malformed statement is reported on its
/// own and the statements after it still come through.
pub struct JsonSource {
    pending: VecDeque<serde_json::Value>,
    failure: Option<ParseError>,
}

impl JsonSource {
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Vec<serde_json::Value>>(text) {
            Ok(values) => Self {
                pending: values.into(),
                failure: None,
            },
            Err(err) => Self {
                pending: VecDeque::new(),
                failure: Some(ParseError::new(
                    format!("expected an array of statements: {}", err),
                    Position::new(err.line() as u32, err.column() as u32),
                )),
            },
        }
    }

    /// Statements not yet handed out.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Best-effort position of a raw element, used when decoding it fails.
fn raw_position(value: &serde_json::Value) -> Position {
    value
        .get("pos")
        .and_then(|pos| serde_json::from_value::<Position>(pos.clone()).ok())
        .unwrap_or(Position::UNKNOWN)
}

impl NodeSource for JsonSource {
    fn next_node(&mut self) -> Option<Result<Expr, ParseError>> {
        if let Some(err) = self.failure.take() {
            return Some(Err(err));
        }
        let value = self.pending.pop_front()?;
        let position = raw_position(&value);
        Some(
            serde_json::from_value::<Expr>(value)
                .map_err(|err| ParseError::new(format!("malformed statement: {}", err), position)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ExprKind;

    #[test]
    fn test_json_source_yields_each_statement() {
        let text = r#"[
            {"pos": {"line": 1, "column": 1}, "kind": {"type": "Integer", "value": 42}},
            {"pos": {"line": 2, "column": 1}, "kind": {"type": "Identifier", "name": "x"}}
        ]"#;
        let mut source = JsonSource::from_json(text);
        assert_eq!(source.remaining(), 2);

        let first = source.next_node().unwrap().unwrap();
        assert_eq!(first.kind, ExprKind::Integer { value: 42 });
        assert_eq!(first.pos, Position::new(1, 1));

        let second = source.next_node().unwrap().unwrap();
        assert_eq!(second.kind, ExprKind::Identifier { name: "x".into() });
        assert!(source.next_node().is_none());
    }

    #[test]
    fn test_json_source_continues_after_bad_element() {
        let text = r#"[
            {"pos": {"line": 1, "column": 1}, "kind": {"type": "Integer"}},
            {"kind": {"type": "Void"}}
        ]"#;
        let mut source = JsonSource::from_json(text);

        let err = source.next_node().unwrap().unwrap_err();
        assert_eq!(err.position, Position::new(1, 1));
        assert!(err.message.starts_with("malformed statement"));

        let next = source.next_node().unwrap().unwrap();
        assert_eq!(next.kind, ExprKind::Void);
        assert!(next.pos.is_unknown());
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let text = r#"[{"kind": {"type": "Yield", "value": 1}}]"#;
        let mut source = JsonSource::from_json(text);
        let node = source.next_node().unwrap().unwrap();
        assert_eq!(node.kind, ExprKind::Unsupported);
    }

    #[test]
    fn test_json_source_rejects_non_array() {
        let mut source = JsonSource::from_json("{\"kind\": 1}");
        let err = source.next_node().unwrap().unwrap_err();
        assert!(err.message.contains("array of statements"));
        assert!(source.next_node().is_none());
    }

    #[test]
    fn test_iter_source() {
        let items = vec![
            Ok(Expr::integer(1)),
            Err(ParseError::new("unexpected token", Position::new(2, 3))),
        ];
        let mut source = IterSource::new(items.into_iter());
        assert!(source.next_node().unwrap().is_ok());
        let err = source.next_node().unwrap().unwrap_err();
        let diag = err.to_diagnostic(FileId(0));
        assert_eq!(diag.code, DiagnosticCode::ParseError);
        assert_eq!(diag.span.start, Position::new(2, 3));
        assert!(source.next_node().is_none());
    }
}
