//! Source position types for tracking locations in source code.

use serde::{Deserialize, Serialize};

/// Unique identifier for a source file in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// A dummy file ID for positions without a known file.
    pub const DUMMY: FileId = FileId(u32::MAX);
}

/// A line/column position as reported by the parser.
///
/// Both coordinates are 1-indexed. A zero line marks an unknown position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position used for synthesized nodes.
    pub const UNKNOWN: Position = Position { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Check if this is a synthesized/unknown position.
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span in source code: a file plus a start position and an optional end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// File ID (index into source cache)
    pub file_id: FileId,
    /// First position covered by the span
    pub start: Position,
    /// Position just past the span, when the parser reported one
    pub end: Option<Position>,
}

impl Span {
    /// A dummy span for cases where no location is available.
    pub const DUMMY: Span = Span {
        file_id: FileId::DUMMY,
        start: Position::UNKNOWN,
        end: None,
    };

    /// Create a span covering a single position.
    pub fn at(file_id: FileId, start: Position) -> Self {
        Self {
            file_id,
            start,
            end: None,
        }
    }

    /// Create a span with both ends known.
    pub fn new(file_id: FileId, start: Position, end: Position) -> Self {
        Self {
            file_id,
            start,
            end: Some(end),
        }
    }

    /// Check if this is a dummy/unknown span.
    pub fn is_dummy(&self) -> bool {
        self.start.is_unknown()
    }

    /// Number of columns to underline when both ends sit on one line.
    pub fn width(&self) -> u32 {
        match self.end {
            Some(end) if end.line == self.start.line => {
                end.column.saturating_sub(self.start.column).max(1)
            }
            _ => 1,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}

/// Resolved location with file path, line, and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File path
    pub file: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A labeled span for multi-span diagnostics.
#[derive(Debug, Clone)]
pub struct Label {
    /// The span to highlight
    pub span: Span,
    /// Message to display at this location
    pub message: String,
    /// Style of the label (primary or secondary)
    pub style: LabelStyle,
}

impl Label {
    /// Create a primary label (main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Create a secondary label (related location).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// Style for diagnostic labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Primary label - the main error location
    Primary,
    /// Secondary label - related locations such as a previous declaration
    Secondary,
}
