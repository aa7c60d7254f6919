//! Diagnostic infrastructure for the Ember translator.
//!
//! This crate provides structured error reporting with:
//! - Source positions (line, column) as delivered by the parser
//! - Error codes grouped by category (binding, control flow, structural)
//! - Multiple output formats (terminal, JSON, simple text)
//!
//! # Example
//!
//! ```
//! use ember_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, Position, SimpleEmitter, SourceCache, Span,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add_file("main.em", "break;".to_string());
//!
//! let diag = Diagnostic::new(DiagnosticCode::InvalidBreak, "invalid break outside of loop")
//!     .with_span(Span::at(file_id, Position::new(1, 1)))
//!     .build();
//!
//! let mut emitter = SimpleEmitter::new(std::io::stderr());
//! emitter.emit(&diag, &cache).unwrap();
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Explanation, Severity,
};
pub use emitter::{DiagnosticEmitter, JsonEmitter, SimpleEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Label, LabelStyle, Location, Position, Span};
