//! Ember to JavaScript translation
//!
//! The translator walks one top-level statement at a time and produces
//! target code that calls into the Ember runtime for everything beyond plain
//! control flow: operators, member access, promises, reactive properties,
//! loops and exception handling.
//!
//! ```
//! use ember_ast::Expr;
//! use ember_translate::{Translator, TranslatorOptions};
//! use std::collections::VecDeque;
//!
//! let mut source: VecDeque<Expr> = vec![Expr::let_value("a", Expr::integer(1))].into();
//! let mut translator = Translator::new(TranslatorOptions::default());
//! let translation = translator.translate_program(&mut source);
//! assert!(translation.is_ok());
//! ```

mod aggregate;
mod assign;
pub mod config;
pub mod context;
mod control;
mod declare;
pub mod driver;
pub mod error;
#[cfg(test)]
mod host;
pub mod runtime;
pub mod scope;
mod short_circuit;
pub mod translate;

pub use config::{ConfigError, DiagnosticFormat, EmitMode, ErrorMode, TranslatorOptions};
pub use context::{sanitize, ScopeGuard, TranslationContext};
pub use driver::{emit, render_diagnostics, translate_file, RunSummary, Translation, Translator};
pub use error::{ErrorKind, Result, StatementError, TranslationError};
pub use runtime::Runtime;
pub use scope::{Binding, BindingValue, Scope, ScopeKind};
pub use translate::translate;
