//! Syntax tree for the Ember language
//!
//! The tree is produced by an external parser and consumed by the translator
//! one top-level statement at a time through a [`NodeSource`].

pub mod builder;
pub mod node;
pub mod ops;
pub mod source;

pub use node::*;
pub use ops::{BinaryOperator, BuiltInContract, UnaryOperator};
pub use source::{IterSource, JsonSource, NodeSource, ParseError};

pub use ember_diagnostics::Position;
