//! Tree transformations for Ember
//!
//! This crate contains the passes that run on a node right before it is
//! translated:
//! - Constant folding of operators over literal operands

pub mod reduce;

pub use reduce::reduce;
