//! Target code model for Ember
//!
//! The translator builds an [`ir`] tree per statement; the [`printer`] turns
//! a finished [`Program`](ir::Program) into JavaScript text.

pub mod ir;
pub mod printer;

pub use ir::{BinaryOp, Expr, Program, SourceMark, Stmt, UnaryOp};
pub use printer::{print_expr, print_program, Printer};
