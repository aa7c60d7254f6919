//! Syntax tree node definitions
//!
//! The language is expression-oriented: every statement is an [`Expr`], and
//! a top-level program is a sequence of them. Nodes are delivered by an
//! external parser; the serialized form uses a `type` tag per node kind.

use ember_diagnostics::Position;
use serde::{Deserialize, Serialize};

use crate::ops::{BinaryOperator, BuiltInContract, UnaryOperator};

/// A syntax tree node with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(default)]
    pub pos: Position,
    pub kind: ExprKind,
}

/// Every node kind the parser can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprKind {
    Integer {
        value: i64,
    },
    Real {
        value: f64,
    },
    Boolean {
        value: bool,
    },
    String {
        value: String,
    },
    /// The `void` value
    Void,
    Identifier {
        name: String,
    },
    /// Reference to a contract provided by the runtime (`integer`, `real`, ...)
    BuiltIn {
        contract: BuiltInContract,
    },
    This,
    /// Self-reference to the enclosing function
    Callee,
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Invocation {
        target: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        /// `f!(args)`: start the call without waiting for it
        #[serde(default)]
        asynchronous: bool,
    },
    Indexer {
        target: Box<Expr>,
        indices: Vec<Expr>,
    },
    Array {
        #[serde(default)]
        elements: Vec<Expr>,
    },
    /// `{ a = 1, b: integer = 2 }`
    Container {
        #[serde(default)]
        slots: Vec<Slot>,
    },
    /// `{{ a: integer, b: string }}`
    ContainerContract {
        #[serde(default)]
        slots: Vec<SlotContract>,
    },
    /// `{ a; b; c }`: the value is the last expression
    Block {
        #[serde(default)]
        body: Vec<Expr>,
    },
    Let {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contract: Option<Box<Expr>>,
        /// `const` declaration: literal values may be inlined at use sites
        #[serde(default)]
        constant: bool,
        value: LetValue,
    },
    Function {
        signature: Signature,
        body: FunctionBody,
    },
    /// A signature used as a value (a function contract)
    Signature {
        signature: Signature,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Expr>>,
    },
    Try {
        dangerous: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        catch: Option<CatchClause>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finally: Option<Box<Expr>>,
    },
    /// `target ?? comparer { values -> handler, ..., default -> handler }`
    Selection {
        target: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comparer: Option<Box<Expr>>,
        #[serde(default)]
        cases: Vec<SelectionCase>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Box<Expr>>,
    },
    /// `repeat name -> body, aggregator`
    Repeat {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        body: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregator: Option<Aggregator>,
    },
    /// `for name: variable: contract in source -> body, aggregator`
    ForEach {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        variable: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contract: Option<Box<Expr>>,
        source: Box<Expr>,
        body: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregator: Option<Aggregator>,
    },
    Break {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<Box<Expr>>,
        #[serde(default)]
        values: Vec<Expr>,
    },
    Continue {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        destination: Option<Box<Expr>>,
        #[serde(default)]
        values: Vec<Expr>,
    },
    /// `fault error`: raise an error
    Fault {
        error: Box<Expr>,
    },
    /// `await a = x, b: integer = y -> body else handler`
    Await {
        bindings: Vec<AwaitBinding>,
        body: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        handler: Option<CatchClause>,
    },
    /// `fork body [on queue]`: evaluate asynchronously, yielding a promise
    Fork {
        body: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<Box<Expr>>,
    },
    /// `with target -> body`
    With {
        target: Box<Expr>,
        body: Box<Expr>,
    },
    /// `checked body` / `unchecked body`
    Checked {
        checked: bool,
        body: Box<Expr>,
    },
    /// `quote body`: the tree itself as a value
    Quote {
        body: Box<Expr>,
    },
    /// `%target`: expand a quoted expression in place
    Expand {
        target: Box<Expr>,
    },
    /// A node kind the parser delivered but this tree does not model
    #[serde(other)]
    Unsupported,
}

impl ExprKind {
    /// Stable name of the node kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Integer { .. } => "Integer",
            ExprKind::Real { .. } => "Real",
            ExprKind::Boolean { .. } => "Boolean",
            ExprKind::String { .. } => "String",
            ExprKind::Void => "Void",
            ExprKind::Identifier { .. } => "Identifier",
            ExprKind::BuiltIn { .. } => "BuiltIn",
            ExprKind::This => "This",
            ExprKind::Callee => "Callee",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Invocation { .. } => "Invocation",
            ExprKind::Indexer { .. } => "Indexer",
            ExprKind::Array { .. } => "Array",
            ExprKind::Container { .. } => "Container",
            ExprKind::ContainerContract { .. } => "ContainerContract",
            ExprKind::Block { .. } => "Block",
            ExprKind::Let { .. } => "Let",
            ExprKind::Function { .. } => "Function",
            ExprKind::Signature { .. } => "Signature",
            ExprKind::Conditional { .. } => "Conditional",
            ExprKind::Try { .. } => "Try",
            ExprKind::Selection { .. } => "Selection",
            ExprKind::Repeat { .. } => "Repeat",
            ExprKind::ForEach { .. } => "ForEach",
            ExprKind::Break { .. } => "Break",
            ExprKind::Continue { .. } => "Continue",
            ExprKind::Fault { .. } => "Fault",
            ExprKind::Await { .. } => "Await",
            ExprKind::Fork { .. } => "Fork",
            ExprKind::With { .. } => "With",
            ExprKind::Checked { .. } => "Checked",
            ExprKind::Quote { .. } => "Quote",
            ExprKind::Expand { .. } => "Expand",
            ExprKind::Unsupported => "Unsupported",
        }
    }

    /// Literal kinds translate to target literals without a runtime call.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Integer { .. }
                | ExprKind::Real { .. }
                | ExprKind::Boolean { .. }
                | ExprKind::String { .. }
                | ExprKind::Void
        )
    }
}

/// Right-hand side of a `let` declaration or container slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LetValue {
    /// Plain stored value
    Value(Box<Expr>),
    /// Reactive property backed by accessors
    Property {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        get: Option<Box<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        set: Option<Box<Expr>>,
    },
}

/// Parameter list with optional per-parameter contracts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Expr>,
    #[serde(default)]
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    /// Translated body
    Expression(Box<Expr>),
    /// Body kept as a tree for reflective execution
    Quoted(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Box<Expr>>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCase {
    pub values: Vec<Expr>,
    pub handler: Expr,
}

/// Reduction applied across loop iteration results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregator {
    Operator(BinaryOperator),
    /// A user-supplied two-argument function
    Custom(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwaitBinding {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Expr>,
    pub value: Expr,
    #[serde(default)]
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Expr>,
    pub value: LetValue,
    #[serde(default)]
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotContract {
    pub name: String,
    pub contract: Expr,
    #[serde(default)]
    pub pos: Position,
}
