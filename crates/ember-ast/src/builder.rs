//! Convenience constructors for building trees in code.
//!
//! Parsers deliver trees through a [`NodeSource`](crate::NodeSource); these
//! helpers exist for tests and for passes that synthesize nodes.

use ember_diagnostics::Position;

use crate::node::{
    Aggregator, CatchClause, Expr, ExprKind, FunctionBody, LetValue, Parameter, Signature,
};
use crate::ops::{BinaryOperator, BuiltInContract, UnaryOperator};

impl Expr {
    pub fn new(pos: Position, kind: ExprKind) -> Self {
        Self { pos, kind }
    }

    /// A node without a source position.
    pub fn synthetic(kind: ExprKind) -> Self {
        Self::new(Position::UNKNOWN, kind)
    }

    /// Same node kind, different position.
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = pos;
        self
    }

    pub fn integer(value: i64) -> Self {
        Self::synthetic(ExprKind::Integer { value })
    }

    pub fn real(value: f64) -> Self {
        Self::synthetic(ExprKind::Real { value })
    }

    pub fn boolean(value: bool) -> Self {
        Self::synthetic(ExprKind::Boolean { value })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::synthetic(ExprKind::String {
            value: value.into(),
        })
    }

    pub fn void() -> Self {
        Self::synthetic(ExprKind::Void)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::synthetic(ExprKind::Identifier { name: name.into() })
    }

    pub fn builtin(contract: BuiltInContract) -> Self {
        Self::synthetic(ExprKind::BuiltIn { contract })
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Self::synthetic(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Self::synthetic(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `left = right`
    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::binary(BinaryOperator::Assignment, target, value)
    }

    /// `object.name`
    pub fn member(object: Expr, name: impl Into<String>) -> Self {
        Self::binary(BinaryOperator::MemberAccess, object, Expr::ident(name))
    }

    pub fn call(target: Expr, args: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Invocation {
            target: Box::new(target),
            args,
            asynchronous: false,
        })
    }

    pub fn block(body: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Block { body })
    }

    /// `let name = value`
    pub fn let_value(name: impl Into<String>, value: Expr) -> Self {
        Self::synthetic(ExprKind::Let {
            name: name.into(),
            contract: None,
            constant: false,
            value: LetValue::Value(Box::new(value)),
        })
    }

    /// `const name = value`
    pub fn constant(name: impl Into<String>, value: Expr) -> Self {
        Self::synthetic(ExprKind::Let {
            name: name.into(),
            contract: None,
            constant: true,
            value: LetValue::Value(Box::new(value)),
        })
    }

    /// `let name = get => getter, set => setter`
    pub fn property(name: impl Into<String>, get: Option<Expr>, set: Option<Expr>) -> Self {
        Self::synthetic(ExprKind::Let {
            name: name.into(),
            contract: None,
            constant: false,
            value: LetValue::Property {
                get: get.map(Box::new),
                set: set.map(Box::new),
            },
        })
    }

    /// A function whose parameters carry no contracts.
    pub fn function(params: &[&str], body: Expr) -> Self {
        Self::synthetic(ExprKind::Function {
            signature: Signature::untyped(params),
            body: FunctionBody::Expression(Box::new(body)),
        })
    }

    pub fn conditional(condition: Expr, then_branch: Expr, else_branch: Option<Expr>) -> Self {
        Self::synthetic(ExprKind::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn try_catch(dangerous: Expr, catch: Option<CatchClause>, finally: Option<Expr>) -> Self {
        Self::synthetic(ExprKind::Try {
            dangerous: Box::new(dangerous),
            catch,
            finally: finally.map(Box::new),
        })
    }

    pub fn repeat(name: Option<&str>, body: Expr, aggregator: Option<Aggregator>) -> Self {
        Self::synthetic(ExprKind::Repeat {
            name: name.map(str::to_string),
            body: Box::new(body),
            aggregator,
        })
    }

    pub fn for_each(
        variable: impl Into<String>,
        source: Expr,
        body: Expr,
        aggregator: Option<Aggregator>,
    ) -> Self {
        Self::synthetic(ExprKind::ForEach {
            name: None,
            variable: variable.into(),
            contract: None,
            source: Box::new(source),
            body: Box::new(body),
            aggregator,
        })
    }

    pub fn break_with(destination: Option<Expr>, values: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Break {
            destination: destination.map(Box::new),
            values,
        })
    }

    pub fn continue_with(destination: Option<Expr>, values: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Continue {
            destination: destination.map(Box::new),
            values,
        })
    }
}

impl Signature {
    /// Parameters without contracts.
    pub fn untyped(names: &[&str]) -> Self {
        Self {
            params: names
                .iter()
                .map(|name| Parameter {
                    name: (*name).to_string(),
                    contract: None,
                    pos: Position::UNKNOWN,
                })
                .collect(),
        }
    }
}

impl CatchClause {
    pub fn new(name: Option<&str>, body: Expr) -> Self {
        Self {
            name: name.map(str::to_string),
            contract: None,
            body: Box::new(body),
        }
    }
}
