//! Target code model
//!
//! A small JavaScript tree: just the forms the translator emits. Nodes are
//! built bottom-up and handed to the [`printer`](crate::printer) once.

use std::fmt;

/// A program: the statements produced for each top-level source statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.body.push(stmt);
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Source position attached to a node in debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMark {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var a, b = init;`
    Var(Vec<(String, Option<Expr>)>),
    Expr(Expr),
    Return(Expr),
    If {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Vec<Stmt>,
    },
}

/// Operators emitted directly in the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    StrictEq,
    StrictNe,
    InstanceOf,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Str(String),
    /// Variable reference
    Ident(String),
    This,
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `new callee(args)`
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Function literal; `name` is visible only inside the body
    Function {
        name: Option<String>,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    Array(Vec<Expr>),
    /// Object literal with keys in insertion order
    Object(Vec<(String, Expr)>),
    /// `target = value`; the target is an identifier or a member
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `a, b, c`
    Sequence(Vec<Expr>),
    /// Any node, preceded by a `/* line:col */` comment
    Marked {
        mark: SourceMark,
        expr: Box<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// `self.property`
    pub fn member(self, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(self),
            property: property.into(),
        }
    }

    /// `self(args)`
    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// `self.method(args)`
    pub fn method(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        self.member(method).call(args)
    }

    /// `self.bind(this)`
    pub fn bind_this(self) -> Self {
        self.method("bind", vec![Expr::This])
    }

    /// `self.call(this, args)`
    pub fn call_with_this(self, mut args: Vec<Expr>) -> Self {
        args.insert(0, Expr::This);
        self.method("call", args)
    }

    pub fn construct(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(name: Option<&str>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Expr::Function {
            name: name.map(str::to_string),
            params,
            body,
        }
    }

    /// `function (params) { return value; }`
    pub fn returning(params: Vec<String>, value: Expr) -> Self {
        Self::function(None, params, vec![Stmt::Return(value)])
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    /// Comma sequence; a single element is returned as is and an empty
    /// sequence is `null`.
    pub fn sequence(mut items: Vec<Expr>) -> Self {
        match items.len() {
            0 => Expr::Null,
            1 => items.remove(0),
            _ => Expr::Sequence(items),
        }
    }

    /// Object literal from borrowed keys.
    pub fn object<'a>(entries: impl IntoIterator<Item = (&'a str, Expr)>) -> Self {
        Expr::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    pub fn marked(self, line: u32, column: u32) -> Self {
        Expr::Marked {
            mark: SourceMark { line, column },
            expr: Box::new(self),
        }
    }

    /// The node with any debug marks removed from the outside.
    pub fn unmarked(&self) -> &Expr {
        match self {
            Expr::Marked { expr, .. } => expr.unmarked(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_collapses() {
        assert_eq!(Expr::sequence(vec![]), Expr::Null);
        assert_eq!(Expr::sequence(vec![Expr::Integer(1)]), Expr::Integer(1));
        assert!(matches!(
            Expr::sequence(vec![Expr::Integer(1), Expr::Integer(2)]),
            Expr::Sequence(items) if items.len() == 2
        ));
    }

    #[test]
    fn test_call_with_this_prepends_receiver() {
        let expr = Expr::ident("f").call_with_this(vec![Expr::Integer(1)]);
        match expr {
            Expr::Call { callee, args } => {
                assert_eq!(*callee, Expr::ident("f").member("call"));
                assert_eq!(args, vec![Expr::This, Expr::Integer(1)]);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unmarked() {
        let expr = Expr::Null.marked(1, 2).marked(3, 4);
        assert_eq!(expr.unmarked(), &Expr::Null);
    }
}
