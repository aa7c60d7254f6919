//! Calling conventions of the target runtime library
//!
//! Emitted code reaches every runtime service through a single object
//! (`runtime` unless configured otherwise). This module is the one place
//! that knows which runtime entry point serves which source construct.

use ember_ast::{BinaryOperator, BuiltInContract, UnaryOperator};
use ember_target::{BinaryOp, Expr as JsExpr};

/// Host globals that are referenced directly instead of through the runtime.
pub const AMBIENT_GLOBALS: &[&str] = &[
    "Math",
    "JSON",
    "console",
    "Date",
    "Array",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Error",
    "Promise",
    "undefined",
    "NaN",
    "Infinity",
    "setTimeout",
    "clearTimeout",
    "setInterval",
    "clearInterval",
    "globalThis",
];

pub fn is_ambient_global(name: &str) -> bool {
    AMBIENT_GLOBALS.contains(&name)
}

/// Builds references and calls into the runtime object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    name: String,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl Runtime {
    pub const DEFAULT_NAME: &'static str = "runtime";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The runtime object itself.
    pub fn object(&self) -> JsExpr {
        JsExpr::ident(&self.name)
    }

    /// `runtime.<member>`
    pub fn member(&self, member: &str) -> JsExpr {
        self.object().member(member)
    }

    /// `runtime.<function>(args)`
    pub fn call(&self, function: &str, args: Vec<JsExpr>) -> JsExpr {
        self.member(function).call(args)
    }

    /// `new runtime.<class>(args)`
    pub fn construct(&self, class: &str, args: Vec<JsExpr>) -> JsExpr {
        JsExpr::construct(self.member(class), args)
    }

    /// `runtime.globals.<name>`
    pub fn global(&self, name: &str) -> JsExpr {
        self.member("globals").member(name)
    }

    pub fn contract(&self, contract: BuiltInContract) -> JsExpr {
        self.global(contract.name())
    }

    /// `value instanceof runtime.<class>`
    pub fn is_instance(&self, value: JsExpr, class: &str) -> JsExpr {
        JsExpr::binary(BinaryOp::InstanceOf, value, self.member(class))
    }
}

/// How a binary operator is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLowering {
    /// Native target operator
    Direct(BinaryOp),
    /// `runtime.<name>(left, right)`
    Call(&'static str),
    MemberAccess,
    ShortCircuit,
    Assignment,
}

pub fn binary_lowering(op: BinaryOperator) -> BinaryLowering {
    use BinaryOperator::*;
    match op {
        ReferenceEquality => BinaryLowering::Direct(BinaryOp::StrictEq),
        ReferenceInequality => BinaryLowering::Direct(BinaryOp::StrictNe),
        MemberAccess => BinaryLowering::MemberAccess,
        AndAlso | OrElse => BinaryLowering::ShortCircuit,
        Assignment | Overwrite | PlusAssign | MinusAssign | MultiplyAssign | DivideAssign
        | ModuloAssign | AndAssign | OrAssign | XorAssign => BinaryLowering::Assignment,
        Plus => BinaryLowering::Call("binaryPlus"),
        Minus => BinaryLowering::Call("binaryMinus"),
        Multiply => BinaryLowering::Call("multiplication"),
        Divide => BinaryLowering::Call("division"),
        Modulo => BinaryLowering::Call("modulo"),
        And => BinaryLowering::Call("and"),
        Or => BinaryLowering::Call("or"),
        Xor => BinaryLowering::Call("xor"),
        ShiftLeft => BinaryLowering::Call("shiftLeft"),
        ShiftRight => BinaryLowering::Call("shiftRight"),
        LessThan => BinaryLowering::Call("lessThan"),
        LessThanOrEqual => BinaryLowering::Call("lessThanOrEqual"),
        GreaterThan => BinaryLowering::Call("greaterThan"),
        GreaterThanOrEqual => BinaryLowering::Call("greaterThanOrEqual"),
        ValueEquality => BinaryLowering::Call("areEqual"),
        ValueInequality => BinaryLowering::Call("areNotEqual"),
        InstanceOf => BinaryLowering::Call("instanceOf"),
        TypeCast => BinaryLowering::Call("typecast"),
        Contains => BinaryLowering::Call("contains"),
        RedirectTo => BinaryLowering::Call("redirectTo"),
    }
}

/// Runtime function applying a binary operator as a two-argument function.
///
/// `None` for operators that cannot reduce loop results.
pub fn aggregate_function(op: BinaryOperator) -> Option<&'static str> {
    match binary_lowering(op) {
        BinaryLowering::Call(function) => match op {
            BinaryOperator::RedirectTo => None,
            _ => Some(function),
        },
        BinaryLowering::Direct(BinaryOp::StrictEq) => Some("strictEqual"),
        BinaryLowering::Direct(BinaryOp::StrictNe) => Some("strictNotEqual"),
        BinaryLowering::MemberAccess => Some("getMember"),
        _ => None,
    }
}

pub fn unary_function(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Plus => "unaryPlus",
        UnaryOperator::Minus => "unaryMinus",
        UnaryOperator::Negate => "negation",
        UnaryOperator::Square => "square",
        UnaryOperator::Increment => "increment",
        UnaryOperator::Decrement => "decrement",
        UnaryOperator::TypeOf => "contractOf",
        UnaryOperator::VoidCheck => "isVoid",
    }
}
