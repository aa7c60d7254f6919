//! Operator tokens and built-in contract names.

use serde::{Deserialize, Serialize};

/// Binary operator tokens, including assignment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
    #[serde(rename = "^")]
    Xor,
    #[serde(rename = "&&")]
    AndAlso,
    #[serde(rename = "||")]
    OrElse,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "==")]
    ValueEquality,
    #[serde(rename = "!=")]
    ValueInequality,
    #[serde(rename = "===")]
    ReferenceEquality,
    #[serde(rename = "!==")]
    ReferenceInequality,
    #[serde(rename = "is")]
    InstanceOf,
    #[serde(rename = "to")]
    TypeCast,
    #[serde(rename = "in")]
    Contains,
    #[serde(rename = ".")]
    MemberAccess,
    #[serde(rename = "=")]
    Assignment,
    #[serde(rename = ":=")]
    Overwrite,
    #[serde(rename = "=>")]
    RedirectTo,
    #[serde(rename = "+=")]
    PlusAssign,
    #[serde(rename = "-=")]
    MinusAssign,
    #[serde(rename = "*=")]
    MultiplyAssign,
    #[serde(rename = "/=")]
    DivideAssign,
    #[serde(rename = "%=")]
    ModuloAssign,
    #[serde(rename = "&=")]
    AndAssign,
    #[serde(rename = "|=")]
    OrAssign,
    #[serde(rename = "^=")]
    XorAssign,
}

impl BinaryOperator {
    /// Source token of the operator.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::AndAlso => "&&",
            Self::OrElse => "||",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::ValueEquality => "==",
            Self::ValueInequality => "!=",
            Self::ReferenceEquality => "===",
            Self::ReferenceInequality => "!==",
            Self::InstanceOf => "is",
            Self::TypeCast => "to",
            Self::Contains => "in",
            Self::MemberAccess => ".",
            Self::Assignment => "=",
            Self::Overwrite => ":=",
            Self::RedirectTo => "=>",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::ModuloAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
        }
    }

    /// The operator applied by a compound assignment (`+=` -> `+`).
    pub fn compound_base(&self) -> Option<BinaryOperator> {
        match self {
            Self::PlusAssign => Some(Self::Plus),
            Self::MinusAssign => Some(Self::Minus),
            Self::MultiplyAssign => Some(Self::Multiply),
            Self::DivideAssign => Some(Self::Divide),
            Self::ModuloAssign => Some(Self::Modulo),
            Self::AndAssign => Some(Self::And),
            Self::OrAssign => Some(Self::Or),
            Self::XorAssign => Some(Self::Xor),
            _ => None,
        }
    }

    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::AndAlso | Self::OrElse)
    }

    /// `=`, `:=` and the compound assignment forms.
    pub fn is_assignment(&self) -> bool {
        matches!(self, Self::Assignment | Self::Overwrite) || self.compound_base().is_some()
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Unary operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "!")]
    Negate,
    #[serde(rename = "**")]
    Square,
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
    /// `$x`: contract of a value
    #[serde(rename = "$")]
    TypeOf,
    /// `x?`: void check
    #[serde(rename = "?")]
    VoidCheck,
}

impl UnaryOperator {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Negate => "!",
            Self::Square => "**",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::TypeOf => "$",
            Self::VoidCheck => "?",
        }
    }

    /// Operators that write their result back into the operand.
    pub fn is_increment_style(&self) -> bool {
        matches!(self, Self::Increment | Self::Decrement)
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Contracts provided by the runtime under reserved global names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltInContract {
    Integer,
    Real,
    String,
    Boolean,
    Dynamic,
    Void,
    Object,
    Callable,
    Expression,
    Statement,
    Signature,
}

impl BuiltInContract {
    pub const ALL: &'static [BuiltInContract] = &[
        Self::Integer,
        Self::Real,
        Self::String,
        Self::Boolean,
        Self::Dynamic,
        Self::Void,
        Self::Object,
        Self::Callable,
        Self::Expression,
        Self::Statement,
        Self::Signature,
    ];

    /// Reserved global name of the contract.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Dynamic => "dynamic",
            Self::Void => "void",
            Self::Object => "object",
            Self::Callable => "callable",
            Self::Expression => "expression",
            Self::Statement => "statement",
            Self::Signature => "signature",
        }
    }

    pub fn from_name(name: &str) -> Option<BuiltInContract> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}
