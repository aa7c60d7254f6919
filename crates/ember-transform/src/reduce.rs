//! Node self-reduction
//!
//! Before a node is translated it is given the chance to replace itself with
//! a simpler equivalent. Only operator nodes over literal operands reduce:
//! the result is the literal the runtime would have produced. Anything that
//! introduces a scope or a binding is left untouched.
//!
//! Integer arithmetic honors the checked flag. Under checked arithmetic an
//! overflowing operation is not folded, so the runtime still raises at the
//! point of evaluation; unchecked arithmetic wraps.

use std::borrow::Cow;

use ember_ast::{BinaryOperator, Expr, ExprKind, UnaryOperator};

/// Reduce `expr` as far as it goes.
///
/// Returns the input unchanged (borrowed) when nothing reduces. Reduction is
/// idempotent: reducing the output again yields the same tree.
pub fn reduce(expr: &Expr, checked: bool) -> Cow<'_, Expr> {
    match &expr.kind {
        ExprKind::Binary { op, left, right } if is_foldable_binary(*op) => {
            let left = reduce(left, checked);
            let right = reduce(right, checked);
            if let Some(kind) = fold_binary(*op, &left.kind, &right.kind, checked) {
                log::trace!("folded `{}` at {}", op, expr.pos);
                return Cow::Owned(Expr::new(expr.pos, kind));
            }
            if matches!((&left, &right), (Cow::Borrowed(_), Cow::Borrowed(_))) {
                return Cow::Borrowed(expr);
            }
            Cow::Owned(Expr::new(
                expr.pos,
                ExprKind::Binary {
                    op: *op,
                    left: Box::new(left.into_owned()),
                    right: Box::new(right.into_owned()),
                },
            ))
        }
        ExprKind::Unary { op, operand } if !op.is_increment_style() => {
            let operand = reduce(operand, checked);
            if let Some(kind) = fold_unary(*op, &operand.kind, checked) {
                log::trace!("folded `{}` at {}", op, expr.pos);
                return Cow::Owned(Expr::new(expr.pos, kind));
            }
            match operand {
                Cow::Borrowed(_) => Cow::Borrowed(expr),
                Cow::Owned(operand) => Cow::Owned(Expr::new(
                    expr.pos,
                    ExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                )),
            }
        }
        _ => Cow::Borrowed(expr),
    }
}

/// Operators whose operands may themselves fold.
fn is_foldable_binary(op: BinaryOperator) -> bool {
    use BinaryOperator::*;
    matches!(
        op,
        Plus | Minus
            | Multiply
            | Modulo
            | And
            | Or
            | Xor
            | LessThan
            | LessThanOrEqual
            | GreaterThan
            | GreaterThanOrEqual
            | ValueEquality
            | ValueInequality
    )
}

fn fold_binary(
    op: BinaryOperator,
    left: &ExprKind,
    right: &ExprKind,
    checked: bool,
) -> Option<ExprKind> {
    use BinaryOperator::*;
    match (left, right) {
        (ExprKind::Integer { value: a }, ExprKind::Integer { value: b }) => {
            let (a, b) = (*a, *b);
            let integer = |value: Option<i64>| value.map(|value| ExprKind::Integer { value });
            match op {
                Plus => integer(arith(checked, a, b, i64::checked_add, i64::wrapping_add)),
                Minus => integer(arith(checked, a, b, i64::checked_sub, i64::wrapping_sub)),
                Multiply => integer(arith(checked, a, b, i64::checked_mul, i64::wrapping_mul)),
                // A zero divisor is a runtime fault, never folded.
                Modulo => integer(a.checked_rem(b)),
                And => integer(Some(a & b)),
                Or => integer(Some(a | b)),
                Xor => integer(Some(a ^ b)),
                _ => compare(op, a.partial_cmp(&b)?),
            }
        }
        (ExprKind::Real { value: a }, ExprKind::Real { value: b }) => {
            let (a, b) = (*a, *b);
            match op {
                Plus => Some(ExprKind::Real { value: a + b }),
                Minus => Some(ExprKind::Real { value: a - b }),
                Multiply => Some(ExprKind::Real { value: a * b }),
                And | Or | Xor | Modulo => None,
                _ => compare(op, a.partial_cmp(&b)?),
            }
        }
        (ExprKind::String { value: a }, ExprKind::String { value: b }) => match op {
            Plus => Some(ExprKind::String {
                value: format!("{}{}", a, b),
            }),
            ValueEquality => Some(ExprKind::Boolean { value: a == b }),
            ValueInequality => Some(ExprKind::Boolean { value: a != b }),
            _ => None,
        },
        (ExprKind::Boolean { value: a }, ExprKind::Boolean { value: b }) => match op {
            ValueEquality => Some(ExprKind::Boolean { value: a == b }),
            ValueInequality => Some(ExprKind::Boolean { value: a != b }),
            _ => None,
        },
        _ => None,
    }
}

fn arith(
    checked: bool,
    a: i64,
    b: i64,
    checked_op: fn(i64, i64) -> Option<i64>,
    wrapping_op: fn(i64, i64) -> i64,
) -> Option<i64> {
    if checked {
        checked_op(a, b)
    } else {
        Some(wrapping_op(a, b))
    }
}

fn compare(op: BinaryOperator, ordering: std::cmp::Ordering) -> Option<ExprKind> {
    use std::cmp::Ordering::*;
    use BinaryOperator::*;
    let value = match op {
        LessThan => ordering == Less,
        LessThanOrEqual => ordering != Greater,
        GreaterThan => ordering == Greater,
        GreaterThanOrEqual => ordering != Less,
        ValueEquality => ordering == Equal,
        ValueInequality => ordering != Equal,
        _ => return None,
    };
    Some(ExprKind::Boolean { value })
}

fn fold_unary(op: UnaryOperator, operand: &ExprKind, checked: bool) -> Option<ExprKind> {
    match (op, operand) {
        (UnaryOperator::Minus, ExprKind::Integer { value }) => {
            let value = if checked {
                value.checked_neg()?
            } else {
                value.wrapping_neg()
            };
            Some(ExprKind::Integer { value })
        }
        (UnaryOperator::Minus, ExprKind::Real { value }) => Some(ExprKind::Real { value: -value }),
        (UnaryOperator::Plus, ExprKind::Integer { .. } | ExprKind::Real { .. }) => {
            Some(operand.clone())
        }
        (UnaryOperator::Negate, ExprKind::Boolean { value }) => {
            Some(ExprKind::Boolean { value: !value })
        }
        (UnaryOperator::VoidCheck, kind) if kind.is_literal() => Some(ExprKind::Boolean {
            value: matches!(kind, ExprKind::Void),
        }),
        _ => None,
    }
}
