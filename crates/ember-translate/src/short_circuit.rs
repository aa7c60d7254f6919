//! Short-circuit evaluation of `&&` / `||` chains
//!
//! A chain `a && b && c` becomes a small state machine in the target code:
//!
//! ```text
//! function $sc0($step, $v) {
//!   <unwrap $v, or fork and re-enter at $step once it resolves>
//!   if ($step === 0) { if (<$v decides>) return $v; return $sc0.call(this, 1, b); }
//!   if ($step === 1) { if (<$v decides>) return $v; return $sc0.call(this, 2, c); }
//!   return $v;
//! }.call(this, 0, a)
//! ```
//!
//! `$step` is the number of operands already resolved and `$v` the value of
//! the last one. An operand is only evaluated once every operand before it
//! has resolved.

use ember_ast::{BinaryOperator, Expr, ExprKind};
use ember_target::{BinaryOp, Expr as JsExpr, Stmt};

use crate::context::TranslationContext;
use crate::error::{Result, TranslationError};
use crate::runtime::Runtime;
use crate::scope::ScopeKind;
use crate::translate::translate;

const STEP: &str = "$step";
const VALUE: &str = "$v";
pub(crate) const RESOLVED: &str = "$r";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Junction {
    /// `&&`: stops at the first falsy value
    All,
    /// `||`: stops at the first truthy value
    Any,
}

impl Junction {
    fn from_operator(op: BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::AndAlso => Some(Junction::All),
            BinaryOperator::OrElse => Some(Junction::Any),
            _ => None,
        }
    }

    /// Test deciding the whole chain early on the current value.
    fn exit_test(self, runtime: &Runtime) -> JsExpr {
        let truthy = runtime.call("toBoolean", vec![JsExpr::ident(VALUE)]);
        match self {
            Junction::All => JsExpr::not(truthy),
            Junction::Any => truthy,
        }
    }
}

/// The evaluator for one flattened chain. `steps` holds the translated
/// operands after the first one, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShortCircuitPlan {
    pub name: String,
    pub junction: Junction,
    pub steps: Vec<JsExpr>,
}

impl ShortCircuitPlan {
    /// The evaluator function, without its invocation.
    pub fn evaluator(&self, runtime: &Runtime, locals: &[String]) -> JsExpr {
        let mut body = Vec::with_capacity(self.steps.len() + 3);
        if !locals.is_empty() {
            body.push(Stmt::Var(
                locals.iter().map(|local| (local.clone(), None)).collect(),
            ));
        }

        let resume = self.reenter(JsExpr::ident(STEP), JsExpr::ident(RESOLVED));
        body.push(resolve_or_fork(runtime, VALUE, resume));

        for (index, operand) in self.steps.iter().enumerate() {
            body.push(Stmt::If {
                test: JsExpr::binary(
                    BinaryOp::StrictEq,
                    JsExpr::ident(STEP),
                    JsExpr::Integer(index as i64),
                ),
                consequent: vec![
                    Stmt::If {
                        test: self.junction.exit_test(runtime),
                        consequent: vec![Stmt::Return(JsExpr::ident(VALUE))],
                        alternate: Vec::new(),
                    },
                    Stmt::Return(self.reenter(JsExpr::Integer(index as i64 + 1), operand.clone())),
                ],
                alternate: Vec::new(),
            });
        }
        body.push(Stmt::Return(JsExpr::ident(VALUE)));

        JsExpr::function(
            Some(&self.name),
            vec![STEP.to_string(), VALUE.to_string()],
            body,
        )
    }

    /// `$scN.call(this, step, value)`
    fn reenter(&self, step: JsExpr, value: JsExpr) -> JsExpr {
        JsExpr::ident(&self.name).call_with_this(vec![step, value])
    }

    /// The evaluator applied to the first operand.
    pub fn build(&self, runtime: &Runtime, locals: &[String], first: JsExpr) -> JsExpr {
        self.evaluator(runtime, locals)
            .call_with_this(vec![JsExpr::Integer(0), first])
    }
}

/// Unwrap a promise held in `var`.
///
/// A pending promise forks `resume` (which sees the settled value as `$r`)
/// and returns what the fork returns; a faulted one raises its error.
pub(crate) fn resolve_or_fork(runtime: &Runtime, var: &str, resume: JsExpr) -> Stmt {
    let value = || JsExpr::ident(var);
    let continuation = JsExpr::returning(vec![RESOLVED.to_string()], resume);
    Stmt::If {
        test: runtime.is_instance(value(), "Promise"),
        consequent: vec![
            Stmt::If {
                test: JsExpr::not(value().member("isCompleted")),
                consequent: vec![Stmt::Return(runtime.call(
                    "fork",
                    vec![value(), continuation, JsExpr::This],
                ))],
                alternate: Vec::new(),
            },
            Stmt::If {
                test: value().member("isError"),
                consequent: vec![Stmt::Return(
                    runtime.call("fault", vec![value().member("error")]),
                )],
                alternate: Vec::new(),
            },
            Stmt::Expr(JsExpr::assign(value(), value().member("value"))),
        ],
        alternate: Vec::new(),
    }
}

fn flatten<'a>(op: BinaryOperator, expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match &expr.kind {
        ExprKind::Binary {
            op: inner,
            left,
            right,
        } if *inner == op => {
            flatten(op, left, out);
            flatten(op, right, out);
        }
        _ => out.push(expr),
    }
}

pub(crate) fn translate_short_circuit(
    ctx: &mut TranslationContext,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
) -> Result<JsExpr> {
    let junction = Junction::from_operator(op).ok_or_else(|| TranslationError::Internal {
        message: format!("'{}' does not short-circuit", op),
        position: left.pos,
    })?;

    let mut operands = Vec::new();
    flatten(op, left, &mut operands);
    flatten(op, right, &mut operands);
    log::trace!("short-circuit chain of {} operands", operands.len());

    let (first, rest) = match operands.split_first() {
        Some(split) => split,
        None => return Ok(JsExpr::Null),
    };
    let first = translate(ctx, first)?;

    let name = ctx.fresh("sc");
    let mut frame = ctx.enter_frame(ScopeKind::Generic);
    let mut steps = Vec::with_capacity(rest.len());
    for operand in rest {
        steps.push(translate(&mut frame, operand)?);
    }
    let scope = frame.finish();

    let plan = ShortCircuitPlan {
        name,
        junction,
        steps,
    };
    Ok(plan.build(ctx.runtime(), scope.locals(), first))
}
