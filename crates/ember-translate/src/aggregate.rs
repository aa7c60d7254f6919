//! Loop result aggregators

use ember_ast::{Aggregator, Position};
use ember_target::Expr as JsExpr;

use crate::context::TranslationContext;
use crate::error::{Result, TranslationError};
use crate::runtime::aggregate_function;
use crate::translate::translate;

/// The second argument of `runtime.repeat` / `runtime.forEach`.
///
/// `null` keeps the raw iteration results. An operator becomes a reference to
/// the runtime function implementing it; a custom aggregator is evaluated
/// once and called through `runtime.invoke`.
pub(crate) fn translate_aggregator(
    ctx: &mut TranslationContext,
    pos: Position,
    aggregator: Option<&Aggregator>,
) -> Result<JsExpr> {
    match aggregator {
        None => Ok(JsExpr::Null),
        Some(Aggregator::Operator(op)) => match aggregate_function(*op) {
            Some(function) => Ok(ctx.runtime().member(function)),
            None => Err(TranslationError::UnsupportedAggregation {
                operator: *op,
                position: pos,
            }),
        },
        Some(Aggregator::Custom(expr)) => {
            let function = translate(ctx, expr)?;
            let agg = ctx.fresh("agg");
            let pair = JsExpr::returning(
                vec!["$x".to_string(), "$y".to_string()],
                ctx.runtime().call(
                    "invoke",
                    vec![
                        JsExpr::ident(&agg),
                        JsExpr::Array(vec![JsExpr::ident("$x"), JsExpr::ident("$y")]),
                        JsExpr::This,
                    ],
                ),
            )
            .bind_this();
            Ok(JsExpr::returning(vec![agg], pair).call_with_this(vec![function]))
        }
    }
}
