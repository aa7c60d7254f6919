//! Expression translation
//!
//! Converts syntax tree nodes into target code, one node kind per rule.
//! Scope-introducing constructs live in [`crate::control`] and
//! [`crate::declare`]; assignments in [`crate::assign`].

use ember_ast::{BinaryOperator, BuiltInContract, Expr, ExprKind, Position, Slot, SlotContract};
use ember_target::{Expr as JsExpr, Stmt};

use crate::context::TranslationContext;
use crate::error::{Result, TranslationError};
use crate::runtime::{binary_lowering, is_ambient_global, unary_function, BinaryLowering, Runtime};
use crate::scope::{BindingValue, Scope, ScopeKind};
use crate::{assign, control, declare, short_circuit};

/// Translate one node.
///
/// The node is reduced first under the current arithmetic mode. Every scope
/// pushed while translating is popped again before this returns.
pub fn translate(ctx: &mut TranslationContext, expr: &Expr) -> Result<JsExpr> {
    let reduced = ember_transform::reduce(expr, ctx.is_checked());
    let expr: &Expr = &reduced;
    let pos = expr.pos;

    let out = match &expr.kind {
        ExprKind::Integer { value } => JsExpr::Integer(*value),
        ExprKind::Real { value } => JsExpr::Real(*value),
        ExprKind::Boolean { value } => JsExpr::Bool(*value),
        ExprKind::String { value } => JsExpr::string(value),
        ExprKind::Void => JsExpr::Null,
        ExprKind::Identifier { name } => translate_identifier(ctx, name, pos)?,
        ExprKind::BuiltIn { contract } => ctx.runtime().contract(*contract),
        ExprKind::This => JsExpr::This,
        ExprKind::Callee => match ctx.callee() {
            Some(callee) => JsExpr::ident(callee),
            None => {
                return Err(TranslationError::UndeclaredIdentifier {
                    name: "callee".to_string(),
                    position: pos,
                })
            }
        },
        ExprKind::Binary { op, left, right } => translate_binary(ctx, pos, *op, left, right)?,
        ExprKind::Unary { op, operand } => {
            if op.is_increment_style() {
                assign::translate_increment(ctx, *op, operand)?
            } else {
                let operand = translate(ctx, operand)?;
                ctx.runtime().call(unary_function(*op), vec![operand])
            }
        }
        ExprKind::Invocation {
            target,
            args,
            asynchronous,
        } => translate_invocation(ctx, target, args, *asynchronous)?,
        ExprKind::Indexer { target, indices } => {
            let object = translate(ctx, target)?;
            let indices = translate_all(ctx, indices)?;
            ctx.runtime()
                .call("getItem", vec![object, JsExpr::Array(indices), JsExpr::This])
        }
        ExprKind::Array { elements } => JsExpr::Array(translate_all(ctx, elements)?),
        ExprKind::Container { slots } => translate_container(ctx, slots)?,
        ExprKind::ContainerContract { slots } => translate_container_contract(ctx, slots)?,
        ExprKind::Block { body } => {
            let mut block = ctx.enter(ScopeKind::Generic);
            JsExpr::sequence(translate_all(&mut block, body)?)
        }
        ExprKind::Let {
            name,
            contract,
            constant,
            value,
        } => declare::translate_let(ctx, pos, name, contract.as_deref(), *constant, value)?,
        ExprKind::Function { signature, body } => {
            declare::translate_function(ctx, pos, signature, body)?
        }
        ExprKind::Signature { signature } => declare::translate_signature(ctx, signature)?,
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => control::translate_conditional(ctx, condition, then_branch, else_branch.as_deref())?,
        ExprKind::Try {
            dangerous,
            catch,
            finally,
        } => control::translate_try(ctx, dangerous, catch.as_ref(), finally.as_deref())?,
        ExprKind::Selection {
            target,
            comparer,
            cases,
            default,
        } => control::translate_selection(ctx, target, comparer.as_deref(), cases, default.as_deref())?,
        ExprKind::Repeat {
            name,
            body,
            aggregator,
        } => control::translate_repeat(ctx, pos, name.as_deref(), body, aggregator.as_ref())?,
        ExprKind::ForEach {
            name,
            variable,
            contract,
            source,
            body,
            aggregator,
        } => control::translate_for_each(
            ctx,
            pos,
            control::ForEachParts {
                name: name.as_deref(),
                variable,
                contract: contract.as_deref(),
                source,
                body,
                aggregator: aggregator.as_ref(),
            },
        )?,
        ExprKind::Break {
            destination,
            values,
        } => control::translate_jump(ctx, pos, control::Jump::Break, destination.as_deref(), values)?,
        ExprKind::Continue {
            destination,
            values,
        } => control::translate_jump(
            ctx,
            pos,
            control::Jump::Continue,
            destination.as_deref(),
            values,
        )?,
        ExprKind::Fault { error } => {
            let error = translate(ctx, error)?;
            ctx.runtime().call("fault", vec![error])
        }
        ExprKind::Await {
            bindings,
            body,
            handler,
        } => control::translate_await(ctx, bindings, body, handler.as_ref())?,
        ExprKind::Fork { body, queue } => control::translate_fork(ctx, body, queue.as_deref())?,
        ExprKind::With { target, body } => control::translate_with(ctx, target, body)?,
        ExprKind::Checked { checked, body } => control::translate_checked(ctx, *checked, body)?,
        ExprKind::Quote { body } => {
            let tree = quote(body, pos)?;
            ctx.runtime().construct("Expression", vec![tree])
        }
        ExprKind::Expand { target } => {
            let target = translate(ctx, target)?;
            ctx.runtime().call("expand", vec![target, JsExpr::This])
        }
        ExprKind::Unsupported => {
            return Err(TranslationError::UnsupportedNode {
                kind: expr.kind.name(),
                position: pos,
            })
        }
    };

    Ok(mark(ctx, expr, out))
}

/// Translate nodes left to right, stopping at the first error.
pub fn translate_all(ctx: &mut TranslationContext, exprs: &[Expr]) -> Result<Vec<JsExpr>> {
    exprs.iter().map(|expr| translate(ctx, expr)).collect()
}

/// Prefix the output with its source position in debug mode. Leaves and
/// nodes without a known position stay unmarked.
fn mark(ctx: &TranslationContext, expr: &Expr, out: JsExpr) -> JsExpr {
    let leaf = expr.kind.is_literal()
        || matches!(
            expr.kind,
            ExprKind::Identifier { .. } | ExprKind::This | ExprKind::BuiltIn { .. }
        );
    if ctx.debug() && !leaf && !expr.pos.is_unknown() {
        out.marked(expr.pos.line, expr.pos.column)
    } else {
        out
    }
}

/// `{ line, column }` passed to runtime name resolution in debug mode.
pub(crate) fn debug_position(pos: Position) -> JsExpr {
    JsExpr::object([
        ("line", JsExpr::Integer(i64::from(pos.line))),
        ("column", JsExpr::Integer(i64::from(pos.column))),
    ])
}

pub(crate) fn translate_identifier(
    ctx: &mut TranslationContext,
    name: &str,
    pos: Position,
) -> Result<JsExpr> {
    let runtime = ctx.runtime();
    if let Some(resolved) = ctx.lookup(name) {
        return Ok(match &resolved.binding.value {
            BindingValue::Constant(value) => value.clone(),
            BindingValue::Contract(contract) => runtime.contract(*contract),
            _ => match resolved.layer {
                Some(layer) => {
                    runtime.call("getMember", vec![JsExpr::ident(layer), JsExpr::string(name)])
                }
                None => JsExpr::ident(&resolved.binding.target),
            },
        });
    }
    if let Some(contract) = BuiltInContract::from_name(name) {
        return Ok(runtime.contract(contract));
    }
    if is_ambient_global(name) {
        return Ok(JsExpr::ident(name));
    }

    log::trace!("'{}' left to runtime resolution", name);
    let mut args = vec![JsExpr::string(name)];
    if ctx.debug() {
        args.push(debug_position(pos));
    }
    Ok(runtime.call("resolveName", args))
}

fn translate_binary(
    ctx: &mut TranslationContext,
    pos: Position,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
) -> Result<JsExpr> {
    match binary_lowering(op) {
        BinaryLowering::Direct(op) => {
            let left = translate(ctx, left)?;
            let right = translate(ctx, right)?;
            Ok(JsExpr::binary(op, left, right))
        }
        BinaryLowering::Call(function) => {
            let left = translate(ctx, left)?;
            let right = translate(ctx, right)?;
            Ok(ctx.runtime().call(function, vec![left, right]))
        }
        BinaryLowering::MemberAccess => {
            let object = translate(ctx, left)?;
            let key = member_key(ctx, right)?;
            Ok(ctx.runtime().call("getMember", vec![object, key]))
        }
        BinaryLowering::ShortCircuit => short_circuit::translate_short_circuit(ctx, op, left, right),
        BinaryLowering::Assignment => assign::translate_assignment(ctx, pos, op, left, right),
    }
}

/// Right operand of `.`: a bare name or string is the key itself.
pub(crate) fn member_key(ctx: &mut TranslationContext, key: &Expr) -> Result<JsExpr> {
    match &key.kind {
        ExprKind::Identifier { name } => Ok(JsExpr::string(name)),
        ExprKind::String { value } => Ok(JsExpr::string(value)),
        _ => translate(ctx, key),
    }
}

fn translate_invocation(
    ctx: &mut TranslationContext,
    target: &Expr,
    args: &[Expr],
    asynchronous: bool,
) -> Result<JsExpr> {
    if let ExprKind::Binary {
        op: BinaryOperator::MemberAccess,
        left,
        right,
    } = &target.kind
    {
        let object = translate(ctx, left)?;
        let method = member_key(ctx, right)?;
        let args = translate_all(ctx, args)?;
        let function = if asynchronous {
            "invokeMethodAsync"
        } else {
            "invokeMethod"
        };
        return Ok(ctx
            .runtime()
            .call(function, vec![object, method, JsExpr::Array(args), JsExpr::This]));
    }

    let callee = translate(ctx, target)?;
    let args = translate_all(ctx, args)?;
    let function = if asynchronous { "invokeAsync" } else { "invoke" };
    Ok(ctx
        .runtime()
        .call(function, vec![callee, JsExpr::Array(args), JsExpr::This]))
}

pub(crate) fn check_slot_name<'a>(
    seen: &mut Vec<(&'a str, Position)>,
    name: &'a str,
    pos: Position,
) -> Result<()> {
    if let Some((_, previous)) = seen.iter().find(|(seen_name, _)| *seen_name == name) {
        return Err(TranslationError::DuplicateIdentifier {
            name: name.to_string(),
            position: pos,
            previous: (!previous.is_unknown()).then_some(*previous),
        });
    }
    seen.push((name, pos));
    Ok(())
}

fn optional(ctx: &mut TranslationContext, expr: Option<&Expr>) -> Result<JsExpr> {
    match expr {
        Some(expr) => translate(ctx, expr),
        None => Ok(JsExpr::Null),
    }
}

fn translate_container(ctx: &mut TranslationContext, slots: &[Slot]) -> Result<JsExpr> {
    let mut scope = ctx.enter(ScopeKind::Generic);
    let mut seen = Vec::new();
    let mut entries = Vec::with_capacity(slots.len());
    for slot in slots {
        check_slot_name(&mut seen, &slot.name, slot.pos)?;
        let contract = optional(&mut scope, slot.contract.as_ref())?;
        let value = declare::translate_let_value(&mut scope, &slot.value)?;
        entries.push(JsExpr::object([
            ("name", JsExpr::string(&slot.name)),
            ("contract", contract),
            ("value", value),
        ]));
    }
    Ok(scope
        .runtime()
        .call("newContainer", vec![JsExpr::Array(entries), JsExpr::This]))
}

fn translate_container_contract(
    ctx: &mut TranslationContext,
    slots: &[SlotContract],
) -> Result<JsExpr> {
    let mut seen = Vec::new();
    let mut entries = Vec::with_capacity(slots.len());
    for slot in slots {
        check_slot_name(&mut seen, &slot.name, slot.pos)?;
        let contract = translate(ctx, &slot.contract)?;
        entries.push(JsExpr::object([
            ("name", JsExpr::string(&slot.name)),
            ("contract", contract),
        ]));
    }
    Ok(ctx
        .runtime()
        .call("newContainerContract", vec![JsExpr::Array(entries)]))
}

/// The tree itself as an object literal, for `new runtime.Expression(..)`.
pub(crate) fn quote(body: &Expr, pos: Position) -> Result<JsExpr> {
    let value = serde_json::to_value(body).map_err(|err| TranslationError::Internal {
        message: format!("cannot quote expression: {}", err),
        position: pos,
    })?;
    Ok(json_to_js(&value))
}

fn json_to_js(value: &serde_json::Value) -> JsExpr {
    match value {
        serde_json::Value::Null => JsExpr::Null,
        serde_json::Value::Bool(value) => JsExpr::Bool(*value),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(value) => JsExpr::Integer(value),
            None => JsExpr::Real(number.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(value) => JsExpr::string(value),
        serde_json::Value::Array(items) => JsExpr::Array(items.iter().map(json_to_js).collect()),
        serde_json::Value::Object(map) => JsExpr::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_js(value)))
                .collect(),
        ),
    }
}

/// Statements of a target function body built from a frame scope:
/// `var` for the result slot and hoisted locals, then the return.
pub(crate) fn frame_body(
    runtime: &Runtime,
    scope: &Scope,
    result: Option<&str>,
    value: JsExpr,
) -> Vec<Stmt> {
    let mut vars: Vec<(String, Option<JsExpr>)> = Vec::new();
    if let Some(result) = result {
        vars.push((result.to_string(), None));
    }
    vars.extend(scope.locals().iter().map(|local| (local.clone(), None)));

    let mut body = Vec::with_capacity(2);
    if !vars.is_empty() {
        body.push(Stmt::Var(vars));
    }
    let value = match result {
        Some(result) => runtime.call("ret", vec![value, JsExpr::ident(result)]),
        None => value,
    };
    body.push(Stmt::Return(value));
    body
}

/// `function name(params) { var ...; return value; }` for a finished frame.
pub(crate) fn frame_function(
    runtime: &Runtime,
    name: Option<&str>,
    params: Vec<String>,
    scope: &Scope,
    result: Option<&str>,
    value: JsExpr,
) -> JsExpr {
    JsExpr::function(name, params, frame_body(runtime, scope, result, value))
}

/// `function () { return body; }` with the body in its own frame.
pub(crate) fn closure(ctx: &mut TranslationContext, kind: ScopeKind, body: &Expr) -> Result<JsExpr> {
    let mut frame = ctx.enter_frame(kind);
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();
    Ok(frame_function(ctx.runtime(), None, Vec::new(), &scope, None, value))
}

pub(crate) fn translate_optional(ctx: &mut TranslationContext, expr: Option<&Expr>) -> Result<JsExpr> {
    optional(ctx, expr)
}
