//! Assignment, overwrite, compound assignment and increments

use ember_ast::{BinaryOperator, Expr, ExprKind, Position, UnaryOperator};
use ember_target::Expr as JsExpr;

use crate::context::TranslationContext;
use crate::error::{Result, TranslationError};
use crate::runtime::{binary_lowering, unary_function, BinaryLowering};
use crate::scope::BindingValue;
use crate::translate::{member_key, translate, translate_all, translate_identifier};

/// Where a write to a source name lands.
#[derive(Debug, Clone, PartialEq)]
enum LocalTarget {
    ResultSlot(String),
    Variable(String),
    Property(String),
    /// Declared outside a `with`; written as a member of the layer object
    Layer { layer: String, name: String },
}

fn resolve_local(ctx: &TranslationContext, name: &str, pos: Position) -> Result<LocalTarget> {
    let resolved = ctx
        .lookup(name)
        .ok_or_else(|| TranslationError::UndeclaredIdentifier {
            name: name.to_string(),
            position: pos,
        })?;
    let binding = resolved.binding;

    match (&binding.value, resolved.layer) {
        (BindingValue::Constant(_) | BindingValue::Contract(_), _) => {
            Err(TranslationError::ConstantAssignment {
                name: name.to_string(),
                position: pos,
                declared: binding.position,
            })
        }
        (BindingValue::ResultSlot, _) => Ok(LocalTarget::ResultSlot(binding.target.clone())),
        (_, Some(layer)) => Ok(LocalTarget::Layer {
            layer: layer.to_string(),
            name: name.to_string(),
        }),
        (BindingValue::Property, None) => Ok(LocalTarget::Property(binding.target.clone())),
        (BindingValue::Variable, None) => Ok(LocalTarget::Variable(binding.target.clone())),
    }
}

fn assign_local(
    ctx: &TranslationContext,
    target: LocalTarget,
    value: JsExpr,
    overwrite: bool,
) -> JsExpr {
    let runtime = ctx.runtime();
    match target {
        LocalTarget::ResultSlot(target) => JsExpr::assign(JsExpr::ident(target), value),
        LocalTarget::Variable(target) | LocalTarget::Property(target) => {
            let value = if overwrite {
                value
            } else {
                runtime.call("assign", vec![JsExpr::ident(&target), value])
            };
            JsExpr::assign(JsExpr::ident(target), value)
        }
        LocalTarget::Layer { layer, name } => {
            let function = if overwrite { "overwrite" } else { "setMember" };
            runtime.call(function, vec![JsExpr::ident(layer), JsExpr::string(name), value])
        }
    }
}

/// `=`, `:=` and the compound forms.
pub(crate) fn translate_assignment(
    ctx: &mut TranslationContext,
    pos: Position,
    op: BinaryOperator,
    target: &Expr,
    value: &Expr,
) -> Result<JsExpr> {
    if let Some(base) = op.compound_base() {
        return translate_compound(ctx, pos, base, target, value);
    }
    let overwrite = op == BinaryOperator::Overwrite;

    match &target.kind {
        ExprKind::Identifier { name } => {
            let local = resolve_local(ctx, name, position_of(target, pos))?;
            let value = translate(ctx, value)?;
            Ok(assign_local(ctx, local, value, overwrite))
        }
        ExprKind::Binary {
            op: BinaryOperator::MemberAccess,
            left,
            right,
        } => {
            let object = translate(ctx, left)?;
            let key = member_key(ctx, right)?;
            let value = translate(ctx, value)?;
            let function = if overwrite { "overwrite" } else { "setMember" };
            Ok(ctx.runtime().call(function, vec![object, key, value]))
        }
        ExprKind::Indexer { target, indices } => {
            let object = translate(ctx, target)?;
            let indices = translate_all(ctx, indices)?;
            let value = translate(ctx, value)?;
            Ok(ctx
                .runtime()
                .call("setItem", vec![object, JsExpr::Array(indices), value]))
        }
        kind => Err(TranslationError::UnsupportedNode {
            kind: kind.name(),
            position: position_of(target, pos),
        }),
    }
}

fn position_of(expr: &Expr, fallback: Position) -> Position {
    if expr.pos.is_unknown() {
        fallback
    } else {
        expr.pos
    }
}

fn operator_function(op: BinaryOperator, pos: Position) -> Result<&'static str> {
    match binary_lowering(op) {
        BinaryLowering::Call(function) => Ok(function),
        _ => Err(TranslationError::Internal {
            message: format!("'{}' has no runtime function", op),
            position: pos,
        }),
    }
}

/// `target op= value`: the target is read and written once.
fn translate_compound(
    ctx: &mut TranslationContext,
    pos: Position,
    base: BinaryOperator,
    target: &Expr,
    value: &Expr,
) -> Result<JsExpr> {
    let function = operator_function(base, pos)?;

    match &target.kind {
        ExprKind::Identifier { name } => {
            let target_pos = position_of(target, pos);
            let local = resolve_local(ctx, name, target_pos)?;
            let current = translate_identifier(ctx, name, target_pos)?;
            let value = translate(ctx, value)?;
            let combined = ctx.runtime().call(function, vec![current, value]);
            Ok(assign_local(ctx, local, combined, false))
        }
        ExprKind::Binary {
            op: BinaryOperator::MemberAccess,
            left,
            right,
        } => {
            let object = translate(ctx, left)?;
            let key = member_key(ctx, right)?;
            let value = translate(ctx, value)?;
            let (o, k) = (ctx.fresh("o"), ctx.fresh("k"));
            let runtime = ctx.runtime();
            let current = runtime.call("getMember", vec![JsExpr::ident(&o), JsExpr::ident(&k)]);
            let update = runtime.call(
                "setMember",
                vec![
                    JsExpr::ident(&o),
                    JsExpr::ident(&k),
                    runtime.call(function, vec![current, value]),
                ],
            );
            Ok(JsExpr::returning(vec![o, k], update).call_with_this(vec![object, key]))
        }
        ExprKind::Indexer { target, indices } => {
            let object = translate(ctx, target)?;
            let indices = translate_all(ctx, indices)?;
            let value = translate(ctx, value)?;
            let (o, i) = (ctx.fresh("o"), ctx.fresh("i"));
            let runtime = ctx.runtime();
            let current = runtime.call(
                "getItem",
                vec![JsExpr::ident(&o), JsExpr::ident(&i), JsExpr::This],
            );
            let update = runtime.call(
                "setItem",
                vec![
                    JsExpr::ident(&o),
                    JsExpr::ident(&i),
                    runtime.call(function, vec![current, value]),
                ],
            );
            Ok(JsExpr::returning(vec![o, i], update)
                .call_with_this(vec![object, JsExpr::Array(indices)]))
        }
        kind => Err(TranslationError::UnsupportedNode {
            kind: kind.name(),
            position: position_of(target, pos),
        }),
    }
}

/// Prefix `++` / `--`. A declared local is updated in place.
pub(crate) fn translate_increment(
    ctx: &mut TranslationContext,
    op: UnaryOperator,
    operand: &Expr,
) -> Result<JsExpr> {
    let function = unary_function(op);

    let name = match &operand.kind {
        ExprKind::Identifier { name } if ctx.lookup(name).is_some() => name,
        _ => {
            let operand = translate(ctx, operand)?;
            return Ok(ctx.runtime().call(function, vec![operand]));
        }
    };

    let runtime = ctx.runtime();
    Ok(match resolve_local(ctx, name, operand.pos)? {
        LocalTarget::ResultSlot(target) | LocalTarget::Variable(target) => JsExpr::assign(
            JsExpr::ident(&target),
            runtime.call(function, vec![JsExpr::ident(&target)]),
        ),
        LocalTarget::Property(target) => {
            let next = runtime.call(function, vec![JsExpr::ident(&target)]);
            JsExpr::assign(
                JsExpr::ident(&target),
                runtime.call("assign", vec![JsExpr::ident(&target), next]),
            )
        }
        LocalTarget::Layer { layer, name } => {
            let current = runtime.call(
                "getMember",
                vec![JsExpr::ident(&layer), JsExpr::string(&name)],
            );
            runtime.call(
                "setMember",
                vec![
                    JsExpr::ident(layer),
                    JsExpr::string(name),
                    runtime.call(function, vec![current]),
                ],
            )
        }
    })
}
