//! Declarations: `let`, properties, functions and signatures

use ember_ast::{BuiltInContract, Expr, ExprKind, FunctionBody, LetValue, Position, Signature};
use ember_target::Expr as JsExpr;

use crate::context::TranslationContext;
use crate::error::Result;
use crate::scope::{AccessorKind, BindingValue, ScopeKind};
use crate::translate::{check_slot_name, frame_function, quote, translate, translate_optional};

pub(crate) fn translate_let(
    ctx: &mut TranslationContext,
    pos: Position,
    name: &str,
    contract: Option<&Expr>,
    constant: bool,
    value: &LetValue,
) -> Result<JsExpr> {
    // Functions and properties see their own name; anything else is declared
    // after its value so `let x = x` reads the outer `x`.
    let early = match value {
        LetValue::Value(value) => matches!(value.kind, ExprKind::Function { .. }),
        LetValue::Property { .. } => true,
    };
    let (value, binding, declared) = match value {
        LetValue::Value(value) => {
            let binding = match contract {
                Some(_) => BindingValue::Variable,
                None => classify(ctx, constant, value),
            };
            let declared = if early {
                Some(ctx.declare(name, binding.clone(), pos)?)
            } else {
                None
            };
            (translate(ctx, value)?, binding, declared)
        }
        LetValue::Property { get, set } => {
            let declared = ctx.declare(name, BindingValue::Property, pos)?;
            (
                translate_property(ctx, get.as_deref(), set.as_deref())?,
                BindingValue::Property,
                Some(declared),
            )
        }
    };

    let value = match contract {
        Some(contract) => {
            let contract = translate(ctx, contract)?;
            ctx.runtime().call("binding", vec![value, contract])
        }
        None => value,
    };

    let target = match declared {
        Some(target) => target,
        None => ctx.declare(name, binding, pos)?,
    };
    Ok(JsExpr::assign(JsExpr::ident(target), value))
}

/// Decide how uses of a new `let` binding are translated.
fn classify(ctx: &TranslationContext, constant: bool, value: &Expr) -> BindingValue {
    let reduced = ember_transform::reduce(value, ctx.is_checked());
    match &reduced.kind {
        ExprKind::BuiltIn { contract } if constant => BindingValue::Contract(*contract),
        ExprKind::Identifier { name } if constant && ctx.lookup(name).is_none() => {
            match BuiltInContract::from_name(name) {
                Some(contract) => BindingValue::Contract(contract),
                None => BindingValue::Variable,
            }
        }
        kind if constant && kind.is_literal() => BindingValue::Constant(literal(kind)),
        _ => BindingValue::Variable,
    }
}

fn literal(kind: &ExprKind) -> JsExpr {
    match kind {
        ExprKind::Integer { value } => JsExpr::Integer(*value),
        ExprKind::Real { value } => JsExpr::Real(*value),
        ExprKind::Boolean { value } => JsExpr::Bool(*value),
        ExprKind::String { value } => JsExpr::string(value),
        _ => JsExpr::Null,
    }
}

/// Value of a container slot, which has no binding of its own.
pub(crate) fn translate_let_value(ctx: &mut TranslationContext, value: &LetValue) -> Result<JsExpr> {
    match value {
        LetValue::Value(value) => translate(ctx, value),
        LetValue::Property { get, set } => translate_property(ctx, get.as_deref(), set.as_deref()),
    }
}

/// `runtime.newProperty(getter, setter, this)`
fn translate_property(
    ctx: &mut TranslationContext,
    get: Option<&Expr>,
    set: Option<&Expr>,
) -> Result<JsExpr> {
    let getter = match get {
        Some(body) => accessor(ctx, AccessorKind::Get, body)?,
        None => JsExpr::Null,
    };
    let setter = match set {
        Some(body) => accessor(ctx, AccessorKind::Set, body)?,
        None => JsExpr::Null,
    };
    Ok(ctx
        .runtime()
        .call("newProperty", vec![getter, setter, JsExpr::This]))
}

fn accessor(ctx: &mut TranslationContext, kind: AccessorKind, body: &Expr) -> Result<JsExpr> {
    let mut frame = ctx.enter_frame(ScopeKind::Accessor(kind));
    let result = frame.declare_result_slot();
    let params = match kind {
        AccessorKind::Get => Vec::new(),
        AccessorKind::Set => vec![frame.declare_parameter("value", body.pos)?],
    };
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();
    Ok(frame_function(
        ctx.runtime(),
        None,
        params,
        &scope,
        Some(&result),
        value,
    ))
}

/// `new runtime.Function(signature, implementation)`
pub(crate) fn translate_function(
    ctx: &mut TranslationContext,
    pos: Position,
    signature: &Signature,
    body: &FunctionBody,
) -> Result<JsExpr> {
    let contract = translate_signature(ctx, signature)?;

    let implementation = match body {
        FunctionBody::Quoted(body) => ctx.runtime().construct("Expression", vec![quote(body, pos)?]),
        FunctionBody::Expression(body) => {
            let callee = ctx.unused_name("callee");
            let mut frame = ctx.enter_frame(ScopeKind::Function {
                callee: callee.clone(),
            });
            frame.claim(&callee);
            let result = frame.declare_result_slot();

            let mut params = Vec::with_capacity(signature.params.len());
            for param in signature.params.iter().filter(|param| param.name != "result") {
                params.push(frame.declare_parameter(&param.name, param.pos)?);
            }

            let value = translate(&mut frame, body)?;
            let scope = frame.finish();
            frame_function(
                ctx.runtime(),
                Some(&callee),
                params,
                &scope,
                Some(&result),
                value,
            )
        }
    };

    Ok(ctx
        .runtime()
        .construct("Function", vec![contract, implementation]))
}

/// `new runtime.Signature([{ name, contract }...], resultContract)`
///
/// A parameter named `result` gives the return contract.
pub(crate) fn translate_signature(ctx: &mut TranslationContext, signature: &Signature) -> Result<JsExpr> {
    let mut seen = Vec::new();
    let mut params = Vec::with_capacity(signature.params.len());
    let mut result = JsExpr::Null;

    for param in &signature.params {
        check_slot_name(&mut seen, &param.name, param.pos)?;
        let contract = translate_optional(ctx, param.contract.as_ref())?;
        if param.name == "result" {
            result = contract;
            continue;
        }
        params.push(JsExpr::object([
            ("name", JsExpr::string(&param.name)),
            ("contract", contract),
        ]));
    }

    Ok(ctx
        .runtime()
        .construct("Signature", vec![JsExpr::Array(params), result]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslationError;
    use crate::runtime::Runtime;
    use ember_ast::{BinaryOperator, Parameter};
    use ember_target::print_expr;

    fn ctx() -> TranslationContext {
        TranslationContext::new(Runtime::default(), false, true)
    }

    fn emit(ctx: &mut TranslationContext, expr: &Expr) -> String {
        print_expr(&translate(ctx, expr).unwrap())
    }

    #[test]
    fn test_let_declares_and_assigns() {
        let mut ctx = ctx();
        assert_eq!(emit(&mut ctx, &Expr::let_value("count", Expr::integer(1))), "count = 1");
        assert_eq!(ctx.global().locals(), ["count".to_string()]);

        let err = translate(&mut ctx, &Expr::let_value("count", Expr::integer(2))).unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn test_let_with_contract() {
        let mut ctx = ctx();
        let expr = Expr::synthetic(ExprKind::Let {
            name: "n".into(),
            contract: Some(Box::new(Expr::ident("integer"))),
            constant: false,
            value: LetValue::Value(Box::new(Expr::integer(3))),
        });
        assert_eq!(emit(&mut ctx, &expr), "n = runtime.binding(3, runtime.globals.integer)");
    }

    #[test]
    fn test_reserved_target_names_are_renamed() {
        let mut ctx = ctx();
        assert_eq!(emit(&mut ctx, &Expr::let_value("new", Expr::integer(1))), "new_ = 1");
        assert_eq!(emit(&mut ctx, &Expr::let_value("runtime", Expr::integer(1))), "runtime_ = 1");
        assert_eq!(emit(&mut ctx, &Expr::ident("new")), "new_");
    }

    #[test]
    fn test_constant_is_inlined() {
        let mut ctx = ctx();
        let folded = Expr::binary(BinaryOperator::Plus, Expr::integer(2), Expr::integer(3));
        emit(&mut ctx, &Expr::constant("limit", folded));
        assert_eq!(emit(&mut ctx, &Expr::ident("limit")), "5");
    }

    #[test]
    fn test_contract_alias() {
        let mut ctx = ctx();
        assert_eq!(
            emit(&mut ctx, &Expr::constant("number", Expr::ident("real"))),
            "number = runtime.globals.real"
        );
        assert_eq!(emit(&mut ctx, &Expr::ident("number")), "runtime.globals.real");
    }

    #[test]
    fn test_contract_valued_let_stays_assignable() {
        let mut ctx = ctx();
        emit(&mut ctx, &Expr::let_value("t", Expr::ident("integer")));
        assert_eq!(emit(&mut ctx, &Expr::ident("t")), "t");
        assert_eq!(
            emit(&mut ctx, &Expr::assign(Expr::ident("t"), Expr::ident("real"))),
            "t = runtime.assign(t, runtime.globals.real)"
        );
    }

    #[test]
    fn test_function_value_sees_its_binding() {
        let mut ctx = ctx();
        let call_self = Expr::call(Expr::ident("again"), vec![]);
        let out = emit(&mut ctx, &Expr::let_value("again", Expr::function(&[], call_self)));
        assert!(out.contains("runtime.invoke(again, [], this)"), "{}", out);
        assert!(!out.contains("resolveName"));

        // Plain values still read the outer binding.
        emit(&mut ctx, &Expr::let_value("x", Expr::integer(1)));
        let shadow = Expr::block(vec![Expr::let_value("x", Expr::ident("x"))]);
        assert!(translate(&mut ctx, &shadow).is_ok());
    }

    #[test]
    fn test_function() {
        let mut ctx = ctx();
        let expr = Expr::function(&["a", "b"], Expr::ident("a"));
        assert_eq!(
            emit(&mut ctx, &expr),
            "new runtime.Function(new runtime.Signature([{ name: \"a\", contract: null }, \
             { name: \"b\", contract: null }], null), function callee(a, b) {\n  var result;\n  \
             return runtime.ret(a, result);\n})"
        );
        // Parameters do not leak.
        assert!(ctx.lookup("a").is_none());
        assert!(ctx.global().locals().is_empty());
    }

    #[test]
    fn test_nested_functions_get_distinct_callee_names() {
        let mut ctx = ctx();
        let inner = Expr::function(&[], Expr::synthetic(ExprKind::Callee));
        let outer = Expr::function(&[], inner);
        let out = emit(&mut ctx, &outer);
        assert!(out.contains("function callee()"));
        assert!(out.contains("function callee_1()"));
        assert!(out.contains("runtime.ret(callee_1, result_1)"));
    }

    #[test]
    fn test_duplicate_parameter() {
        let mut ctx = ctx();
        let expr = Expr::function(&["a", "a"], Expr::void());
        let err = translate(&mut ctx, &expr).unwrap_err();
        assert!(matches!(err, TranslationError::DuplicateIdentifier { ref name, .. } if name == "a"));
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn test_signature_result_contract() {
        let mut ctx = ctx();
        let signature = Signature {
            params: vec![
                Parameter {
                    name: "x".into(),
                    contract: Some(Expr::ident("integer")),
                    pos: Position::UNKNOWN,
                },
                Parameter {
                    name: "result".into(),
                    contract: Some(Expr::ident("string")),
                    pos: Position::UNKNOWN,
                },
            ],
        };
        let expr = Expr::synthetic(ExprKind::Signature { signature });
        assert_eq!(
            emit(&mut ctx, &expr),
            "new runtime.Signature([{ name: \"x\", contract: runtime.globals.integer }], \
             runtime.globals.string)"
        );
    }

    #[test]
    fn test_quoted_body_is_not_translated() {
        let mut ctx = ctx();
        let expr = Expr::synthetic(ExprKind::Function {
            signature: Signature::default(),
            body: FunctionBody::Quoted(Box::new(Expr::ident("undeclared"))),
        });
        let out = emit(&mut ctx, &expr);
        assert!(out.contains("new runtime.Expression({ "));
        assert!(!out.contains("resolveName"));
    }

    #[test]
    fn test_property_accessors() {
        let mut ctx = ctx();
        let expr = Expr::property(
            "p",
            Some(Expr::integer(1)),
            Some(Expr::assign(Expr::ident("result"), Expr::ident("value"))),
        );
        assert_eq!(
            emit(&mut ctx, &expr),
            "p = runtime.newProperty(function () {\n  var result;\n  return runtime.ret(1, result);\n}, \
             function (value) {\n  var result;\n  return runtime.ret(result = value, result);\n}, this)"
        );
        assert!(matches!(
            ctx.lookup("p").map(|r| r.binding.value.clone()),
            Some(BindingValue::Property)
        ));
    }

    #[test]
    fn test_result_outside_function_is_not_the_slot() {
        let mut ctx = ctx();
        let err = translate(&mut ctx, &Expr::assign(Expr::ident("result"), Expr::integer(1))).unwrap_err();
        assert!(matches!(err, TranslationError::UndeclaredIdentifier { .. }));
    }
}
