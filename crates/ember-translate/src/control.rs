//! Control constructs: conditionals, exception handling, selection, loops,
//! jumps, await, fork, layers and arithmetic contexts

use ember_ast::{Aggregator, AwaitBinding, CatchClause, Expr, ExprKind, Position, SelectionCase};
use ember_target::{Expr as JsExpr, Stmt};

use crate::aggregate::translate_aggregator;
use crate::context::TranslationContext;
use crate::error::{Result, TranslationError};
use crate::scope::ScopeKind;
use crate::short_circuit::{resolve_or_fork, RESOLVED};
use crate::translate::{
    closure, frame_body, frame_function, translate, translate_all, translate_optional,
};

const CONDITION: &str = "$c";

/// Statements of a branch translated in its own frame.
fn branch(ctx: &mut TranslationContext, body: &Expr) -> Result<Vec<Stmt>> {
    let mut frame = ctx.enter_frame(ScopeKind::Generic);
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();
    Ok(frame_body(ctx.runtime(), &scope, None, value))
}

/// `if` as an immediately invoked function of the condition value.
///
/// The function re-enters itself once a pending condition settles and
/// unwraps reactive properties before testing.
pub(crate) fn translate_conditional(
    ctx: &mut TranslationContext,
    condition: &Expr,
    then_branch: &Expr,
    else_branch: Option<&Expr>,
) -> Result<JsExpr> {
    let condition = translate(ctx, condition)?;
    let name = ctx.fresh("cond");
    let then_body = branch(ctx, then_branch)?;
    let else_body = match else_branch {
        Some(else_branch) => branch(ctx, else_branch)?,
        None => vec![Stmt::Return(JsExpr::Null)],
    };

    let runtime = ctx.runtime();
    let value = || JsExpr::ident(CONDITION);
    let reenter = |arg: JsExpr| JsExpr::ident(&name).call_with_this(vec![arg]);

    let mut body = vec![
        resolve_or_fork(runtime, CONDITION, reenter(JsExpr::ident(RESOLVED))),
        Stmt::If {
            test: runtime.is_instance(value(), "Property"),
            consequent: vec![Stmt::Return(reenter(value().member("value")))],
            alternate: Vec::new(),
        },
        Stmt::If {
            test: runtime.call("toBoolean", vec![value()]),
            consequent: then_body,
            alternate: Vec::new(),
        },
    ];
    body.extend(else_body);

    Ok(JsExpr::function(Some(&name), vec![CONDITION.to_string()], body)
        .call_with_this(vec![condition]))
}

/// `runtime.tryCatchFinally(dangerous, catch, finally, this)`
pub(crate) fn translate_try(
    ctx: &mut TranslationContext,
    dangerous: &Expr,
    catch: Option<&CatchClause>,
    finally: Option<&Expr>,
) -> Result<JsExpr> {
    let dangerous = closure(ctx, ScopeKind::Generic, dangerous)?.bind_this();
    let handler = match catch {
        Some(clause) => translate_handler(ctx, clause)?,
        None => JsExpr::Null,
    };
    let finally = match finally {
        Some(finally) => closure(ctx, ScopeKind::Generic, finally)?.bind_this(),
        None => JsExpr::Null,
    };
    Ok(ctx.runtime().call(
        "tryCatchFinally",
        vec![dangerous, handler, finally, JsExpr::This],
    ))
}

/// Error handler of a `try` or an `await`: `function (e) { ... }.bind(this)`.
pub(crate) fn translate_handler(ctx: &mut TranslationContext, clause: &CatchClause) -> Result<JsExpr> {
    let mut frame = ctx.enter_frame(ScopeKind::Catch);
    let mut params = Vec::new();
    let mut sequence = Vec::new();

    if let Some(name) = &clause.name {
        let target = frame.declare_parameter(name, clause.body.pos)?;
        if let Some(contract) = &clause.contract {
            let contract = translate(&mut frame, contract)?;
            let bound = frame
                .runtime()
                .call("binding", vec![JsExpr::ident(&target), contract]);
            sequence.push(JsExpr::assign(JsExpr::ident(&target), bound));
        }
        params.push(target);
    }

    sequence.push(translate(&mut frame, &clause.body)?);
    let scope = frame.finish();
    Ok(frame_function(
        ctx.runtime(),
        None,
        params,
        &scope,
        None,
        JsExpr::sequence(sequence),
    )
    .bind_this())
}

/// `runtime.select(target, comparer, [[value, handler]...], default, this)`
///
/// Every case handler is created once; all values of a case share it.
pub(crate) fn translate_selection(
    ctx: &mut TranslationContext,
    target: &Expr,
    comparer: Option<&Expr>,
    cases: &[SelectionCase],
    default: Option<&Expr>,
) -> Result<JsExpr> {
    let target = translate(ctx, target)?;
    let comparer = translate_optional(ctx, comparer)?;

    let mut handlers = Vec::with_capacity(cases.len());
    let mut pairs = Vec::new();
    for case in cases {
        let values = translate_all(ctx, &case.values)?;
        let handler = closure(ctx, ScopeKind::Generic, &case.handler)?.bind_this();
        let name = ctx.fresh("h");
        pairs.extend(
            values
                .into_iter()
                .map(|value| JsExpr::Array(vec![value, JsExpr::ident(&name)])),
        );
        handlers.push((name, Some(handler)));
    }

    let default = match default {
        Some(default) => closure(ctx, ScopeKind::Generic, default)?.bind_this(),
        None => JsExpr::Null,
    };

    let mut body = Vec::with_capacity(2);
    if !handlers.is_empty() {
        body.push(Stmt::Var(handlers));
    }
    body.push(Stmt::Return(ctx.runtime().call(
        "select",
        vec![target, comparer, JsExpr::Array(pairs), default, JsExpr::This],
    )));
    Ok(JsExpr::function(None, Vec::new(), body).call_with_this(Vec::new()))
}

/// `runtime.repeat(function (state) { ... }, aggregator, this)`
pub(crate) fn translate_repeat(
    ctx: &mut TranslationContext,
    pos: Position,
    name: Option<&str>,
    body: &Expr,
    aggregator: Option<&Aggregator>,
) -> Result<JsExpr> {
    let aggregator = translate_aggregator(ctx, pos, aggregator)?;
    let state = ctx.fresh("loop");

    let mut frame = ctx.enter_frame(ScopeKind::Repeat {
        state: state.clone(),
        name: name.map(str::to_string),
    });
    frame.claim(&state);
    if let Some(name) = name {
        frame.alias(name, &state, pos)?;
    }
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();

    let runtime = ctx.runtime();
    let iteration = runtime.call("continue", vec![JsExpr::ident(&state), value]);
    let function = frame_function(runtime, None, vec![state], &scope, None, iteration);
    Ok(runtime.call("repeat", vec![function, aggregator, JsExpr::This]))
}

/// Parts of a `for` loop.
pub(crate) struct ForEachParts<'a> {
    pub name: Option<&'a str>,
    pub variable: &'a str,
    pub contract: Option<&'a Expr>,
    pub source: &'a Expr,
    pub body: &'a Expr,
    pub aggregator: Option<&'a Aggregator>,
}

/// `runtime.forEach(iterator, function (state, item) { ... }, aggregator, this)`
pub(crate) fn translate_for_each(
    ctx: &mut TranslationContext,
    pos: Position,
    parts: ForEachParts<'_>,
) -> Result<JsExpr> {
    let source = translate(ctx, parts.source)?;
    let aggregator = translate_aggregator(ctx, pos, parts.aggregator)?;
    let contract = parts
        .contract
        .map(|contract| translate(ctx, contract))
        .transpose()?;
    let state = ctx.fresh("loop");

    let mut frame = ctx.enter_frame(ScopeKind::ForEach {
        state: state.clone(),
        name: parts.name.map(str::to_string),
    });
    frame.claim(&state);
    if let Some(name) = parts.name {
        frame.alias(name, &state, pos)?;
    }
    let item = frame.declare_parameter(parts.variable, pos)?;
    let value = translate(&mut frame, parts.body)?;
    let scope = frame.finish();

    let runtime = ctx.runtime();
    let mut sequence = Vec::with_capacity(2);
    if let Some(contract) = contract {
        let bound = runtime.call("binding", vec![JsExpr::ident(&item), contract]);
        sequence.push(JsExpr::assign(JsExpr::ident(&item), bound));
    }
    sequence.push(runtime.call("continue", vec![JsExpr::ident(&state), value]));

    let iterator = runtime.call(
        "invokeMethod",
        vec![source, JsExpr::string("iterator"), JsExpr::Array(Vec::new())],
    );
    let function = frame_function(
        runtime,
        None,
        vec![state, item],
        &scope,
        None,
        JsExpr::sequence(sequence),
    );
    Ok(runtime.call(
        "forEach",
        vec![iterator, function, aggregator, JsExpr::This],
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Jump {
    Break,
    Continue,
}

impl Jump {
    fn method(self) -> &'static str {
        match self {
            Jump::Break => "break",
            Jump::Continue => "continue",
        }
    }

    fn outside_loop(self, position: Position) -> TranslationError {
        match self {
            Jump::Break => TranslationError::InvalidBreak { position },
            Jump::Continue => TranslationError::InvalidContinue { position },
        }
    }
}

/// `break` / `continue`.
///
/// Without a destination the innermost loop of the current function is
/// meant. A destination naming such a loop jumps through its state; any
/// other destination is left to the runtime.
pub(crate) fn translate_jump(
    ctx: &mut TranslationContext,
    pos: Position,
    jump: Jump,
    destination: Option<&Expr>,
    values: &[Expr],
) -> Result<JsExpr> {
    let state = match destination {
        None => Some(ctx.loop_state(None).ok_or_else(|| jump.outside_loop(pos))?),
        Some(Expr {
            kind: ExprKind::Identifier { name },
            ..
        }) => ctx.loop_state(Some(name.as_str())),
        Some(_) => None,
    };

    match (state, destination) {
        (Some(state), _) => {
            let values = translate_all(ctx, values)?;
            Ok(JsExpr::ident(state).method(jump.method(), values))
        }
        (None, Some(destination)) => {
            let mut args = vec![translate(ctx, destination)?];
            args.extend(translate_all(ctx, values)?);
            Ok(ctx.runtime().call(jump.method(), args))
        }
        (None, None) => Err(jump.outside_loop(pos)),
    }
}

/// `runtime.await([{ name, contract, value }...], body, handler)`
pub(crate) fn translate_await(
    ctx: &mut TranslationContext,
    bindings: &[AwaitBinding],
    body: &Expr,
    handler: Option<&CatchClause>,
) -> Result<JsExpr> {
    let mut entries = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let contract = translate_optional(ctx, binding.contract.as_ref())?;
        let value = translate(ctx, &binding.value)?;
        entries.push(JsExpr::object([
            ("name", JsExpr::string(&binding.name)),
            ("contract", contract),
            ("value", value),
        ]));
    }

    let mut frame = ctx.enter_frame(ScopeKind::Await);
    let mut params = Vec::with_capacity(bindings.len());
    for binding in bindings {
        params.push(frame.declare_parameter(&binding.name, binding.pos)?);
    }
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();
    let continuation = frame_function(ctx.runtime(), None, params, &scope, None, value).bind_this();

    let handler = match handler {
        Some(handler) => translate_handler(ctx, handler)?,
        None => JsExpr::Null,
    };
    Ok(ctx.runtime().call(
        "await",
        vec![JsExpr::Array(entries), continuation, handler],
    ))
}

/// `runtime.newPromise(body, queue)`
pub(crate) fn translate_fork(
    ctx: &mut TranslationContext,
    body: &Expr,
    queue: Option<&Expr>,
) -> Result<JsExpr> {
    let body = closure(ctx, ScopeKind::Generic, body)?.bind_this();
    let queue = translate_optional(ctx, queue)?;
    Ok(ctx.runtime().call("newPromise", vec![body, queue]))
}

/// `runtime.withLayer(target, function (layer) { ... }.bind(this))`
pub(crate) fn translate_with(ctx: &mut TranslationContext, target: &Expr, body: &Expr) -> Result<JsExpr> {
    let target = translate(ctx, target)?;
    let layer = ctx.fresh("layer");

    let mut frame = ctx.enter_frame(ScopeKind::Layer {
        layer: layer.clone(),
    });
    frame.claim(&layer);
    let value = translate(&mut frame, body)?;
    let scope = frame.finish();

    let runtime = ctx.runtime();
    let function = frame_function(runtime, None, vec![layer], &scope, None, value).bind_this();
    Ok(runtime.call("withLayer", vec![target, function]))
}

/// `runtime.checked(flag, body)`; the flag also selects how constants fold
/// inside the body.
pub(crate) fn translate_checked(ctx: &mut TranslationContext, checked: bool, body: &Expr) -> Result<JsExpr> {
    let body = closure(ctx, ScopeKind::Context { checked }, body)?.bind_this();
    Ok(ctx
        .runtime()
        .call("checked", vec![JsExpr::Bool(checked), body]))
}
