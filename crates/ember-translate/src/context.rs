//! Translation context: the scope stack and name allocation

use std::ops::{Deref, DerefMut};

use ember_ast::Position;

use crate::error::{Result, TranslationError};
use crate::runtime::{Runtime, AMBIENT_GLOBALS};
use crate::scope::{Binding, BindingValue, Scope, ScopeKind};

/// Words the target language reserves or treats specially.
const TARGET_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Tracks scopes while a statement is translated.
///
/// There is always exactly one Global scope at the bottom of the stack.
/// Scopes are pushed through [`TranslationContext::enter`] and popped when
/// the returned guard goes away.
pub struct TranslationContext {
    runtime: Runtime,
    debug: bool,
    checked: bool,
    scopes: Vec<Scope>,
    /// Counter for generated names
    next_id: u32,
}

/// A binding found by [`TranslationContext::lookup`].
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub binding: &'a Binding,
    /// Target name of the innermost `with` layer between the use and the
    /// declaration, if any
    pub layer: Option<&'a str>,
}

impl TranslationContext {
    pub fn new(runtime: Runtime, debug: bool, checked: bool) -> Self {
        Self {
            runtime,
            debug,
            checked,
            scopes: vec![Scope::new(ScopeKind::Global, true)],
            next_id: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Whether debug comments and name-resolution positions are emitted.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Arithmetic mode of the innermost `checked`/`unchecked` block.
    pub fn is_checked(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| match scope.kind {
                ScopeKind::Context { checked } => Some(checked),
                _ => None,
            })
            .unwrap_or(self.checked)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> &Scope {
        // The Global scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn global_mut(&mut self) -> &mut Scope {
        &mut self.scopes[0]
    }

    /// Push a scope that shares its frame with the enclosing one.
    pub fn enter(&mut self, kind: ScopeKind) -> ScopeGuard<'_> {
        self.push(kind, false)
    }

    /// Push a scope that is the body of a new target function.
    pub fn enter_frame(&mut self, kind: ScopeKind) -> ScopeGuard<'_> {
        self.push(kind, true)
    }

    fn push(&mut self, kind: ScopeKind, frame: bool) -> ScopeGuard<'_> {
        log::debug!("enter {} scope at depth {}", kind.name(), self.scopes.len());
        self.scopes.push(Scope::new(kind, frame));
        let depth = self.scopes.len();
        ScopeGuard {
            ctx: self,
            depth,
            finished: false,
        }
    }

    fn pop(&mut self, depth: usize) -> Scope {
        debug_assert_eq!(self.scopes.len(), depth, "scope stack out of order");
        debug_assert!(depth > 1, "the global scope is never popped");
        let scope = self
            .scopes
            .pop()
            .unwrap_or_else(|| Scope::new(ScopeKind::Generic, false));
        log::debug!("exit {} scope at depth {}", scope.kind.name(), self.scopes.len());
        scope
    }

    /// A new generated name, e.g. `$loop3`.
    pub fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("${}{}", prefix, self.next_id);
        self.next_id += 1;
        name
    }

    /// Declare a local in the current scope and hoist it into the nearest
    /// frame. Returns its target name.
    pub fn declare(
        &mut self,
        name: &str,
        value: BindingValue,
        position: Position,
    ) -> Result<String> {
        let target = self.bind(name, value, position)?;
        let frame = self.frame_index();
        self.scopes[frame].hoist(target.clone());
        Ok(target)
    }

    /// Declare a parameter of the current frame. Parameters are not hoisted.
    pub fn declare_parameter(&mut self, name: &str, position: Position) -> Result<String> {
        self.bind(name, BindingValue::Variable, position)
    }

    /// Bind `name` to an existing target name, e.g. a loop-state parameter.
    pub fn alias(&mut self, name: &str, target: &str, position: Position) -> Result<()> {
        self.check_duplicate(name, position)?;
        self.current_mut()
            .insert(name, Binding::variable(target, position));
        Ok(())
    }

    /// Reserve the `result` slot of a function or accessor frame.
    pub fn declare_result_slot(&mut self) -> String {
        let target = self.allocate("result");
        self.current_mut().insert(
            "result",
            Binding::variable(target.clone(), Position::UNKNOWN).with_value(BindingValue::ResultSlot),
        );
        target
    }

    fn check_duplicate(&self, name: &str, position: Position) -> Result<()> {
        match self.current().get(name) {
            Some(previous) => Err(TranslationError::DuplicateIdentifier {
                name: name.to_string(),
                position,
                previous: (!previous.position.is_unknown()).then_some(previous.position),
            }),
            None => Ok(()),
        }
    }

    fn bind(&mut self, name: &str, value: BindingValue, position: Position) -> Result<String> {
        self.check_duplicate(name, position)?;
        let base = sanitize(name, self.runtime.name());
        let target = self.allocate(&base);
        log::debug!("declare '{}' as '{}'", name, target);
        self.current_mut().insert(
            name,
            Binding::variable(target.clone(), position).with_value(value),
        );
        Ok(target)
    }

    /// Pick a target name no enclosing frame uses and claim it in the
    /// nearest frame.
    pub fn allocate(&mut self, base: &str) -> String {
        let name = self.unused_name(base);
        self.claim(&name);
        name
    }

    /// A target name no enclosing frame uses, without claiming it.
    pub fn unused_name(&self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut suffix = 1;
        while self.scopes.iter().any(|scope| scope.is_taken(&candidate)) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        candidate
    }

    /// Mark a target name as used in the nearest frame.
    pub fn claim(&mut self, target: &str) {
        let frame = self.frame_index();
        self.scopes[frame].take_name(target);
    }

    fn frame_index(&self) -> usize {
        self.scopes
            .iter()
            .rposition(Scope::is_frame)
            .unwrap_or(0)
    }

    /// Find the binding `name` refers to.
    ///
    /// The `result` slot is only visible up to the first opaque scope.
    pub fn lookup(&self, name: &str) -> Option<Resolved<'_>> {
        let mut layer = None;
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.get(name) {
                let layer = match binding.value {
                    BindingValue::Variable | BindingValue::Property => layer,
                    _ => None,
                };
                return Some(Resolved { binding, layer });
            }
            if name == "result" && !scope.kind.is_transparent() {
                return None;
            }
            if layer.is_none() {
                if let ScopeKind::Layer { layer: target } = &scope.kind {
                    layer = Some(target.as_str());
                }
            }
        }
        None
    }

    /// Innermost enclosing scope satisfying `pred`.
    ///
    /// With `within_function` set the search stops at the nearest function
    /// or accessor boundary.
    pub fn find_enclosing<P>(&self, within_function: bool, pred: P) -> Option<&ScopeKind>
    where
        P: Fn(&ScopeKind) -> bool,
    {
        for scope in self.scopes.iter().rev() {
            if pred(&scope.kind) {
                return Some(&scope.kind);
            }
            if within_function && scope.kind.is_function_boundary() {
                return None;
            }
        }
        None
    }

    /// State variable of the loop a `break`/`continue` targets: the named
    /// loop, or the innermost one when `name` is `None`.
    pub fn loop_state(&self, name: Option<&str>) -> Option<String> {
        self.find_enclosing(true, |kind| {
            kind.is_loop() && (name.is_none() || kind.loop_name() == name)
        })
        .and_then(ScopeKind::loop_state)
        .map(str::to_string)
    }

    /// Target name of the innermost enclosing function.
    pub fn callee(&self) -> Option<String> {
        match self.find_enclosing(false, |kind| matches!(kind, ScopeKind::Function { .. })) {
            Some(ScopeKind::Function { callee }) => Some(callee.clone()),
            _ => None,
        }
    }

    /// Snapshot of the Global scope, taken before a top-level statement.
    pub fn checkpoint(&self) -> Scope {
        self.scopes[0].clone()
    }

    /// Undo everything a failed top-level statement declared.
    pub fn rollback(&mut self, checkpoint: Scope) {
        self.scopes.truncate(1);
        self.scopes[0] = checkpoint;
    }
}

/// Keeps a scope on the stack for as long as it lives.
///
/// Dereferences to the context, so nested translation runs through the
/// guard. Dropping it pops the scope, including on error paths.
pub struct ScopeGuard<'a> {
    ctx: &'a mut TranslationContext,
    depth: usize,
    finished: bool,
}

impl ScopeGuard<'_> {
    /// Pop the scope and hand it back, with the locals it collected.
    pub fn finish(mut self) -> Scope {
        self.finished = true;
        self.ctx.pop(self.depth)
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = TranslationContext;

    fn deref(&self) -> &TranslationContext {
        self.ctx
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut TranslationContext {
        self.ctx
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.ctx.pop(self.depth);
        }
    }
}

/// Turn a source name into a valid target identifier that cannot clash
/// with generated names, reserved words, host globals or the runtime object.
pub fn sanitize(name: &str, runtime_name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    // Generated names are `$` followed by a letter.
    if out.starts_with('$') {
        out.insert(0, '$');
    }
    if TARGET_RESERVED.contains(&out.as_str())
        || AMBIENT_GLOBALS.contains(&out.as_str())
        || out == runtime_name
    {
        out.push('_');
    }
    out
}
