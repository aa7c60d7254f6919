//! Lexical scopes and bindings

use std::collections::{HashMap, HashSet};

use ember_ast::{BuiltInContract, Position};
use ember_target::Expr as JsExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

/// What kind of construct opened a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// Bottom of the stack; top-level statements
    Global,
    /// Function body; `callee` is the target name of the function itself
    Function { callee: String },
    /// Block, branch or other construct without special rules
    Generic,
    /// `repeat` body; `state` is the target name of the loop-state parameter
    Repeat { state: String, name: Option<String> },
    /// `for` body
    ForEach { state: String, name: Option<String> },
    /// Body of an `await`
    Await,
    /// Error handler of a `try` or an `await`
    Catch,
    /// Property getter or setter
    Accessor(AccessorKind),
    /// Body of a `with`; `layer` is the target name of the layer object
    Layer { layer: String },
    /// `checked` / `unchecked` body
    Context { checked: bool },
}

impl ScopeKind {
    /// Transparent scopes let the `result` slot of an enclosing function
    /// through. Global, Function and Accessor scopes are opaque.
    pub fn is_transparent(&self) -> bool {
        !matches!(
            self,
            ScopeKind::Global | ScopeKind::Function { .. } | ScopeKind::Accessor(_)
        )
    }

    /// `break` and `continue` without a destination never cross these.
    pub fn is_function_boundary(&self) -> bool {
        matches!(self, ScopeKind::Function { .. } | ScopeKind::Accessor(_))
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, ScopeKind::Repeat { .. } | ScopeKind::ForEach { .. })
    }

    /// Target name of the loop-state variable, for loop scopes.
    pub fn loop_state(&self) -> Option<&str> {
        match self {
            ScopeKind::Repeat { state, .. } | ScopeKind::ForEach { state, .. } => Some(state),
            _ => None,
        }
    }

    pub fn loop_name(&self) -> Option<&str> {
        match self {
            ScopeKind::Repeat { name, .. } | ScopeKind::ForEach { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Function { .. } => "function",
            ScopeKind::Generic => "generic",
            ScopeKind::Repeat { .. } => "repeat",
            ScopeKind::ForEach { .. } => "for",
            ScopeKind::Await => "await",
            ScopeKind::Catch => "catch",
            ScopeKind::Accessor(AccessorKind::Get) => "get",
            ScopeKind::Accessor(AccessorKind::Set) => "set",
            ScopeKind::Layer { .. } => "with",
            ScopeKind::Context { .. } => "context",
        }
    }
}

/// What a name stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    /// Plain variable
    Variable,
    /// Variable holding a reactive property
    Property,
    /// `const` with a literal value; uses are replaced by the literal
    Constant(JsExpr),
    /// Alias of a built-in contract; uses become a contract reference
    Contract(BuiltInContract),
    /// The `result` slot of a function or accessor
    ResultSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Variable name in the emitted code
    pub target: String,
    pub value: BindingValue,
    pub position: Position,
}

impl Binding {
    pub fn variable(target: impl Into<String>, position: Position) -> Self {
        Self {
            target: target.into(),
            value: BindingValue::Variable,
            position,
        }
    }

    pub fn with_value(mut self, value: BindingValue) -> Self {
        self.value = value;
        self
    }
}

/// One level of the scope stack.
///
/// A scope that is a *frame* corresponds to a target function body: it
/// collects the `var` declarations of every local declared in it or in the
/// non-frame scopes above it.
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    frame: bool,
    bindings: HashMap<String, Binding>,
    /// Hoisted locals in declaration order (frames only)
    locals: Vec<String>,
    /// Every target name taken in this frame, parameters included
    taken: HashSet<String>,
}

impl Scope {
    pub fn new(kind: ScopeKind, frame: bool) -> Self {
        Self {
            kind,
            frame,
            bindings: HashMap::new(),
            locals: Vec::new(),
            taken: HashSet::new(),
        }
    }

    pub fn is_frame(&self) -> bool {
        self.frame
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    pub(crate) fn take_name(&mut self, target: &str) {
        self.taken.insert(target.to_string());
    }

    pub(crate) fn is_taken(&self, target: &str) -> bool {
        self.taken.contains(target)
    }

    pub(crate) fn hoist(&mut self, target: String) {
        self.locals.push(target);
    }

    /// Names to declare with `var` at the top of the frame's function.
    pub fn locals(&self) -> &[String] {
        &self.locals
    }

    /// Take the hoisted locals collected so far.
    pub fn drain_locals(&mut self) -> Vec<String> {
        std::mem::take(&mut self.locals)
    }
}
