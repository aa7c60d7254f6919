//! Serializes the target tree to JavaScript text.

use crate::ir::{BinaryOp, Expr, Program, Stmt, UnaryOp};

// Binding strength, loosest first.
const PREC_SEQUENCE: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_EQUALITY: u8 = 10;
const PREC_RELATIONAL: u8 = 11;
const PREC_UNARY: u8 = 15;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

/// Writes statements and expressions with two-space indentation.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn program(&mut self, program: &Program) {
        for stmt in &program.body {
            self.stmt(stmt);
        }
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Var(decls) => {
                self.out.push_str("var ");
                for (i, (name, init)) in decls.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(name);
                    if let Some(init) = init {
                        self.out.push_str(" = ");
                        self.expr(init, PREC_ASSIGN);
                    }
                }
                self.out.push_str(";\n");
            }
            Stmt::Expr(expr) => {
                if starts_ambiguously(expr) {
                    self.out.push('(');
                    self.expr(expr, PREC_SEQUENCE);
                    self.out.push(')');
                } else {
                    self.expr(expr, PREC_SEQUENCE);
                }
                self.out.push_str(";\n");
            }
            Stmt::Return(expr) => {
                self.out.push_str("return ");
                self.expr(expr, PREC_SEQUENCE);
                self.out.push_str(";\n");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.out.push_str("if (");
                self.expr(test, PREC_SEQUENCE);
                self.out.push_str(") ");
                self.block(consequent);
                if !alternate.is_empty() {
                    self.out.push_str(" else ");
                    self.block(alternate);
                }
                self.out.push('\n');
            }
        }
    }

    /// `{ ... }` without a trailing newline.
    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    /// Write `expr`, parenthesized when it binds looser than `min`.
    pub fn expr(&mut self, expr: &Expr, min: u8) {
        let wrap = precedence(expr) < min;
        if wrap {
            self.out.push('(');
        }
        self.expr_inner(expr);
        if wrap {
            self.out.push(')');
        }
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::Null => self.out.push_str("null"),
            Expr::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
            Expr::Integer(value) => self.out.push_str(&value.to_string()),
            Expr::Real(value) => self.out.push_str(&format_real(*value)),
            Expr::Str(value) => quote_into(&mut self.out, value),
            Expr::Ident(name) => self.out.push_str(name),
            Expr::This => self.out.push_str("this"),
            Expr::Member { object, property } => {
                // `1.x` would lex as a number
                if matches!(**object, Expr::Integer(_)) {
                    self.out.push('(');
                    self.expr_inner(object);
                    self.out.push(')');
                } else {
                    self.expr(object, PREC_CALL);
                }
                self.out.push('.');
                self.out.push_str(property);
            }
            Expr::Call { callee, args } => {
                if matches!(callee.unmarked(), Expr::Function { .. }) {
                    self.out.push('(');
                    self.expr_inner(callee);
                    self.out.push(')');
                } else {
                    self.expr(callee, PREC_CALL);
                }
                self.args(args);
            }
            Expr::New { callee, args } => {
                self.out.push_str("new ");
                if is_constructor_path(callee) {
                    self.expr_inner(callee);
                } else {
                    self.out.push('(');
                    self.expr_inner(callee);
                    self.out.push(')');
                }
                self.args(args);
            }
            Expr::Function { name, params, body } => {
                self.out.push_str("function ");
                if let Some(name) = name {
                    self.out.push_str(name);
                }
                self.out.push('(');
                self.out.push_str(&params.join(", "));
                self.out.push_str(") ");
                self.block(body);
            }
            Expr::Array(items) => {
                self.out.push('[');
                self.list(items);
                self.out.push(']');
            }
            Expr::Object(entries) => {
                if entries.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if is_identifier(key) {
                        self.out.push_str(key);
                    } else {
                        quote_into(&mut self.out, key);
                    }
                    self.out.push_str(": ");
                    self.expr(value, PREC_ASSIGN);
                }
                self.out.push_str(" }");
            }
            Expr::Assign { target, value } => {
                self.expr(target, PREC_CALL);
                self.out.push_str(" = ");
                self.expr(value, PREC_ASSIGN);
            }
            Expr::Binary { op, left, right } => {
                let prec = binary_precedence(*op);
                self.expr(left, prec);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(right, prec + 1);
            }
            Expr::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => self.out.push('!'),
                }
                self.expr(operand, PREC_UNARY);
            }
            Expr::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item, PREC_ASSIGN);
                }
            }
            Expr::Marked { mark, expr } => {
                self.out.push_str("/* ");
                self.out.push_str(&mark.to_string());
                self.out.push_str(" */ ");
                self.expr_inner(expr);
            }
        }
    }

    fn args(&mut self, args: &[Expr]) {
        self.out.push('(');
        self.list(args);
        self.out.push(')');
    }

    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(item, PREC_ASSIGN);
        }
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Sequence(_) => PREC_SEQUENCE,
        Expr::Assign { .. } => PREC_ASSIGN,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } => PREC_UNARY,
        Expr::Integer(value) if *value < 0 => PREC_UNARY,
        Expr::Real(value) if value.is_sign_negative() && !value.is_nan() => PREC_UNARY,
        Expr::Call { .. } | Expr::New { .. } | Expr::Member { .. } => PREC_CALL,
        Expr::Marked { expr, .. } => precedence(expr),
        _ => PREC_PRIMARY,
    }
}

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::StrictEq | BinaryOp::StrictNe => PREC_EQUALITY,
        BinaryOp::InstanceOf => PREC_RELATIONAL,
    }
}

/// A statement may not begin with `function` or `{`.
fn starts_ambiguously(expr: &Expr) -> bool {
    match expr {
        Expr::Function { .. } | Expr::Object(_) => true,
        Expr::Member { object, .. } => starts_ambiguously(object),
        Expr::Call { callee, .. } => {
            !matches!(callee.unmarked(), Expr::Function { .. }) && starts_ambiguously(callee)
        }
        Expr::Assign { target, .. } => starts_ambiguously(target),
        Expr::Binary { left, .. } => starts_ambiguously(left),
        Expr::Sequence(items) => items.first().is_some_and(starts_ambiguously),
        Expr::Marked { expr, .. } => starts_ambiguously(expr),
        _ => false,
    }
}

/// `a.b.c`: safe to follow `new` without parentheses.
fn is_constructor_path(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) | Expr::This => true,
        Expr::Member { object, .. } => is_constructor_path(object),
        _ => false,
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn format_real(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{:?}", value)
    }
}

fn quote_into(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::new();
    printer.program(program);
    printer.finish()
}

pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.expr(expr, PREC_SEQUENCE);
    printer.finish()
}
