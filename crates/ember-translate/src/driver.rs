//! Statement-by-statement driver
//!
//! Pulls top-level statements from a [`NodeSource`], translates each one
//! against a single long-lived context and reports every outcome through a
//! callback. A failed statement leaves no trace in the context.

use std::path::Path;

use anyhow::{anyhow, Result};
use ember_ast::{Expr, JsonSource, NodeSource};
use ember_diagnostics::{
    DiagnosticEmitter, Diagnostics, FileId, JsonEmitter, SimpleEmitter, SourceCache,
    TerminalEmitter,
};
use ember_target::{print_expr, print_program, Expr as JsExpr, Program, Stmt};

use crate::config::{DiagnosticFormat, EmitMode, ErrorMode, TranslatorOptions};
use crate::context::TranslationContext;
use crate::error::{StatementError, TranslationError};
use crate::translate::translate;

/// Counts of what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub translated: usize,
    pub failed: usize,
    /// The run ended early because of [`ErrorMode::Panic`]
    pub stopped: bool,
}

/// A translated program together with the statements that failed.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    pub program: Program,
    pub errors: Vec<StatementError>,
    pub summary: RunSummary,
}

impl Translation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn diagnostics(&self, file_id: FileId) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(self.errors.iter().map(|err| err.to_diagnostic(file_id)));
        diagnostics
    }
}

pub struct Translator {
    options: TranslatorOptions,
    ctx: TranslationContext,
}

impl Translator {
    pub fn new(options: TranslatorOptions) -> Self {
        let ctx = TranslationContext::new(options.runtime(), options.debug, options.checked);
        Self { options, ctx }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    pub fn context(&self) -> &TranslationContext {
        &self.ctx
    }

    /// Translate one top-level statement into target statements: a `var`
    /// for the globals it declared, then the statement itself.
    ///
    /// On error the global scope is restored to its state before the
    /// statement.
    pub fn translate_statement(&mut self, expr: &Expr) -> Result<Vec<Stmt>, TranslationError> {
        let checkpoint = self.ctx.checkpoint();
        match translate(&mut self.ctx, expr) {
            Ok(value) => {
                let locals = self.ctx.global_mut().drain_locals();
                let mut out = Vec::with_capacity(2);
                if !locals.is_empty() {
                    out.push(Stmt::Var(locals.into_iter().map(|local| (local, None)).collect()));
                }
                out.push(Stmt::Expr(value));
                Ok(out)
            }
            Err(err) => {
                self.ctx.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Translate every statement of `source`, handing each outcome to
    /// `on_statement` in source order.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_statement: F) -> RunSummary
    where
        S: NodeSource + ?Sized,
        F: FnMut(Result<&[Stmt], &StatementError>),
    {
        let mut summary = RunSummary::default();
        let mut index = 0usize;

        while let Some(node) = source.next_node() {
            index += 1;
            let outcome = node
                .map_err(StatementError::from)
                .and_then(|expr| {
                    log::debug!("translating statement {} ({})", index, expr.kind.name());
                    self.translate_statement(&expr).map_err(StatementError::from)
                });

            match outcome {
                Ok(stmts) => {
                    summary.translated += 1;
                    on_statement(Ok(stmts.as_slice()));
                }
                Err(err) => {
                    summary.failed += 1;
                    log::warn!(
                        "statement {} failed at {}: {} [{}]",
                        index,
                        err.position(),
                        err,
                        err.code()
                    );
                    on_statement(Err(&err));
                    if self.options.error_mode == ErrorMode::Panic {
                        summary.stopped = true;
                        break;
                    }
                }
            }
        }

        log::debug!(
            "translated {} statements, {} failed",
            summary.translated,
            summary.failed
        );
        summary
    }

    /// Collect a whole source into one program.
    pub fn translate_program<S>(&mut self, source: &mut S) -> Translation
    where
        S: NodeSource + ?Sized,
    {
        let mut program = Program::new();
        let mut errors = Vec::new();
        let summary = self.run(source, |outcome| match outcome {
            Ok(stmts) => stmts.iter().cloned().for_each(|stmt| program.push(stmt)),
            Err(err) => errors.push(err.clone()),
        });
        Translation {
            program,
            errors,
            summary,
        }
    }
}

/// Serialize a program in the configured emission mode.
pub fn emit(program: &Program, options: &TranslatorOptions) -> String {
    let wrapper = || {
        JsExpr::function(
            None,
            vec![options.runtime_name.clone()],
            program.body.clone(),
        )
    };
    match options.emit_mode {
        EmitMode::Script => print_program(program),
        EmitMode::Callable => format!("{}\n", print_expr(&wrapper())),
        EmitMode::RunImmediately => {
            let mut wrapped = Program::new();
            wrapped.push(Stmt::Expr(
                wrapper().call(vec![JsExpr::ident(&options.runtime_entry)]),
            ));
            print_program(&wrapped)
        }
    }
}

/// Render diagnostics in `format`. Terminal and JSON output end with a
/// summary.
pub fn render_diagnostics(
    diagnostics: &Diagnostics,
    cache: &SourceCache,
    format: DiagnosticFormat,
) -> std::io::Result<String> {
    let out = match format {
        DiagnosticFormat::Simple => {
            let mut emitter = SimpleEmitter::new(Vec::new());
            emitter.emit_all(diagnostics, cache)?;
            emitter.into_inner()
        }
        DiagnosticFormat::Terminal => {
            let mut emitter = TerminalEmitter::new(Vec::new(), false);
            emitter.emit_all(diagnostics, cache)?;
            emitter.emit_summary(diagnostics)?;
            emitter.into_inner()
        }
        DiagnosticFormat::Json => {
            let mut emitter = JsonEmitter::new(Vec::new());
            emitter.emit_all(diagnostics, cache)?;
            emitter.emit_summary(diagnostics)?;
            emitter.into_inner()
        }
    };
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Translate a serialized tree (a JSON array of statements) to JavaScript.
///
/// Failed statements are reported as diagnostics against `path` and left
/// out; with [`ErrorMode::Panic`] the report is returned as the error
/// instead.
pub fn translate_file(path: &Path, options: TranslatorOptions) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

    let mut source = JsonSource::from_json(&text);
    let mut translator = Translator::new(options);
    let translation = translator.translate_program(&mut source);

    if !translation.is_ok() {
        // Positions point into the source the tree was parsed from.
        let mut cache = SourceCache::new();
        let file_id = cache.add_path(path);
        let diagnostics = translation.diagnostics(file_id);
        let report = render_diagnostics(
            &diagnostics,
            &cache,
            translator.options().diagnostic_format,
        )?;

        if translator.options().error_mode == ErrorMode::Panic {
            return Err(anyhow!("{}", report.trim_end()));
        }
        log::warn!(
            "{}: {} of {} statements failed to translate\n{}",
            path.display(),
            translation.errors.len(),
            translation.summary.translated + translation.summary.failed,
            report.trim_end()
        );
    }

    Ok(emit(&translation.program, translator.options()))
}
