//! Diagnostic emitters for different output formats.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use crate::span::LabelStyle;
use std::io::Write;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics.iter() {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    /// Emit a summary line.
    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// Rich terminal output with colors and code snippets.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter.
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colored {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Hint => "\x1b[34m",
        }
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.colored {
            code
        } else {
            ""
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let color = self.severity_color(diagnostic.severity);
        let reset = self.paint("\x1b[0m");
        let bold = self.paint("\x1b[1m");
        let cyan = self.paint("\x1b[36m");

        // Header: error[B001]: message
        writeln!(
            self.writer,
            "{}{}{}[{}]{}: {}",
            bold,
            color,
            diagnostic.severity.as_str(),
            diagnostic.code.as_str(),
            reset,
            diagnostic.message
        )?;

        if let Some(loc) = cache.location(diagnostic.span) {
            writeln!(self.writer, "  {}-->{} {}", cyan, reset, loc)?;

            if let Some(line_text) = cache.line_text(diagnostic.span) {
                let line_str = loc.line.to_string();
                let padding = " ".repeat(line_str.len());

                writeln!(self.writer, "{} {}|{}", padding, cyan, reset)?;
                writeln!(self.writer, "{}{} |{} {}", cyan, line_str, reset, line_text)?;

                let start_col = loc.column.max(1) as usize;
                let underline_padding = " ".repeat(start_col - 1);
                let max_underline = line_text.len().saturating_sub(start_col - 1);
                let underline_len = (diagnostic.span.width() as usize).min(max_underline).max(1);

                writeln!(
                    self.writer,
                    "{} {}|{} {}{}{}{}",
                    padding,
                    cyan,
                    reset,
                    underline_padding,
                    color,
                    "^".repeat(underline_len),
                    reset
                )?;
            }
        }

        for label in &diagnostic.labels {
            if let Some(loc) = cache.location(label.span) {
                let label_color = match label.style {
                    LabelStyle::Primary => color,
                    LabelStyle::Secondary => cyan,
                };
                writeln!(
                    self.writer,
                    "  {}note{}: {} ({})",
                    label_color, reset, label.message, loc
                )?;
            }
        }

        if let Some(ref help) = diagnostic.help {
            writeln!(self.writer, "  {}= help:{} {}", cyan, reset, help)?;
        }

        writeln!(self.writer)?;
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();

        let color = if errors > 0 {
            self.severity_color(Severity::Error)
        } else if warnings > 0 {
            self.severity_color(Severity::Warning)
        } else {
            ""
        };
        let reset = self.paint("\x1b[0m");

        if errors > 0 || warnings > 0 {
            write!(self.writer, "{}", color)?;
            if errors > 0 {
                write!(
                    self.writer,
                    "{} error{}",
                    errors,
                    if errors == 1 { "" } else { "s" }
                )?;
            }
            if errors > 0 && warnings > 0 {
                write!(self.writer, " and ")?;
            }
            if warnings > 0 {
                write!(
                    self.writer,
                    "{} warning{}",
                    warnings,
                    if warnings == 1 { "" } else { "s" }
                )?;
            }
            writeln!(self.writer, " emitted{}", reset)?;
        }

        Ok(())
    }
}

/// JSON output for tooling integration, one object per line.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    /// Create a new JSON emitter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let loc = cache.location(diagnostic.span);

        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "category": diagnostic.code.category(),
            "severity": diagnostic.severity.as_str(),
            "message": diagnostic.message,
            "location": loc.map(|l| serde_json::json!({
                "file": l.file,
                "line": l.line,
                "column": l.column,
            })),
            "help": diagnostic.help,
            "notes": diagnostic.labels.iter().map(|label| {
                serde_json::json!({
                    "message": label.message,
                    "line": label.span.start.line,
                    "column": label.span.start.column,
                })
            }).collect::<Vec<_>>(),
        });

        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "hints": diagnostics.hint_count(),
            "total": diagnostics.len(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Simple text output (no colors, minimal formatting).
pub struct SimpleEmitter<W: Write> {
    writer: W,
}

impl<W: Write> SimpleEmitter<W> {
    /// Create a new simple emitter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticEmitter for SimpleEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        match cache.location(diagnostic.span) {
            Some(loc) => writeln!(
                self.writer,
                "{}: {}: {} [{}]",
                loc,
                diagnostic.severity.as_str(),
                diagnostic.message,
                diagnostic.code.as_str()
            ),
            None => writeln!(
                self.writer,
                "{}: {} [{}]",
                diagnostic.severity.as_str(),
                diagnostic.message,
                diagnostic.code.as_str()
            ),
        }
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )
    }
}
