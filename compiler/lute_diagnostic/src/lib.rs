//! Diagnostics for the Lute pipeline.
//!
//! Lex and parse failures, resolver findings, and runtime errors all
//! funnel into [`Diagnostic`] before they reach the user. Rendering is
//! plain text with a line/column header and a caret line; there is no
//! persistence format.

use std::fmt;

use lute_ir::Span;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A single reportable finding.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Primary span; `None` for findings with no single source anchor.
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Translate a byte offset into 1-based line and column.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut line_start = 0;
    for (idx, ch) in source.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            line_start = idx + 1;
        }
    }
    (line, offset - line_start + 1)
}

/// Render one diagnostic against its source text.
///
/// Produces the familiar three-part shape:
///
/// ```text
/// error: something went wrong
///  --> 3:7
///   |  let x = ...;
///   |        ^^^
/// ```
pub fn render(diag: &Diagnostic, source: &str) -> String {
    use fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", diag.severity, diag.message);

    if let Some(span) = diag.span {
        let (line, col) = line_col(source, span.start as usize);
        let _ = writeln!(out, " --> {line}:{col}");
        if let Some(text) = source.lines().nth(line - 1) {
            let _ = writeln!(out, "  |  {text}");
            let width = (span.len() as usize).clamp(1, text.len().saturating_sub(col - 1).max(1));
            let _ = writeln!(out, "  |  {}{}", " ".repeat(col - 1), "^".repeat(width));
        }
    }

    for note in &diag.notes {
        let _ = writeln!(out, "  = note: {note}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_col_counts_from_one() {
        let src = "ab\ncd\nef";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 3), (2, 1));
        assert_eq!(line_col(src, 7), (3, 2));
    }

    #[test]
    fn render_points_at_span() {
        let src = "int x = oops;";
        let diag = Diagnostic::error("variable `oops` is not defined").with_span(Span::new(8, 12));
        let rendered = render(&diag, src);
        assert!(rendered.contains("error: variable `oops` is not defined"));
        assert!(rendered.contains("--> 1:9"));
        assert!(rendered.contains("^^^^"));
    }

    #[test]
    fn render_without_span_is_message_only() {
        let diag = Diagnostic::warning("something mild");
        let rendered = render(&diag, "");
        assert_eq!(rendered, "warning: something mild\n");
    }
}
