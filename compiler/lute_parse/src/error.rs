//! Parse errors.

use std::fmt;

use lute_diagnostic::Diagnostic;
use lute_ir::{Span, TokenKind};

/// A fatal parse error. Parsing stops at the first one; the resolver
/// is the accumulating phase, not the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    pub fn expected(what: &str, found: TokenKind, span: Span) -> Self {
        ParseError {
            message: format!("expected {what}, found {}", found.describe()),
            span,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.message).with_span(self.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
