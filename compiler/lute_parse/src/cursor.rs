//! Token cursor for navigating the token stream.

use lute_ir::{Name, Span, TokenKind, TokenList};

use crate::ParseError;

/// Cursor over a [`TokenList`].
///
/// Invariant: the position never passes the final `Eof` token, so
/// `current()` is always valid.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current position, for speculative parsing.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Roll back to a position captured earlier with [`position`].
    ///
    /// [`position`]: Cursor::position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos, "cursor may only roll backwards");
        self.pos = pos;
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Kind of the token `n` positions ahead (saturating at `Eof`).
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx].kind
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Advance past the current token.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Check the current token against an expected kind.
    ///
    /// Only meaningful for payload-free kinds; literal and identifier
    /// tokens are matched through [`expect_ident`] and the grammar's
    /// own pattern matches.
    ///
    /// [`expect_ident`]: Cursor::expect_ident
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a required token or fail with an "expected X" error.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::expected(
                kind.describe(),
                self.current_kind(),
                self.current_span(),
            ))
        }
    }

    /// Consume a required identifier, returning its name and span.
    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            found => Err(ParseError::expected(
                "identifier",
                found,
                self.current_span(),
            )),
        }
    }
}
