//! Recursive-descent parser for Lute.
//!
//! Consumes the lexer's [`TokenList`] and produces an arena
//! [`Module`]. Two desugarings are the parser's responsibility, not
//! the evaluator's:
//!
//! - `a - b` parses as `a + (-b)`
//! - `a != b` parses as `!(a == b)`
//!
//! The `Sub`/`NotEq` operator variants therefore never appear in a
//! parsed module; the evaluator treats them as internal errors.

mod cursor;
mod error;
mod grammar;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use error::ParseError;

use lute_ir::{Module, StringInterner, TokenList};

/// Parser state: cursor plus the module arena under construction.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    module: Module,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            module: Module::new(),
            interner,
        }
    }

    fn parse_module(mut self) -> Result<Module, ParseError> {
        let mut top = Vec::new();
        while !self.cursor.at_end() {
            top.push(self.parse_stmt()?);
        }
        let range = self.module.alloc_stmt_list(top);
        self.module.set_top_level(range);
        Ok(self.module)
    }
}

/// Parse a whole source unit into a module.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Module, ParseError> {
    tracing::debug!(tokens = tokens.len(), "parsing module");
    Parser::new(tokens, interner).parse_module()
}
