//! Type-annotation grammar.
//!
//! `T` is a base type followed by zero or more `[]` array suffixes:
//!
//! ```text
//! base   := int | float | string | bool | nothing
//!         | ( T, T, ... )                  // tuple, two or more
//!         | function ( T, ... ) -> T       // operation type
//!         | IDENT                          // named (struct) type
//! type   := base ('[' ']')*
//! ```

use lute_ir::{TokenKind, TypeExpr, TypeExprId, TypeExprKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_type_expr(&mut self) -> Result<TypeExprId, ParseError> {
        let start = self.cursor.current_span();
        let mut ty = self.parse_base_type()?;

        while self.cursor.eat(TokenKind::LBracket) {
            let end = self.cursor.expect(TokenKind::RBracket)?;
            ty = self
                .module
                .alloc_type_expr(TypeExpr::new(TypeExprKind::Array(ty), start.merge(end)));
        }

        Ok(ty)
    }

    fn parse_base_type(&mut self) -> Result<TypeExprId, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::KwInt => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Int, span)))
            }
            TokenKind::KwFloat => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Float, span)))
            }
            TokenKind::KwString => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Str, span)))
            }
            TokenKind::KwBool => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Bool, span)))
            }
            TokenKind::KwNothing => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Nothing, span)))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Named(name), span)))
            }
            TokenKind::Function => {
                self.cursor.advance();
                self.cursor.expect(TokenKind::LParen)?;
                let mut params = Vec::new();
                while !self.cursor.check(TokenKind::RParen) {
                    params.push(self.parse_type_expr()?);
                    if !self.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.cursor.expect(TokenKind::RParen)?;
                self.cursor.expect(TokenKind::Arrow)?;
                let ret = self.parse_type_expr()?;
                let params = self.module.alloc_type_expr_list(params);
                let span = span.merge(self.cursor.previous_span());
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Function { params, ret }, span)))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let mut elems = Vec::new();
                while !self.cursor.check(TokenKind::RParen) {
                    elems.push(self.parse_type_expr()?);
                    if !self.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
                let end = self.cursor.expect(TokenKind::RParen)?;
                if elems.len() < 2 {
                    return Err(ParseError::new(
                        "tuple type needs at least two element types",
                        span.merge(end),
                    ));
                }
                let elems = self.module.alloc_type_expr_list(elems);
                Ok(self
                    .module
                    .alloc_type_expr(TypeExpr::new(TypeExprKind::Tuple(elems), span.merge(end))))
            }
            found => Err(ParseError::expected("a type", found, span)),
        }
    }
}
