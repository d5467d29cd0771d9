//! Statement-level grammar.
//!
//! One method per statement form. Declarations are disambiguated from
//! expression statements by speculative parsing: try a type annotation
//! followed by an identifier, and roll the cursor back if the shape
//! does not commit (`;` or `=` after the name).

mod expr;
mod ty;

use lute_ir::{
    ExprKind, FieldDef, Param, Stmt, StmtId, StmtKind, StmtRange, TokenKind,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Struct => self.parse_struct_decl(),
            TokenKind::Function if matches!(self.cursor.peek_kind(1), TokenKind::Ident(_)) => {
                self.parse_function_decl()
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let span = self.cursor.current_span();
                self.cursor.advance();
                let end = self.cursor.expect(TokenKind::Semi)?;
                Ok(self
                    .module
                    .alloc_stmt(Stmt::new(StmtKind::Break, span.merge(end))))
            }
            TokenKind::Continue => {
                let span = self.cursor.current_span();
                self.cursor.advance();
                let end = self.cursor.expect(TokenKind::Semi)?;
                Ok(self
                    .module
                    .alloc_stmt(Stmt::new(StmtKind::Continue, span.merge(end))))
            }
            TokenKind::Print => self.parse_print(),
            TokenKind::LBrace => {
                let start = self.cursor.current_span();
                let body = self.parse_block()?;
                let span = start.merge(self.cursor.previous_span());
                Ok(self.module.alloc_stmt(Stmt::new(StmtKind::Block(body), span)))
            }
            _ => self.parse_declaration_or_expr(),
        }
    }

    /// Parse `{ stmt* }`, returning the body range.
    fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(self.module.alloc_stmt_list(stmts))
    }

    /// Either a typed declaration (`int x;`, `Point p = ...;`,
    /// `function(int) -> int f;`) or an expression/assignment
    /// statement. Decided by speculative parsing with rollback.
    fn parse_declaration_or_expr(&mut self) -> Result<StmtId, ParseError> {
        let checkpoint = self.cursor.position();
        let start = self.cursor.current_span();

        if let Ok(ty) = self.parse_type_expr() {
            if let TokenKind::Ident(name) = self.cursor.current_kind() {
                let lookahead = self.cursor.peek_kind(1);
                if matches!(lookahead, TokenKind::Semi | TokenKind::Eq) {
                    self.cursor.advance(); // the name
                    let init = if self.cursor.eat(TokenKind::Eq) {
                        Some(self.parse_expr()?)
                    } else {
                        None
                    };
                    let end = self.cursor.expect(TokenKind::Semi)?;
                    return Ok(self.module.alloc_stmt(Stmt::new(
                        StmtKind::Declare { ty, name, init },
                        start.merge(end),
                    )));
                }
            }
        }

        // Not a declaration after all: rewind and parse an expression
        // or assignment statement. Arena nodes allocated during the
        // failed attempt are simply unreferenced.
        self.cursor.set_position(checkpoint);
        self.parse_expr_or_assign()
    }

    fn parse_expr_or_assign(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let target = self.parse_expr()?;

        if self.cursor.eat(TokenKind::Eq) {
            match self.module.expr(target).kind {
                ExprKind::Ident(_) | ExprKind::Index { .. } | ExprKind::Field { .. } => {}
                _ => {
                    return Err(ParseError::new(
                        "invalid assignment target: expected a variable, index, or field",
                        self.module.expr(target).span,
                    ));
                }
            }
            let value = self.parse_expr()?;
            let end = self.cursor.expect(TokenKind::Semi)?;
            return Ok(self.module.alloc_stmt(Stmt::new(
                StmtKind::Assign { target, value },
                start.merge(end),
            )));
        }

        let end = self.cursor.expect(TokenKind::Semi)?;
        Ok(self
            .module
            .alloc_stmt(Stmt::new(StmtKind::Expr(target), start.merge(end))))
    }

    fn parse_function_decl(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Function)?;
        let (name, _) = self.cursor.expect_ident()?;

        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let ty = self.parse_type_expr()?;
            let (param_name, param_span) = self.cursor.expect_ident()?;
            params.push(Param {
                name: param_name,
                ty,
                span: param_span,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Arrow)?;
        let ret = self.parse_type_expr()?;
        let body = self.parse_block()?;

        tracing::debug!(
            function = self.interner.lookup(name),
            params = params.len(),
            "parsed function declaration"
        );

        let params = self.module.alloc_params(params);
        let span = start.merge(self.cursor.previous_span());
        Ok(self.module.alloc_stmt(Stmt::new(
            StmtKind::Function {
                name,
                params,
                ret,
                body,
            },
            span,
        )))
    }

    fn parse_struct_decl(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Struct)?;
        let (name, _) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let ty = self.parse_type_expr()?;
            let (field_name, field_span) = self.cursor.expect_ident()?;
            self.cursor.expect(TokenKind::Semi)?;
            fields.push(FieldDef {
                name: field_name,
                ty,
                span: field_span,
            });
        }
        let end = self.cursor.expect(TokenKind::RBrace)?;

        let fields = self.module.alloc_field_defs(fields);
        Ok(self.module.alloc_stmt(Stmt::new(
            StmtKind::StructDecl { name, fields },
            start.merge(end),
        )))
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::If)?;
        self.cursor.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let then_body = self.parse_block()?;

        let else_body = if self.cursor.eat(TokenKind::Else) {
            if self.cursor.check(TokenKind::If) {
                // `else if` chains: wrap the nested `if` as a
                // single-statement body.
                let nested = self.parse_if()?;
                Some(self.module.alloc_stmt_list(vec![nested]))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        let span = start.merge(self.cursor.previous_span());
        Ok(self.module.alloc_stmt(Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        )))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::While)?;
        self.cursor.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self
            .module
            .alloc_stmt(Stmt::new(StmtKind::While { cond, body }, span)))
    }

    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::For)?;
        self.cursor.expect(TokenKind::LParen)?;
        let (binding, _) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::In)?;
        let iter = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self.module.alloc_stmt(Stmt::new(
            StmtKind::For {
                binding,
                iter,
                body,
            },
            span,
        )))
    }

    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Return)?;
        let value = if self.cursor.check(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = self.cursor.expect(TokenKind::Semi)?;
        Ok(self
            .module
            .alloc_stmt(Stmt::new(StmtKind::Return(value), start.merge(end))))
    }

    fn parse_print(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Print)?;
        self.cursor.expect(TokenKind::LParen)?;
        let value = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let end = self.cursor.expect(TokenKind::Semi)?;
        Ok(self
            .module
            .alloc_stmt(Stmt::new(StmtKind::Print(value), start.merge(end))))
    }
}
