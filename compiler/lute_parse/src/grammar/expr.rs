//! Expression grammar: one method per precedence level.
//!
//! Precedence, loosest first: `||`, `&&`, equality, comparison,
//! additive, multiplicative, unary, postfix (call/index/field),
//! primary.

use lute_ir::{BinaryOp, Expr, ExprId, ExprKind, FieldInit, TokenKind, UnaryOp};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.parse_or()
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self
            .module
            .expr(left)
            .span
            .merge(self.module.expr(right).span);
        self.module
            .alloc_expr(Expr::new(ExprKind::Binary { op, left, right }, span))
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_equality()?;
        while self.cursor.eat(TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_comparison()?;
        loop {
            if self.cursor.eat(TokenKind::EqEq) {
                let right = self.parse_comparison()?;
                left = self.binary(BinaryOp::Eq, left, right);
            } else if self.cursor.eat(TokenKind::BangEq) {
                // `a != b` desugars to `!(a == b)`; the runtime NotEq
                // handler only exists to catch parser defects.
                let right = self.parse_comparison()?;
                let eq = self.binary(BinaryOp::Eq, left, right);
                let span = self.module.expr(eq).span;
                left = self.module.alloc_expr(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Not,
                        operand: eq,
                    },
                    span,
                ));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            if self.cursor.eat(TokenKind::Plus) {
                let right = self.parse_multiplicative()?;
                left = self.binary(BinaryOp::Add, left, right);
            } else if self.cursor.eat(TokenKind::Minus) {
                // `a - b` desugars to `a + (-b)`; the runtime Sub
                // handler only exists to catch parser defects.
                let right = self.parse_multiplicative()?;
                let span = self.module.expr(right).span;
                let neg = self.module.alloc_expr(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        operand: right,
                    },
                    span,
                ));
                left = self.binary(BinaryOp::Add, left, neg);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.module.expr(operand).span);
            return Ok(self
                .module
                .alloc_expr(Expr::new(ExprKind::Unary { op, operand }, span)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current_kind() {
                TokenKind::LParen => {
                    self.cursor.advance();
                    let mut args = Vec::new();
                    while !self.cursor.check(TokenKind::RParen) {
                        args.push(self.parse_expr()?);
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    let end = self.cursor.expect(TokenKind::RParen)?;
                    let span = self.module.expr(expr).span.merge(end);
                    let args = self.module.alloc_expr_list(args);
                    expr = self
                        .module
                        .alloc_expr(Expr::new(ExprKind::Call { callee: expr, args }, span));
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    let end = self.cursor.expect(TokenKind::RBracket)?;
                    let span = self.module.expr(expr).span.merge(end);
                    expr = self.module.alloc_expr(Expr::new(
                        ExprKind::Index {
                            receiver: expr,
                            index,
                        },
                        span,
                    ));
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (field, field_span) = self.cursor.expect_ident()?;
                    let span = self.module.expr(expr).span.merge(field_span);
                    expr = self.module.alloc_expr(Expr::new(
                        ExprKind::Field {
                            receiver: expr,
                            field,
                        },
                        span,
                    ));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Int(n) => {
                self.cursor.advance();
                Ok(self.module.alloc_expr(Expr::new(ExprKind::Int(n), span)))
            }
            TokenKind::Float(x) => {
                self.cursor.advance();
                Ok(self.module.alloc_expr(Expr::new(ExprKind::Float(x), span)))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(self.module.alloc_expr(Expr::new(ExprKind::Str(name), span)))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_expr(Expr::new(ExprKind::Bool(true), span)))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(self
                    .module
                    .alloc_expr(Expr::new(ExprKind::Bool(false), span)))
            }
            TokenKind::KwNothing => {
                self.cursor.advance();
                Ok(self.module.alloc_expr(Expr::new(ExprKind::Nothing, span)))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                if self.cursor.check(TokenKind::LBrace) {
                    return self.parse_struct_literal(name, span);
                }
                Ok(self
                    .module
                    .alloc_expr(Expr::new(ExprKind::Ident(name), span)))
            }
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBracket => self.parse_bracket(),
            found => Err(ParseError::expected("an expression", found, span)),
        }
    }

    /// `Point { x: 1, y: 2 }` after the name has been consumed.
    fn parse_struct_literal(
        &mut self,
        name: lute_ir::Name,
        start: lute_ir::Span,
    ) -> Result<ExprId, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut inits = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            let (field, field_span) = self.cursor.expect_ident()?;
            self.cursor.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            inits.push(FieldInit {
                name: field,
                value,
                span: field_span,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(TokenKind::RBrace)?;
        let fields = self.module.alloc_field_inits(inits);
        Ok(self.module.alloc_expr(Expr::new(
            ExprKind::StructLit { name, fields },
            start.merge(end),
        )))
    }

    /// `( expr )` grouping or `(a, b, ...)` tuple literal.
    fn parse_paren(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::LParen)?;
        let first = self.parse_expr()?;

        if !self.cursor.check(TokenKind::Comma) {
            self.cursor.expect(TokenKind::RParen)?;
            return Ok(first);
        }

        let mut elems = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RParen) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        let end = self.cursor.expect(TokenKind::RParen)?;
        let elems = self.module.alloc_expr_list(elems);
        Ok(self
            .module
            .alloc_expr(Expr::new(ExprKind::TupleLit(elems), start.merge(end))))
    }

    /// `[a, b, c]` array literal or `[a..b]` range constructor.
    fn parse_bracket(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::LBracket)?;

        if self.cursor.check(TokenKind::RBracket) {
            let end = self.cursor.expect(TokenKind::RBracket)?;
            let elems = self.module.alloc_expr_list(Vec::new());
            return Ok(self
                .module
                .alloc_expr(Expr::new(ExprKind::ArrayLit(elems), start.merge(end))));
        }

        let first = self.parse_expr()?;

        if self.cursor.eat(TokenKind::DotDot) {
            let end_expr = self.parse_expr()?;
            let end = self.cursor.expect(TokenKind::RBracket)?;
            return Ok(self.module.alloc_expr(Expr::new(
                ExprKind::Range {
                    start: first,
                    end: end_expr,
                },
                start.merge(end),
            )));
        }

        let mut elems = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RBracket) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        let end = self.cursor.expect(TokenKind::RBracket)?;
        let elems = self.module.alloc_expr_list(elems);
        Ok(self
            .module
            .alloc_expr(Expr::new(ExprKind::ArrayLit(elems), start.merge(end))))
    }
}
