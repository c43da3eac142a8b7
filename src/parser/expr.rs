use super::{ParseResult, Parser};
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenType;

impl<'a> Parser<'a> {
    /// Expression entry point; assignment binds loosest and associates to
    /// the right.
    pub(super) fn parse_expr(&mut self) -> ParseResult<&'a Expr<'a>> {
        let left = self.parse_or()?;
        if self.eat(TokenType::Assign) {
            let right = self.parse_expr()?;
            return Ok(self.ctx.binary(BinaryOp::Assign, left, right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.parse_and()?;
        while self.eat(TokenType::OrOr) {
            let right = self.parse_and()?;
            left = self.ctx.binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.parse_comparison()?;
        while self.eat(TokenType::AndAnd) {
            let right = self.parse_comparison()?;
            left = self.ctx.binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenType::Equal => BinaryOp::Eq,
                TokenType::NotEqual => BinaryOp::NotEq,
                TokenType::Less => BinaryOp::Lt,
                TokenType::LessEqual => BinaryOp::LtEq,
                TokenType::Greater => BinaryOp::Gt,
                TokenType::GreaterEqual => BinaryOp::GtEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.ctx.binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.ctx.binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.parse_exponent()?;
        loop {
            let op = match self.current().kind {
                TokenType::Star => BinaryOp::Mul,
                TokenType::Slash => BinaryOp::Div,
                TokenType::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_exponent()?;
            left = self.ctx.binary(op, left, right);
        }
    }

    fn parse_exponent(&mut self) -> ParseResult<&'a Expr<'a>> {
        let left = self.parse_unary()?;
        if self.eat(TokenType::Caret) {
            let right = self.parse_exponent()?;
            return Ok(self.ctx.binary(BinaryOp::Expo, left, right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<&'a Expr<'a>> {
        let op = match self.current().kind {
            TokenType::Minus => UnaryOp::Negate,
            TokenType::Not => UnaryOp::Not,
            TokenType::Hash => UnaryOp::Length,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(self.ctx.unary(op, operand))
    }

    fn parse_postfix(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenType::Increment => {
                    self.advance();
                    expr = self.ctx.unary(UnaryOp::Increment, expr);
                }
                TokenType::Decrement => {
                    self.advance();
                    expr = self.ctx.unary(UnaryOp::Decrement, expr);
                }
                TokenType::LeftBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenType::RightBracket, "']'")?;
                    expr = self.ctx.expr(ExprKind::Index { array: expr, index });
                }
                TokenType::LeftParen => {
                    self.advance();
                    let args = if self.check(TokenType::RightParen) {
                        None
                    } else {
                        Some(self.parse_args()?)
                    };
                    self.expect(TokenType::RightParen, "')'")?;
                    expr = self.ctx.expr(ExprKind::Call { callee: expr, args });
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions as a right-leaning `Args` chain.
    pub(super) fn parse_args(&mut self) -> ParseResult<&'a Expr<'a>> {
        let arg = self.parse_expr()?;
        let next = if self.eat(TokenType::Comma) {
            Some(self.parse_args()?)
        } else {
            None
        };
        Ok(self.ctx.expr(ExprKind::Args { arg, next }))
    }

    /// `{ expr_list? }` brace initializer.
    pub(super) fn parse_braces(&mut self) -> ParseResult<&'a Expr<'a>> {
        self.expect(TokenType::LeftBrace, "'{'")?;
        let items = if self.check(TokenType::RightBrace) {
            None
        } else {
            Some(self.parse_args()?)
        };
        self.expect(TokenType::RightBrace, "'}'")?;
        Ok(self.ctx.expr(ExprKind::Braces { items }))
    }

    fn parse_primary(&mut self) -> ParseResult<&'a Expr<'a>> {
        let token = self.current();
        let expr = match token.kind {
            TokenType::IntegerLiteral(v) => self.ctx.expr(ExprKind::IntegerLit(v)),
            TokenType::HexadecimalLiteral(v) => self.ctx.expr(ExprKind::HexLit(v)),
            TokenType::BinaryLiteral(v) => self.ctx.expr(ExprKind::BinaryLit(v)),
            TokenType::DoubleLiteral(v) => self.ctx.expr(ExprKind::DoubleLit(v)),
            TokenType::DoubleScientificLiteral(v) => self.ctx.expr(ExprKind::ScientificLit(v)),
            TokenType::CharLiteral(c) => self.ctx.expr(ExprKind::CharLit(c)),
            TokenType::StringLiteral(n) => self.ctx.expr(ExprKind::StringLit(n)),
            TokenType::True => self.ctx.expr(ExprKind::BooleanLit(true)),
            TokenType::False => self.ctx.expr(ExprKind::BooleanLit(false)),
            TokenType::Identifier(n) => self.ctx.ident(n),
            TokenType::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenType::RightParen, "')'")?;
                return Ok(self.ctx.group(inner));
            }
            TokenType::LeftBrace => return self.parse_braces(),
            TokenType::Error(_) => {
                return Err(ParseError::new(ParseErrorKind::InvalidToken, token.span))
            }
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpression { found },
                    token.span,
                ))
            }
        };
        self.advance();
        Ok(expr)
    }
}
