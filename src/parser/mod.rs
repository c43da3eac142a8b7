mod expr;

#[cfg(test)]
mod tests;

use std::mem::discriminant;

use crate::arena_ctx::AstContext;
use crate::ast::{Decl, ParamList, Stmt, StmtKind, Type, TypeKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::intern::Name;
use crate::token::{Span, Token, TokenType};

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser for B-minor. Consumes the scanner's token
/// stream and builds the arena-allocated AST; it attaches no symbols and
/// performs no checking.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    ctx: AstContext<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, ctx: AstContext<'a>) -> Self {
        Parser {
            tokens,
            pos: 0,
            ctx,
        }
    }

    fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or(Token::new(TokenType::Eof, Span::default()))
    }

    fn peek(&self, offset: usize) -> Token {
        self.tokens
            .get(self.pos + offset)
            .copied()
            .unwrap_or(Token::new(TokenType::Eof, Span::default()))
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenType) -> bool {
        discriminant(&self.current().kind) == discriminant(&kind)
    }

    fn eat(&mut self, kind: TokenType) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenType, expected: &'static str) -> ParseResult<Token> {
        let token = self.current();
        if let TokenType::Error(_) = token.kind {
            return Err(ParseError::new(ParseErrorKind::InvalidToken, token.span));
        }
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected,
                    found: token.kind,
                },
                token.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<Name> {
        let token = self.current();
        match token.kind {
            TokenType::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenType::Error(_) => Err(ParseError::new(ParseErrorKind::InvalidToken, token.span)),
            found => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: "an identifier",
                    found,
                },
                token.span,
            )),
        }
    }

    /// Parses a whole translation unit: a chain of declarations.
    pub fn parse_program(&mut self) -> ParseResult<Option<&'a Decl<'a>>> {
        let mut first: Option<&'a Decl<'a>> = None;
        let mut last: Option<&'a Decl<'a>> = None;
        while !self.check(TokenType::Eof) {
            let decl = self.parse_decl()?;
            match last {
                Some(prev) => prev.next.set(Some(decl)),
                None => first = Some(decl),
            }
            last = Some(decl);
        }
        Ok(first)
    }

    /// `name : type ;` | `name : type = expr ;` | `name : type = {...}`
    fn parse_decl(&mut self) -> ParseResult<&'a Decl<'a>> {
        let name = self.expect_identifier()?;
        self.expect(TokenType::Colon, "':'")?;
        let ty = self.parse_type()?;

        if ty.kind == TypeKind::Function {
            if self.eat(TokenType::Semicolon) {
                // Prototype.
                return Ok(self.ctx.alloc_decl(Decl::new(name, ty, None, None)));
            }
            self.expect(TokenType::Assign, "'=' or ';'")?;
            let body = self.parse_block()?;
            return Ok(self.ctx.alloc_decl(Decl::new(name, ty, None, Some(body))));
        }

        if self.eat(TokenType::Semicolon) {
            return Ok(self.ctx.alloc_decl(Decl::new(name, ty, None, None)));
        }
        self.expect(TokenType::Assign, "'=' or ';'")?;
        let value = if self.check(TokenType::LeftBrace) {
            self.parse_braces()?
        } else {
            self.parse_expr()?
        };
        self.expect(TokenType::Semicolon, "';'")?;
        Ok(self
            .ctx
            .alloc_decl(Decl::new(name, ty, Some(value), None)))
    }

    fn parse_type(&mut self) -> ParseResult<&'a Type<'a>> {
        let token = self.current();
        let kind = match token.kind {
            TokenType::Void => TypeKind::Void,
            TokenType::Boolean => TypeKind::Boolean,
            TokenType::Char => TypeKind::Character,
            TokenType::Integer => TypeKind::Integer,
            TokenType::Double => TypeKind::Double,
            TokenType::String => TypeKind::String,
            TokenType::Auto => TypeKind::Auto,
            TokenType::Array | TokenType::Carray => {
                let kind = if token.kind == TokenType::Array {
                    TypeKind::Array
                } else {
                    TypeKind::Carray
                };
                self.advance();
                self.expect(TokenType::LeftBracket, "'['")?;
                let length = if self.check(TokenType::RightBracket) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenType::RightBracket, "']'")?;
                let subtype = self.parse_type()?;
                return Ok(self.ctx.array_type(kind, length, subtype));
            }
            TokenType::Function => {
                self.advance();
                let returns = self.parse_type()?;
                self.expect(TokenType::LeftParen, "'('")?;
                let params = if self.check(TokenType::RightParen) {
                    None
                } else {
                    Some(self.parse_params()?)
                };
                self.expect(TokenType::RightParen, "')'")?;
                return Ok(self.ctx.function_type(returns, params));
            }
            TokenType::Error(_) => {
                return Err(ParseError::new(ParseErrorKind::InvalidToken, token.span))
            }
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedType { found },
                    token.span,
                ))
            }
        };
        self.advance();
        Ok(self.ctx.ty(kind))
    }

    fn parse_params(&mut self) -> ParseResult<&'a ParamList<'a>> {
        let name = self.expect_identifier()?;
        self.expect(TokenType::Colon, "':'")?;
        let ty = self.parse_type()?;
        let next = if self.eat(TokenType::Comma) {
            Some(self.parse_params()?)
        } else {
            None
        };
        Ok(self.ctx.alloc_param(ParamList::new(name, ty, next)))
    }

    /// `{ stmt* }` as a block statement.
    fn parse_block(&mut self) -> ParseResult<&'a Stmt<'a>> {
        self.expect(TokenType::LeftBrace, "'{'")?;
        let mut first: Option<&'a Stmt<'a>> = None;
        let mut last: Option<&'a Stmt<'a>> = None;
        while !self.check(TokenType::RightBrace) && !self.check(TokenType::Eof) {
            let stmt = self.parse_stmt()?;
            match last {
                Some(prev) => prev.next.set(Some(stmt)),
                None => first = Some(stmt),
            }
            last = Some(stmt);
        }
        self.expect(TokenType::RightBrace, "'}'")?;
        Ok(self.ctx.stmt(StmtKind::Block { body: first }))
    }

    fn parse_stmt(&mut self) -> ParseResult<&'a Stmt<'a>> {
        match self.current().kind {
            TokenType::If => {
                self.advance();
                self.expect(TokenType::LeftParen, "'('")?;
                let cond = self.parse_expr()?;
                self.expect(TokenType::RightParen, "')'")?;
                let body = self.parse_stmt()?;
                let else_body = if self.eat(TokenType::Else) {
                    Some(self.parse_stmt()?)
                } else {
                    None
                };
                Ok(self.ctx.stmt(StmtKind::IfElse {
                    cond,
                    body,
                    else_body,
                }))
            }
            TokenType::For => {
                self.advance();
                self.expect(TokenType::LeftParen, "'('")?;
                let init = if self.check(TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenType::Semicolon, "';'")?;
                let cond = if self.check(TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenType::Semicolon, "';'")?;
                let update = if self.check(TokenType::RightParen) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenType::RightParen, "')'")?;
                let body = self.parse_stmt()?;
                Ok(self.ctx.stmt(StmtKind::For {
                    init,
                    cond,
                    update,
                    body,
                }))
            }
            TokenType::Print => {
                self.advance();
                let args = if self.check(TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_args()?)
                };
                self.expect(TokenType::Semicolon, "';'")?;
                Ok(self.ctx.stmt(StmtKind::Print { args }))
            }
            TokenType::Return => {
                self.advance();
                let value = if self.check(TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenType::Semicolon, "';'")?;
                Ok(self.ctx.stmt(StmtKind::Return { value }))
            }
            TokenType::LeftBrace => self.parse_block(),
            TokenType::Identifier(_) if matches!(self.peek(1).kind, TokenType::Colon) => {
                let decl = self.parse_decl()?;
                Ok(self.ctx.stmt(StmtKind::Decl(decl)))
            }
            TokenType::Error(_) => Err(ParseError::new(
                ParseErrorKind::InvalidToken,
                self.current().span,
            )),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenType::Semicolon, "';'")?;
                Ok(self.ctx.stmt(StmtKind::Expr(expr)))
            }
        }
    }
}
