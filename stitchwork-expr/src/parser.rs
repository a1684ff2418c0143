//! Pratt parser from tokens to [`Program`].
//!
//! Newlines separate statements at the top level and inside `{ }` blocks,
//! but are ignored inside `( )` and `[ ]`, so a call may span several lines.

use crate::ast::{Arg, BinOp, Expr, Literal, Program, UnOp};
use crate::error::{ExprError, Result, Span};
use crate::lexer::{SpannedToken, Token};

/// Binding power of `->`, the loosest operator
const RIGHT_ASSIGN_BP: (u8, u8) = (2, 3);
/// `<-`, `<<-` and `=` are right-associative
const ASSIGN_BP: (u8, u8) = (5, 4);
const NOT_BP: u8 = 10;
const UNARY_MINUS_BP: u8 = 21;
const POSTFIX_BP: u8 = 25;

fn infix_binding_power(token: &Token) -> Option<(u8, u8)> {
    let bp = match token {
        Token::RightArrow => RIGHT_ASSIGN_BP,
        Token::LeftArrow | Token::SuperArrow | Token::Eq => ASSIGN_BP,
        Token::Or | Token::OrOr => (6, 7),
        Token::And | Token::AndAnd => (8, 9),
        Token::EqEq | Token::NotEq | Token::Lt | Token::Le | Token::Gt | Token::Ge => (11, 12),
        Token::Plus | Token::Minus => (13, 14),
        Token::Star | Token::Slash => (15, 16),
        Token::Modulo | Token::IntDiv => (17, 18),
        Token::Colon => (19, 20),
        Token::Caret => (24, 23),
        _ => return None,
    };
    Some(bp)
}

fn binop_for(token: &Token) -> Option<BinOp> {
    let op = match token {
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Caret => BinOp::Pow,
        Token::Modulo => BinOp::Mod,
        Token::IntDiv => BinOp::IntDiv,
        Token::Colon => BinOp::Range,
        Token::EqEq => BinOp::Eq,
        Token::NotEq => BinOp::Ne,
        Token::Lt => BinOp::Lt,
        Token::Le => BinOp::Le,
        Token::Gt => BinOp::Gt,
        Token::Ge => BinOp::Ge,
        Token::And => BinOp::And,
        Token::Or => BinOp::Or,
        Token::AndAnd => BinOp::AndAnd,
        Token::OrOr => BinOp::OrOr,
        _ => return None,
    };
    Some(op)
}

/// Parser for tag expressions
pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    /// One entry per open bracket; `true` when newlines separate statements
    newline_stack: Vec<bool>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            newline_stack: vec![true],
        }
    }

    fn newlines_significant(&self) -> bool {
        self.newline_stack.last().copied().unwrap_or(true)
    }

    /// Index of the next meaningful token
    fn next_index(&self) -> usize {
        let mut idx = self.pos;
        if !self.newlines_significant() {
            while matches!(self.tokens.get(idx).map(|t| &t.token), Some(Token::Newline)) {
                idx += 1;
            }
        }
        idx
    }

    /// Peek at current token
    fn peek(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.next_index())
    }

    /// Peek `n` meaningful tokens past the current one
    fn peek_nth(&self, n: usize) -> Option<&'a SpannedToken> {
        let mut idx = self.next_index();
        for _ in 0..n {
            idx += 1;
            if !self.newlines_significant() {
                while matches!(self.tokens.get(idx).map(|t| &t.token), Some(Token::Newline)) {
                    idx += 1;
                }
            }
        }
        self.tokens.get(idx)
    }

    /// Advance to next token
    fn advance(&mut self) -> Option<&'a SpannedToken> {
        let idx = self.next_index();
        let token = self.tokens.get(idx);
        if token.is_some() {
            self.pos = idx + 1;
        }
        token
    }

    /// Check if current token matches expected
    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .map(|t| std::mem::discriminant(&t.token) == std::mem::discriminant(expected))
            .unwrap_or(false)
    }

    /// Expect a token, error if not found
    fn expect(&mut self, expected: Token) -> Result<&'a SpannedToken> {
        if self.check(&expected) {
            self.advance().ok_or_else(|| self.error_here("Unexpected end of input"))
        } else {
            let found = self
                .peek()
                .map(|t| format!("{:?}", t.token))
                .unwrap_or_else(|| "end of input".to_string());
            Err(self.error_here(&format!("Expected {:?}, found {}", expected, found)))
        }
    }

    fn error_here(&self, message: &str) -> ExprError {
        let span = self.peek().map(|t| t.span).unwrap_or_default();
        ExprError::ParserError {
            span,
            message: message.to_string(),
        }
    }

    fn is_eof(&self) -> bool {
        self.peek()
            .map(|t| matches!(t.token, Token::Eof))
            .unwrap_or(true)
    }

    fn skip_separators(&mut self) {
        while self.peek().map(|t| t.token.is_separator()).unwrap_or(false) {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    /// Parse the entire input as a program
    pub fn parse_program(&mut self) -> Result<Program> {
        let start = self.peek().map(|t| t.span.start).unwrap_or(0);
        let statements = self.parse_statements(&Token::Eof)?;
        let end = self.peek().map(|t| t.span.end).unwrap_or(start);
        Ok(Program {
            statements,
            span: Span::new(start, end),
        })
    }

    /// Parse statements until `terminator` (not consumed)
    fn parse_statements(&mut self, terminator: &Token) -> Result<Vec<Expr>> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.check(terminator) || self.is_eof() {
                break;
            }
            statements.push(self.parse_expr(0)?);

            let next = self.peek().map(|t| &t.token);
            match next {
                Some(t) if t.is_separator() => continue,
                Some(t) if std::mem::discriminant(t) == std::mem::discriminant(terminator) => break,
                Some(Token::Eof) | None => break,
                Some(other) => {
                    return Err(self.error_here(&format!("Unexpected token {:?}", other)));
                }
            }
        }
        Ok(statements)
    }

    /// Parse an expression whose operators bind tighter than `min_bp`
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(next) = self.peek() else { break };

            // Postfix: call and index
            match next.token {
                Token::LParen if POSTFIX_BP >= min_bp => {
                    lhs = self.parse_call(lhs)?;
                    continue;
                }
                Token::LBracket if POSTFIX_BP >= min_bp => {
                    lhs = self.parse_index(lhs)?;
                    continue;
                }
                _ => {}
            }

            let Some((l_bp, r_bp)) = infix_binding_power(&next.token) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op_token = next.token.clone();
            let op_span = next.span;
            self.advance();
            self.skip_newlines();

            lhs = match op_token {
                // `<<-` writes the explicit level like `<-`
                Token::LeftArrow | Token::SuperArrow | Token::Eq => {
                    let rhs = self.parse_expr(r_bp)?;
                    assignment(lhs, rhs, op_span)?
                }
                Token::RightArrow => {
                    let rhs = self.parse_expr(r_bp)?;
                    assignment(rhs, lhs, op_span)?
                }
                other => {
                    let rhs = self.parse_expr(r_bp)?;
                    let op = binop_for(&other).ok_or_else(|| ExprError::ParserError {
                        span: op_span,
                        message: format!("Unknown operator {:?}", other),
                    })?;
                    let span = lhs.span().merge(rhs.span());
                    Expr::BinOp(Box::new(lhs), op, Box::new(rhs), span)
                }
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        self.skip_newlines();
        let token = self
            .advance()
            .ok_or_else(|| self.error_here("Unexpected end of input"))?;
        let span = token.span;

        match &token.token {
            Token::Number(n) => Ok(Expr::Literal(Literal::Number(*n), span)),
            Token::StringLiteral(s) => Ok(Expr::Literal(Literal::Str(s.clone()), span)),
            Token::True => Ok(Expr::Literal(Literal::Bool(true), span)),
            Token::False => Ok(Expr::Literal(Literal::Bool(false), span)),
            Token::Null => Ok(Expr::Literal(Literal::Null, span)),
            Token::Inf => Ok(Expr::Literal(Literal::Number(f64::INFINITY), span)),
            Token::NaN => Ok(Expr::Literal(Literal::Number(f64::NAN), span)),
            Token::Identifier(name) => Ok(Expr::Var(name.clone(), span)),
            Token::Minus | Token::Plus => {
                let op = if token.token == Token::Minus {
                    UnOp::Neg
                } else {
                    UnOp::Pos
                };
                let operand = self.parse_expr(UNARY_MINUS_BP)?;
                let span = span.merge(operand.span());
                Ok(Expr::UnOp(op, Box::new(operand), span))
            }
            Token::Bang => {
                let operand = self.parse_expr(NOT_BP)?;
                let span = span.merge(operand.span());
                Ok(Expr::UnOp(UnOp::Not, Box::new(operand), span))
            }
            Token::LParen => {
                self.newline_stack.push(false);
                let inner = self.parse_expr(0);
                let close = self.expect(Token::RParen);
                self.newline_stack.pop();
                let inner = inner?;
                close?;
                Ok(inner)
            }
            Token::LBrace => {
                self.newline_stack.push(true);
                let body = self.parse_statements(&Token::RBrace);
                let close = self.expect(Token::RBrace);
                self.newline_stack.pop();
                let body = body?;
                let end = close?.span;
                Ok(Expr::Block(body, span.merge(end)))
            }
            Token::If => self.parse_if(span),
            other => Err(ExprError::ParserError {
                span,
                message: format!("Unexpected token {:?}", other),
            }),
        }
    }

    fn parse_if(&mut self, start: Span) -> Result<Expr> {
        self.expect(Token::LParen)?;
        self.newline_stack.push(false);
        let condition = self.parse_expr(0);
        let close = self.expect(Token::RParen);
        self.newline_stack.pop();
        let condition = condition?;
        close?;

        let then_branch = self.parse_expr(ASSIGN_BP.1)?;
        let mut span = start.merge(then_branch.span());

        // `else` may follow on a later line
        let mut lookahead = self.next_index();
        while matches!(self.tokens.get(lookahead).map(|t| &t.token), Some(Token::Newline)) {
            lookahead += 1;
        }
        let else_branch = match self.tokens.get(lookahead) {
            Some(t) if t.token == Token::Else => {
                self.pos = lookahead + 1;
                let branch = self.parse_expr(ASSIGN_BP.1)?;
                span = span.merge(branch.span());
                Some(Box::new(branch))
            }
            _ => None,
        };

        Ok(Expr::If(
            Box::new(condition),
            Box::new(then_branch),
            else_branch,
            span,
        ))
    }

    fn parse_call(&mut self, callee: Expr) -> Result<Expr> {
        let (name, start) = match callee {
            Expr::Var(name, span) => (name, span.start),
            other => {
                return Err(ExprError::ParserError {
                    span: other.span(),
                    message: "Only named functions can be called".to_string(),
                });
            }
        };

        self.expect(Token::LParen)?;
        self.newline_stack.push(false);
        let args = self.parse_args();
        let close = self.expect(Token::RParen);
        self.newline_stack.pop();
        let args = args?;
        let end = close?.span;

        Ok(Expr::Call(name, args, Span::new(start, end.end)))
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>> {
        let mut args = Vec::new();
        if self.check(&Token::RParen) {
            return Ok(args);
        }
        loop {
            let named = match (self.peek(), self.peek_nth(1)) {
                (
                    Some(SpannedToken {
                        token: Token::Identifier(name),
                        ..
                    }),
                    Some(SpannedToken { token: Token::Eq, .. }),
                ) => Some(name.clone()),
                (
                    Some(SpannedToken {
                        token: Token::StringLiteral(name),
                        ..
                    }),
                    Some(SpannedToken { token: Token::Eq, .. }),
                ) => Some(name.clone()),
                _ => None,
            };
            if named.is_some() {
                self.advance();
                self.advance();
            }
            // Arguments bind tighter than `=` so `f(a = b)` stays a named argument
            let value = self.parse_expr(ASSIGN_BP.0 + 1)?;
            args.push(Arg { name: named, value });

            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(args)
    }

    fn parse_index(&mut self, target: Expr) -> Result<Expr> {
        self.expect(Token::LBracket)?;
        self.newline_stack.push(false);
        let index = self.parse_expr(0);
        let close = self.expect(Token::RBracket);
        self.newline_stack.pop();
        let index = index?;
        let end = close?.span;
        let span = target.span().merge(end);
        Ok(Expr::Index(Box::new(target), Box::new(index), span))
    }
}

fn assignment(target: Expr, value: Expr, op_span: Span) -> Result<Expr> {
    match target {
        Expr::Var(name, span) => {
            let full = span.merge(value.span());
            Ok(Expr::Assign(name, Box::new(value), full))
        }
        Expr::Literal(Literal::Str(name), span) => {
            let full = span.merge(value.span());
            Ok(Expr::Assign(name, Box::new(value), full))
        }
        other => Err(ExprError::ParserError {
            span: other.span().merge(op_span),
            message: "Invalid assignment target".to_string(),
        }),
    }
}

/// Parse a token stream into a program
pub fn parse(tokens: &[SpannedToken]) -> Result<Program> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}
