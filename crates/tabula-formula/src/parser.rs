//! Recursive-descent parser for the formula grammar:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := ('+' | '-') factor | primary
//! primary    := NUMBER | REFERENCE | '(' expression ')'
//! ```

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Token, tokenize};

pub(crate) fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser { tokens, next: 0 };
    let expr = parser.expression()?;
    if parser.next < parser.tokens.len() {
        return Err(ParseError::UnexpectedToken(describe(
            &parser.tokens[parser.next],
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    next: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.next).cloned();
        if token.is_some() {
            self.next += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.next += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.next += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.next += 1;
                Ok(Expr::Unary(UnaryOp::Plus, Box::new(self.factor()?)))
            }
            Some(Token::Minus) => {
                self.next += 1;
                Ok(Expr::Unary(UnaryOp::Minus, Box::new(self.factor()?)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Reference(reference)) => Ok(match reference.pos {
                Some(pos) => Expr::Reference(pos),
                None => Expr::InvalidReference(reference.text),
            }),
            Some(Token::LParen) => {
                let expr = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(expr),
                    Some(token) => Err(ParseError::UnexpectedToken(describe(&token))),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            Some(token) => Err(ParseError::UnexpectedToken(describe(&token))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn describe(token: &Token) -> &'static str {
    match token {
        Token::Number(_) => "number",
        Token::Reference(_) => "cell reference",
        Token::Plus => "'+'",
        Token::Minus => "'-'",
        Token::Star => "'*'",
        Token::Slash => "'/'",
        Token::LParen => "'('",
        Token::RParen => "')'",
    }
}
