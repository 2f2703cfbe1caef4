use std::fmt::Display;

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("Expected {expected}, got {got} at line {}", .got.line)]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("Invalid assignment target at line {}", .0.line)]
    InvalidAssignmentTarget(Token),
    #[error("Invalid number literal {} at line {}", .0.lexeme, .0.line)]
    InvalidNumberLiteral(Token),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "'{}'", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected: Expected::Token(expected),
            got,
        }
    }

    pub fn unexpected_other(expected: Expected, got: Token) -> ParseError {
        ParseError::UnexpectedToken { expected, got }
    }

    /// Source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { got, .. } => got.line,
            ParseError::InvalidAssignmentTarget(token) => token.line,
            ParseError::InvalidNumberLiteral(token) => token.line,
        }
    }
}
