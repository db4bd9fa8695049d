use crate::lexer::{Token, TokenKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("premature end of input, expected {expected}")]
    PrematureEndOfInput { expected: Expected },
    #[error("expected {expected}, got {got:?}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("could not parse integer literal: {0}")]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error("no parse function for token {0:?}")]
    NoPrefixFunction(Token),
}

#[derive(Debug)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{:?}", kind),
            Expected::Identifier => write!(f, "an identifier"),
            Expected::Expression => write!(f, "an expression"),
        }
    }
}

impl ParseError {
    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Option<Token>) -> ParseError {
        match got {
            Some(got) => ParseError::UnexpectedToken {
                expected: Expected::Token(expected),
                got,
            },
            None => ParseError::PrematureEndOfInput {
                expected: Expected::Token(expected),
            },
        }
    }

    pub fn unexpected_other(expected: Expected, got: Option<Token>) -> ParseError {
        match got {
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => ParseError::PrematureEndOfInput { expected },
        }
    }
}
