use super::span::CodePosition;
use super::token::TokenKind;

use thiserror::Error;

/// A syntax error. The parser collects these and keeps going.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParserError {
    #[error("expected next token to be {expected}, got {got} instead at {position}")]
    ExpectedToken {
        expected: TokenKind,
        got: TokenKind,
        position: CodePosition,
    },
    #[error("no prefix parse function for {kind} found at {position}")]
    NoPrefixRule {
        kind: TokenKind,
        position: CodePosition,
    },
    #[error("could not parse \"{literal}\" as integer at {position}")]
    InvalidInteger {
        literal: String,
        position: CodePosition,
    },
    #[error("expected identifier on left side of assignment, got {literal} at {position}")]
    InvalidAssignmentTarget {
        literal: String,
        position: CodePosition,
    },
    #[error("expected string as import path, got {kind} at {position}")]
    ExpectedImportPath {
        kind: TokenKind,
        position: CodePosition,
    },
}

#[cfg(test)]
impl ParserError {
    fn position(&self) -> CodePosition {
        match self {
            ParserError::ExpectedToken { position, .. }
            | ParserError::NoPrefixRule { position, .. }
            | ParserError::InvalidInteger { position, .. }
            | ParserError::InvalidAssignmentTarget { position, .. }
            | ParserError::ExpectedImportPath { position, .. } => *position,
        }
    }
}
