use super::object::Object;
use crate::frontend::operator::{InfixOperator, PrefixOperator};
use crate::frontend::ParserError;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that stops normal evaluation. `Return` is not a failure: it
/// carries a `return` value up to the nearest function or program boundary.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("return outside of a function: {0}")]
    Return(Object),
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator {
        op: PrefixOperator,
        operand: &'static str,
    },
    #[error("unknown operator: {lhs} {op} {rhs}")]
    UnknownInfixOperator {
        op: InfixOperator,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("type mismatch: {lhs} {op} {rhs}")]
    TypeMismatch {
        op: InfixOperator,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("not a function: {0}")]
    NotCallable(&'static str),
    #[error("type mismatch: expected {expected}, got {got}")]
    DeclaredTypeMismatch { expected: String, got: &'static str },
    #[error("type mismatch for argument {index}: expected {expected}, got {got}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: String,
        got: &'static str,
    },
    #[error("return type mismatch: expected {expected}, got {got}")]
    ReturnTypeMismatch { expected: String, got: &'static str },
    #[error("assignment to constant variable: {0}")]
    ConstantAssignment(String),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("argument to `{builtin}` not supported, got {got}")]
    UnsupportedArgument {
        builtin: &'static str,
        got: &'static str,
    },
    #[error(
        "could not import file: {reason}. Tried: {}, {}, and {}",
        .tried[0].display(),
        .tried[1].display(),
        .tried[2].display()
    )]
    ImportNotFound { reason: io::Error, tried: [PathBuf; 3] },
    #[error("parser errors in imported file {path}:{}", format_parser_errors(.errors))]
    ImportParse {
        path: String,
        errors: Vec<ParserError>,
    },
    #[error("could not resolve absolute path: {0}")]
    ImportPath(#[source] io::Error),
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

pub type RuntimeResult<T> = Result<T, InterpreterError>;

fn format_parser_errors(errors: &[ParserError]) -> String {
    errors.iter().map(|e| format!("\n\t{}", e)).collect()
}
