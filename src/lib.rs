//! Lexer, Pratt parser and tree-walking interpreter for `.gct` scripts.

pub mod config;
pub mod frontend;
pub mod interpreter;
pub mod logging;

pub use config::Config;
pub use frontend::{Lexer, Parser, ParserError};
pub use interpreter::{Interpreter, InterpreterError, Object};
