pub mod environment;
pub mod errors;
pub mod function;
pub mod import;
pub mod interpreter;
pub mod native_function;
pub mod object;
pub mod types;

pub use environment::Environment;
pub use errors::{InterpreterError, RuntimeResult};
pub use interpreter::Interpreter;
pub use object::Object;
