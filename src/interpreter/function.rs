use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeResult};
use super::interpreter::Interpreter;
use super::object::Object;
use super::types::DeclaredType;
use crate::frontend::grammar::FunctionLiteral;

use std::fmt;
use std::io::Write;
use std::rc::Rc;
use tracing::trace;

pub struct GctFnData {
    literal: Rc<FunctionLiteral>,
    closure: Environment,
}

/// A user function: its literal plus the environment it was created in.
#[derive(Clone)]
pub struct GctFn(Rc<GctFnData>);

impl GctFn {
    pub fn new(literal: Rc<FunctionLiteral>, closure: Environment) -> Self {
        GctFn(Rc::new(GctFnData { literal, closure }))
    }

    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        let literal = &self.0.literal;
        self.check_arguments(&args)?;
        trace!(signature = %literal.signature(), args = args.len(), "calling function");

        // Extra arguments are dropped; missing parameters stay unbound.
        let env = Environment::with_enclosing(&self.0.closure);
        for (param, arg) in literal.parameters.iter().zip(args.into_iter()) {
            env.set(param.name(), arg);
        }

        let result = match interpreter.eval_block_in(&literal.body, env) {
            Ok(value) => value,
            Err(InterpreterError::Return(value)) => value,
            Err(e) => return Err(e),
        };

        if let Some(return_type) = &literal.return_type {
            if !DeclaredType::parse(&return_type.name).accepts(&result) {
                return Err(InterpreterError::ReturnTypeMismatch {
                    expected: return_type.name.clone(),
                    got: result.type_name(),
                });
            }
        }

        Ok(result)
    }

    fn check_arguments(&self, args: &[Object]) -> RuntimeResult<()> {
        let params = self.0.literal.parameters.iter();

        for (index, (param, arg)) in params.zip(args.iter()).enumerate() {
            let annotation = match &param.type_annotation {
                Some(annotation) => annotation,
                None => continue,
            };

            if !DeclaredType::parse(&annotation.name).accepts(arg) {
                return Err(InterpreterError::ArgumentTypeMismatch {
                    index,
                    expected: annotation.name.clone(),
                    got: arg.type_name(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for GctFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let literal = &self.0.literal;
        write!(
            f,
            "function{} {{\n{}\n}}",
            literal.signature(),
            literal.body.statements_string()
        )
    }
}

impl fmt::Debug for GctFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function{}>", self.0.literal.signature())
    }
}

impl PartialEq<GctFn> for GctFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for GctFn {}
