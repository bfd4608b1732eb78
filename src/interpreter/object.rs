use super::errors::{InterpreterError, RuntimeResult};
use super::function::GctFn;
use super::interpreter::Interpreter;
use super::native_function::NativeFn;
use crate::frontend::operator::{InfixOperator, PrefixOperator};

use std::fmt;
use std::io::Write;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Str(String),
    Boolean(bool),
    Null,
    Function(GctFn),
    Builtin(NativeFn),
}

impl Object {
    /// Runtime type tag, as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Str(_) => "STRING",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        match self {
            Object::Function(f) => f.execute(args, interpreter),
            Object::Builtin(f) => f.execute(args, interpreter.output()),
            _ => Err(InterpreterError::NotCallable(self.type_name())),
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> RuntimeResult<Object> {
        match (lhs, rhs) {
            (Object::Integer(a), Object::Integer(b)) => integer_binop(op, a, b),
            (Object::Str(a), Object::Str(b)) => match op {
                InfixOperator::Add => Ok(Object::Str(a + &b)),
                _ => Err(InterpreterError::UnknownInfixOperator {
                    op,
                    lhs: "STRING",
                    rhs: "STRING",
                }),
            },
            // Either side may be the string; operand order is kept.
            (Object::Str(a), b) if op == InfixOperator::Add => Ok(Object::Str(a + &b.to_string())),
            (a, Object::Str(b)) if op == InfixOperator::Add => Ok(Object::Str(a.to_string() + &b)),
            (a, b) => match op {
                InfixOperator::EqualTo => Ok(Object::Boolean(a == b)),
                InfixOperator::NotEqualTo => Ok(Object::Boolean(a != b)),
                _ if a.type_name() != b.type_name() => Err(InterpreterError::TypeMismatch {
                    op,
                    lhs: a.type_name(),
                    rhs: b.type_name(),
                }),
                _ => Err(InterpreterError::UnknownInfixOperator {
                    op,
                    lhs: a.type_name(),
                    rhs: b.type_name(),
                }),
            },
        }
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> RuntimeResult<Object> {
        match op {
            PrefixOperator::Negate => match value {
                Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
                _ => Err(InterpreterError::UnknownPrefixOperator {
                    op,
                    operand: value.type_name(),
                }),
            },
            PrefixOperator::LogicalNot => Ok(Object::Boolean(!value.is_truthy())),
        }
    }
}

fn integer_binop(op: InfixOperator, a: i64, b: i64) -> RuntimeResult<Object> {
    let result = match op {
        InfixOperator::Add => Object::Integer(a.wrapping_add(b)),
        InfixOperator::Subtract => Object::Integer(a.wrapping_sub(b)),
        InfixOperator::Multiply => Object::Integer(a.wrapping_mul(b)),
        InfixOperator::Divide => {
            if b == 0 {
                return Err(InterpreterError::DivisionByZero);
            }
            Object::Integer(a.wrapping_div(b))
        }
        InfixOperator::Modulo => {
            if b == 0 {
                return Err(InterpreterError::ModuloByZero);
            }
            Object::Integer(a.wrapping_rem(b))
        }
        InfixOperator::EqualTo => Object::Boolean(a == b),
        InfixOperator::NotEqualTo => Object::Boolean(a != b),
        InfixOperator::LessThan => Object::Boolean(a < b),
        InfixOperator::GreaterThan => Object::Boolean(a > b),
        InfixOperator::LessEq => Object::Boolean(a <= b),
        InfixOperator::GreaterEq => Object::Boolean(a >= b),
    };

    Ok(result)
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{}", n),
            Object::Str(s) => f.write_str(s),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::Null => f.write_str("null"),
            Object::Function(func) => write!(f, "{}", func),
            Object::Builtin(_) => f.write_str("builtin function"),
        }
    }
}
