use super::errors::{InterpreterError, RuntimeResult};
use super::object::Object;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

type FnType = fn(Vec<Object>, &mut dyn Write) -> RuntimeResult<Object>;

pub struct NativeFnData {
    pub func: FnType,
    pub name: &'static str,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    fn new(name: &'static str, func: FnType) -> Self {
        NativeFn(Rc::new(NativeFnData { func, name }))
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Builtins check their own argument counts.
    pub fn execute(&self, args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
        (self.0.func)(args, output)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native-func {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // Function pointers make poor identities. Compare the Rcs instead.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeFn {}

pub fn get_native_funcs() -> Vec<NativeFn> {
    vec![NativeFn::new("len", len), NativeFn::new("print", print)]
}

fn len(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    if args.len() != 1 {
        return Err(InterpreterError::WrongArgumentCount {
            got: args.len(),
            want: 1,
        });
    }

    match &args[0] {
        Object::Str(s) => Ok(Object::Integer(s.len() as i64)),
        other => Err(InterpreterError::UnsupportedArgument {
            builtin: "len",
            got: other.type_name(),
        }),
    }
}

fn print(args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
    for arg in args.iter() {
        writeln!(output, "{}", arg)?;
    }

    Ok(Object::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Object>) -> (Result<Object, String>, String) {
        let func = get_native_funcs()
            .into_iter()
            .find(|f| f.name() == name)
            .expect("builtin exists");
        let mut output = Vec::new();
        let result = func.execute(args, &mut output).map_err(|e| e.to_string());
        (result, String::from_utf8(output).expect("utf8 output"))
    }

    #[test]
    fn test_len() {
        let (result, _) = call("len", vec![Object::Str("hello".to_owned())]);
        assert_eq!(result, Ok(Object::Integer(5)));

        // UTF-8 bytes, not characters.
        let (result, _) = call("len", vec![Object::Str("héllo".to_owned())]);
        assert_eq!(result, Ok(Object::Integer(6)));

        let (result, _) = call("len", vec![Object::Str(String::new())]);
        assert_eq!(result, Ok(Object::Integer(0)));
    }

    #[test]
    fn test_len_errors() {
        let (result, _) = call("len", vec![Object::Integer(1)]);
        assert_eq!(
            result,
            Err("argument to `len` not supported, got INTEGER".to_owned())
        );

        let (result, _) = call("len", vec![]);
        assert_eq!(
            result,
            Err("wrong number of arguments. got=0, want=1".to_owned())
        );

        let (result, _) = call(
            "len",
            vec![Object::Str("a".to_owned()), Object::Str("b".to_owned())],
        );
        assert_eq!(
            result,
            Err("wrong number of arguments. got=2, want=1".to_owned())
        );
    }

    #[test]
    fn test_print_writes_each_argument_on_a_line() {
        let (result, output) = call(
            "print",
            vec![
                Object::Str("hi".to_owned()),
                Object::Integer(3),
                Object::Null,
            ],
        );
        assert_eq!(result, Ok(Object::Null));
        assert_eq!(output, "hi\n3\nnull\n");

        let (_, output) = call("print", vec![]);
        assert_eq!(output, "");
    }

    #[test]
    fn test_identity() {
        let funcs = get_native_funcs();
        assert_eq!(funcs[0], funcs[0].clone());
        assert_ne!(funcs[0], funcs[1]);
        assert_eq!(format!("{:?}", funcs[1]), "<native-func print>");
    }
}
