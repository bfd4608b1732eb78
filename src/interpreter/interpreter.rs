use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeResult};
use super::function::GctFn;
use super::import::{LoadedModule, ModuleLoader};
use super::native_function::{get_native_funcs, NativeFn};
use super::object::Object;
use super::types::DeclaredType;
use crate::config::Config;
use crate::frontend::grammar::{
    BlockStatement, Expr, ExprType, Program, Stmt, StmtType, TypeAnnotation,
};
use crate::frontend::operator::{InfixOperator, PrefixOperator};
use crate::frontend::Parser;

use std::collections::HashMap;
use std::io::{self, Write};
use tracing::debug;

/// One evaluation session: the global scope, the builtins, the module loader
/// and the sink that `print` writes to.
pub struct Interpreter<W: Write = io::Stdout> {
    env: Environment,
    globals: Environment,
    builtins: HashMap<&'static str, NativeFn>,
    modules: ModuleLoader,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Interpreter::with_config(&Config::default(), output)
    }

    pub fn with_config(config: &Config, output: W) -> Self {
        let builtins = get_native_funcs()
            .into_iter()
            .map(|func| (func.name(), func))
            .collect();
        let globals = Environment::new();

        Interpreter {
            env: globals.clone(),
            globals,
            builtins,
            modules: ModuleLoader::new(config.module_dir.clone()),
            output,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        // Return old original interpreter env
        env
    }

    /// Evaluates a program in the session's global scope.
    pub fn eval_program(&mut self, program: &Program) -> RuntimeResult<Object> {
        let globals = self.globals.clone();
        self.eval_program_in(program, &globals)
    }

    /// Evaluates a program in `env`. A top-level `return` ends the program with
    /// its value.
    pub fn eval_program_in(
        &mut self,
        program: &Program,
        env: &Environment,
    ) -> RuntimeResult<Object> {
        let prev_env = self.swap_env(env.clone());
        let result = match self.eval_statements(&program.statements) {
            Err(InterpreterError::Return(value)) => Ok(value),
            other => other,
        };

        self.swap_env(prev_env);
        result
    }

    /// Evaluates a block in `env`, e.g. a function body in its call frame.
    pub fn eval_block_in(
        &mut self,
        block: &BlockStatement,
        env: Environment,
    ) -> RuntimeResult<Object> {
        let prev_env = self.swap_env(env);
        let result = self.eval_block(block);
        self.swap_env(prev_env);
        result
    }

    /// Result of the last statement, or `Null` if there are none.
    fn eval_statements(&mut self, stmts: &[Stmt]) -> RuntimeResult<Object> {
        let mut result = Object::Null;
        for stmt in stmts.iter() {
            result = self.eval_statement(stmt)?;
        }
        Ok(result)
    }

    /// Blocks share the scope they appear in.
    pub fn eval_block(&mut self, block: &BlockStatement) -> RuntimeResult<Object> {
        self.eval_statements(&block.statements)
    }

    pub fn eval_statement(&mut self, stmt: &Stmt) -> RuntimeResult<Object> {
        match &stmt.stmt {
            StmtType::Expression(expr) => self.eval_expression(expr),
            StmtType::Var(name, type_annotation, expr) => {
                let value = self.eval_typed(type_annotation.as_ref(), expr)?;
                self.env.set(&name.name, value);
                Ok(Object::Null)
            }
            StmtType::Const(name, type_annotation, expr) => {
                let value = self.eval_typed(type_annotation.as_ref(), expr)?;
                self.env.set_const(&name.name, value);
                Ok(Object::Null)
            }
            StmtType::Return(expr) => {
                let value = self.eval_expression(expr)?;
                Err(InterpreterError::Return(value))
            }
            StmtType::Block(block) => self.eval_block(block),
            StmtType::Import(path) => self.eval_import(path),
        }
    }

    /// Evaluates a declaration's value and checks it against the annotation.
    fn eval_typed(
        &mut self,
        annotation: Option<&TypeAnnotation>,
        expr: &Expr,
    ) -> RuntimeResult<Object> {
        let value = self.eval_expression(expr)?;

        if let Some(annotation) = annotation {
            if !DeclaredType::parse(&annotation.name).accepts(&value) {
                return Err(InterpreterError::DeclaredTypeMismatch {
                    expected: annotation.name.clone(),
                    got: value.type_name(),
                });
            }
        }

        Ok(value)
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Object> {
        match &expr.expr {
            ExprType::IntegerLiteral(n) => Ok(Object::Integer(*n)),
            ExprType::StringLiteral(s) => Ok(Object::Str(s.clone())),
            ExprType::BooleanLiteral(b) => Ok(Object::Boolean(*b)),
            ExprType::Identifier(ident) => self.lookup(&ident.name),
            ExprType::Prefix(op, expr) => self.eval_prefix_operator(*op, expr),
            ExprType::Infix(op, lhs, rhs) => self.eval_infix_operator(*op, lhs, rhs),
            ExprType::If(condition, consequence, alternative) => {
                if self.eval_expression(condition)?.is_truthy() {
                    return self.eval_block(consequence);
                }
                match alternative {
                    Some(alternative) => self.eval_block(alternative),
                    None => Ok(Object::Null),
                }
            }
            ExprType::Function(literal) => Ok(Object::Function(GctFn::new(
                literal.clone(),
                self.env.clone(),
            ))),
            ExprType::Call(callee, args) => self.eval_func_call(callee, args),
            ExprType::Assignment(name, expr) => {
                let value = self.eval_expression(expr)?;
                if !self.env.reassign(&name.name, value.clone()) {
                    return Err(InterpreterError::ConstantAssignment(name.name.clone()));
                }
                Ok(value)
            }
        }
    }

    /// Scopes first, then builtins, so scripts may shadow `len` and `print`.
    fn lookup(&self, name: &str) -> RuntimeResult<Object> {
        if let Some(value) = self.env.get(name) {
            return Ok(value);
        }

        match self.builtins.get(name) {
            Some(builtin) => Ok(Object::Builtin(builtin.clone())),
            None => Err(InterpreterError::IdentifierNotFound(name.to_owned())),
        }
    }

    pub fn eval_infix_operator(
        &mut self,
        op: InfixOperator,
        lhs: &Expr,
        rhs: &Expr,
    ) -> RuntimeResult<Object> {
        let lhs = self.eval_expression(lhs)?;
        let rhs = self.eval_expression(rhs)?;
        Object::apply_infix_op(op, lhs, rhs)
    }

    pub fn eval_prefix_operator(
        &mut self,
        op: PrefixOperator,
        expr: &Expr,
    ) -> RuntimeResult<Object> {
        let value = self.eval_expression(expr)?;
        Object::apply_prefix_op(op, value)
    }

    pub fn eval_func_call(&mut self, callee: &Expr, raw_args: &[Expr]) -> RuntimeResult<Object> {
        let callee = self.eval_expression(callee)?;
        let mut args = Vec::with_capacity(raw_args.len());
        for raw_arg in raw_args.iter() {
            args.push(self.eval_expression(raw_arg)?);
        }

        callee.execute(args, self)
    }

    /// Loads, evaluates and flattens a module into the current scope.
    fn eval_import(&mut self, path: &str) -> RuntimeResult<Object> {
        let path = ModuleLoader::normalize(path);
        let module = self.modules.load(&path)?;

        if !self.modules.enter(&module.key) {
            debug!(path = %path, "skipping circular import");
            return Ok(Object::Null);
        }

        let result = self.eval_module(&path, &module);
        self.modules.exit(&module.key);
        result
    }

    fn eval_module(&mut self, path: &str, module: &LoadedModule) -> RuntimeResult<Object> {
        let (program, errors) = Parser::new(&module.source).parse();
        if !errors.is_empty() {
            return Err(InterpreterError::ImportParse {
                path: path.to_owned(),
                errors,
            });
        }

        let module_env = Environment::with_enclosing(&self.env);
        self.eval_program_in(&program, &module_env)?;
        module_env.export_to(&self.env);

        debug!(path = %path, exported = ?module_env.names(), "imported module");
        Ok(Object::Null)
    }
}
