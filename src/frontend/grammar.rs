use super::operator::{InfixOperator, PrefixOperator};
use super::token::Token;

use std::fmt;
use std::rc::Rc;

/// Root of every parse: the ordered statements of one source.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Stmt {
    pub stmt: StmtType,
    pub token: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtType {
    Var(Identifier, Option<TypeAnnotation>, Expr),
    Const(Identifier, Option<TypeAnnotation>, Expr),
    Return(Expr),
    Expression(Expr),
    Block(BlockStatement),
    Import(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub expr: ExprType,
    pub token: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    Identifier(Identifier),
    IntegerLiteral(i64),
    StringLiteral(String),
    BooleanLiteral(bool),
    Prefix(PrefixOperator, Box<Expr>),
    Infix(InfixOperator, Box<Expr>, Box<Expr>),
    If(Box<Expr>, BlockStatement, Option<BlockStatement>),
    Function(Rc<FunctionLiteral>),
    Call(Box<Expr>, Vec<Expr>),
    Assignment(Identifier, Box<Expr>),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: String,
    pub token: Token,
}

/// Declared type name after a colon, e.g. `: int`. Any name is accepted here;
/// only the evaluator gives meaning to it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TypeAnnotation {
    pub name: String,
    pub token: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionParameter {
    pub name: Identifier,
    pub type_annotation: Option<TypeAnnotation>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionLiteral {
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: BlockStatement,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |stmt| stmt.token_literal())
    }
}

impl Stmt {
    pub fn new(stmt: StmtType, token: Token) -> Self {
        Stmt { stmt, token }
    }

    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl BlockStatement {
    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }

    /// The statements without the surrounding braces.
    pub fn statements_string(&self) -> String {
        join(&self.statements, " ")
    }
}

impl Expr {
    pub fn new(expr: ExprType, token: Token) -> Self {
        Expr { expr, token }
    }

    pub fn token_literal(&self) -> &str {
        &self.token.literal
    }

    /// Returns the identifier if this expression is a bare name.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match &self.expr {
            ExprType::Identifier(ident) => Some(ident),
            _ => None,
        }
    }
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        Identifier {
            name: token.literal.clone(),
            token,
        }
    }
}

impl TypeAnnotation {
    pub fn new(token: Token) -> Self {
        TypeAnnotation {
            name: token.literal.clone(),
            token,
        }
    }
}

impl FunctionParameter {
    pub fn name(&self) -> &str {
        &self.name.name
    }
}

impl FunctionLiteral {
    /// `(a: int, b)` followed by `: type` when a return type is declared.
    pub fn signature(&self) -> String {
        let params = join(&self.parameters, ", ");
        match &self.return_type {
            Some(return_type) => format!("({}): {}", params, return_type),
            None => format!("({})", params),
        }
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&join(&self.statements, ""))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.stmt {
            StmtType::Var(name, ty, value) => fmt_declaration(f, "var", name, ty, value),
            StmtType::Const(name, ty, value) => fmt_declaration(f, "const", name, ty, value),
            StmtType::Return(value) => write!(f, "return {};", value),
            StmtType::Expression(expr) => write!(f, "{};", expr),
            StmtType::Block(block) => write!(f, "{}", block),
            StmtType::Import(path) => write!(f, "import \"{}\";", path),
        }
    }
}

fn fmt_declaration(
    f: &mut fmt::Formatter,
    keyword: &str,
    name: &Identifier,
    ty: &Option<TypeAnnotation>,
    value: &Expr,
) -> fmt::Result {
    write!(f, "{} {}", keyword, name)?;
    if let Some(ty) = ty {
        write!(f, ": {}", ty)?;
    }
    write!(f, " = {};", value)
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.statements.is_empty() {
            f.write_str("{ }")
        } else {
            write!(f, "{{ {} }}", self.statements_string())
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.expr {
            ExprType::Identifier(ident) => write!(f, "{}", ident),
            ExprType::IntegerLiteral(n) => write!(f, "{}", n),
            ExprType::StringLiteral(s) => write!(f, "\"{}\"", s),
            ExprType::BooleanLiteral(b) => write!(f, "{}", b),
            ExprType::Prefix(op, right) => write!(f, "({}{})", op.symbol(), right),
            ExprType::Infix(op, left, right) => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            ExprType::If(condition, consequence, alternative) => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            ExprType::Function(func) => write!(f, "function{} {}", func.signature(), func.body),
            ExprType::Call(callee, args) => write!(f, "{}({})", callee, join(args, ", ")),
            ExprType::Assignment(name, value) => write!(f, "({} = {})", name, value),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for FunctionParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.type_annotation {
            Some(ty) => write!(f, "{}: {}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}
