use super::errors::ParserError;
use super::grammar::{
    BlockStatement, Expr, ExprType, FunctionLiteral, FunctionParameter, Identifier, Program,
    Stmt, StmtType, TypeAnnotation,
};
use super::lexer::Lexer;
use super::operator::{ParserOperator, Precedence, PrefixOperator};
use super::token::{Token, TokenKind};

use std::rc::Rc;

/// Pratt parser with one token of lookahead.
///
/// Parsing never aborts. Every parse function returns `None` after recording
/// a `ParserError`, the enclosing statement is dropped (along with a trailing
/// `;` if one follows), and parsing resumes with the next token so that later
/// errors are still reported.
pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: Token,
    peek: Token,
    errors: Vec<ParserError>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Parser::from_lexer(Lexer::new(source))
    }

    pub fn from_lexer(mut lexer: Lexer<'s>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        Parser {
            lexer,
            current,
            peek,
            errors: vec![],
        }
    }

    /// Parses the whole source. Always returns a program, together with every
    /// syntax error found along the way.
    pub fn parse(mut self) -> (Program, Vec<ParserError>) {
        let mut statements = vec![];

        while !self.current.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.bump();
        }

        (Program { statements }, self.errors)
    }

    /// Advances the stream.
    fn bump(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    /// If the lookahead matches, consume it and return true.
    fn check_consume(&mut self, kind: TokenKind) -> bool {
        if self.peek.is(kind) {
            self.bump();
            return true;
        }
        false
    }

    /// Like `check_consume`, but a mismatch is a syntax error.
    fn expect_peek(&mut self, expected: TokenKind) -> Option<()> {
        if self.check_consume(expected) {
            return Some(());
        }

        self.emit_error(ParserError::ExpectedToken {
            expected,
            got: self.peek.kind,
            position: self.peek.position,
        });
        None
    }

    fn emit_error(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.kind {
            TokenKind::Var => self.parse_declaration(false),
            TokenKind::Const => self.parse_declaration(true),
            TokenKind::Return => self.parse_return(),
            TokenKind::Import => self.parse_import(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `var`/`const` NAME [":" TYPE] "=" EXPR [";"]
    fn parse_declaration(&mut self, is_const: bool) -> Option<Stmt> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.current.clone());
        let type_annotation = self.parse_type_annotation();

        self.expect_peek(TokenKind::Assign)?;
        self.bump();
        let value = self.parse_expression(Precedence::Lowest);
        self.check_consume(TokenKind::Semicolon);
        let value = value?;

        let stmt = if is_const {
            StmtType::Const(name, type_annotation, value)
        } else {
            StmtType::Var(name, type_annotation, value)
        };
        Some(Stmt::new(stmt, token))
    }

    /// Consumes `: TYPE` if the lookahead is a colon. Whatever token follows the
    /// colon names the type.
    fn parse_type_annotation(&mut self) -> Option<TypeAnnotation> {
        if !self.check_consume(TokenKind::Colon) {
            return None;
        }
        self.bump();
        Some(TypeAnnotation::new(self.current.clone()))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.bump();

        let value = self.parse_expression(Precedence::Lowest);
        self.check_consume(TokenKind::Semicolon);

        Some(Stmt::new(StmtType::Return(value?), token))
    }

    fn parse_import(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.bump();

        if !self.current.is(TokenKind::String) {
            self.emit_error(ParserError::ExpectedImportPath {
                kind: self.current.kind,
                position: self.current.position,
            });
            self.check_consume(TokenKind::Semicolon);
            return None;
        }

        let path = self.current.literal.clone();
        self.check_consume(TokenKind::Semicolon);

        Some(Stmt::new(StmtType::Import(path), token))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        let expr = self.parse_expression(Precedence::Lowest);
        self.check_consume(TokenKind::Semicolon);

        Some(Stmt::new(StmtType::Expression(expr?), token))
    }

    /// Statements up to the closing brace. An unterminated block simply ends
    /// at end of input.
    fn parse_block(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = vec![];
        self.bump();

        while !self.current.is(TokenKind::RBrace) && !self.current.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.bump();
        }

        BlockStatement { token, statements }
    }

    /// Pratt parsing algo.
    pub fn parse_expression(&mut self, min_precedence: Precedence) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        while !self.peek.is(TokenKind::Semicolon) && min_precedence < Precedence::of(self.peek.kind)
        {
            let op = match ParserOperator::from_token(self.peek.kind) {
                Some(op) => op,
                None => return Some(lhs),
            };

            self.bump();
            lhs = self.parse_infix(op, lhs)?;
        }

        Some(lhs)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        let expr = match token.kind {
            TokenKind::Ident => ExprType::Identifier(Identifier::new(token.clone())),
            TokenKind::Int => match token.literal.parse::<i64>() {
                Ok(value) => ExprType::IntegerLiteral(value),
                Err(_) => {
                    self.emit_error(ParserError::InvalidInteger {
                        literal: token.literal.clone(),
                        position: token.position,
                    });
                    return None;
                }
            },
            TokenKind::String => ExprType::StringLiteral(token.literal.clone()),
            TokenKind::True => ExprType::BooleanLiteral(true),
            TokenKind::False => ExprType::BooleanLiteral(false),
            TokenKind::Bang | TokenKind::Minus => {
                let op = PrefixOperator::from_token(token.kind)?;
                self.bump();
                let right = self.parse_expression(Precedence::Prefix)?;
                ExprType::Prefix(op, Box::new(right))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression(Precedence::Lowest)?;
                self.expect_peek(TokenKind::RParen)?;
                return Some(inner);
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::Function => self.parse_function_literal()?,
            kind => {
                self.emit_error(ParserError::NoPrefixRule {
                    kind,
                    position: token.position,
                });
                return None;
            }
        };

        Some(Expr::new(expr, token))
    }

    /// Continues `lhs` with the operator that is now the current token.
    fn parse_infix(&mut self, op: ParserOperator, lhs: Expr) -> Option<Expr> {
        let token = self.current.clone();

        let expr = match op {
            ParserOperator::Infix(op) => {
                self.bump();
                let rhs = self.parse_expression(op.precedence())?;
                ExprType::Infix(op, Box::new(lhs), Box::new(rhs))
            }
            ParserOperator::Call => {
                let args = self.parse_expression_list(TokenKind::RParen)?;
                ExprType::Call(Box::new(lhs), args)
            }
            ParserOperator::Assignment => {
                let name = match lhs.as_identifier() {
                    Some(name) => name.clone(),
                    None => {
                        self.emit_error(ParserError::InvalidAssignmentTarget {
                            literal: lhs.token_literal().to_owned(),
                            position: token.position,
                        });
                        return None;
                    }
                };
                self.bump();
                let value = self.parse_expression(Precedence::Lowest)?;
                ExprType::Assignment(name, Box::new(value))
            }
        };

        Some(Expr::new(expr, token))
    }

    /// `if (COND) { ... } [else { ... }]`
    fn parse_if(&mut self) -> Option<ExprType> {
        self.expect_peek(TokenKind::LParen)?;
        self.bump();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block();

        let alternative = if self.check_consume(TokenKind::Else) {
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block())
        } else {
            None
        };

        Some(ExprType::If(Box::new(condition), consequence, alternative))
    }

    /// `function (PARAMS) [: TYPE] { ... }`
    fn parse_function_literal(&mut self) -> Option<ExprType> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_params()?;
        let return_type = self.parse_type_annotation();

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block();

        let func = FunctionLiteral {
            parameters,
            return_type,
            body,
        };
        Some(ExprType::Function(Rc::new(func)))
    }

    fn parse_function_params(&mut self) -> Option<Vec<FunctionParameter>> {
        let mut params = vec![];
        if self.check_consume(TokenKind::RParen) {
            return Some(params);
        }

        params.push(self.parse_function_param()?);
        while self.check_consume(TokenKind::Comma) {
            params.push(self.parse_function_param()?);
        }

        self.expect_peek(TokenKind::RParen)?;
        Some(params)
    }

    fn parse_function_param(&mut self) -> Option<FunctionParameter> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.current.clone());
        let type_annotation = self.parse_type_annotation();

        Some(FunctionParameter {
            name,
            type_annotation,
        })
    }

    /// Comma separated expressions up to `end`. The opening delimiter is the
    /// current token.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = vec![];
        if self.check_consume(end) {
            return Some(list);
        }

        self.bump();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.check_consume(TokenKind::Comma) {
            self.bump();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::operator::InfixOperator;
    use crate::frontend::span::CodePosition;

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = Parser::new(source).parse();
        assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
        program
    }

    fn parse_errors(source: &str) -> Vec<String> {
        let (_, errors) = Parser::new(source).parse();
        errors.iter().map(|e| e.to_string()).collect()
    }

    fn single_expr(source: &str) -> Expr {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].stmt {
            StmtType::Expression(expr) => expr.clone(),
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("a <= b < c", "((a <= b) < c)"),
            ("a < b <= c", "(a < (b <= c))"),
            ("10 % 3 * 2", "((10 % 3) * 2)"),
            ("2 + 3 * 4", "(2 + (3 * 4))"),
            ("(2 + 3) * 4", "((2 + 3) * 4)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("x = y + 1", "(x = (y + 1))"),
            ("a = b = 3", "(a = (b = 3))"),
        ];

        for (source, expected) in cases.iter() {
            let program = parse_ok(source);
            assert_eq!(program.to_string(), format!("{};", expected), "source: {}", source);
        }
    }

    #[test]
    fn test_infix_structure() {
        let expr = single_expr("5 % 2;");
        match &expr.expr {
            ExprType::Infix(InfixOperator::Modulo, lhs, rhs) => {
                assert_eq!(&lhs.expr, &ExprType::IntegerLiteral(5));
                assert_eq!(&rhs.expr, &ExprType::IntegerLiteral(2));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(expr.token_literal(), "%");
    }

    #[test]
    fn test_declarations() {
        let program = parse_ok("var x = 5; const y: int = 10; var name: string = \"bob\"");
        assert_eq!(program.statements.len(), 3);

        match &program.statements[1].stmt {
            StmtType::Const(name, Some(ty), value) => {
                assert_eq!(name.name, "y");
                assert_eq!(ty.name, "int");
                assert_eq!(value.expr, ExprType::IntegerLiteral(10));
            }
            other => panic!("unexpected {:?}", other),
        }

        match &program.statements[2].stmt {
            StmtType::Var(name, Some(ty), value) => {
                assert_eq!(name.name, "name");
                assert_eq!(ty.name, "string");
                assert_eq!(value.expr, ExprType::StringLiteral("bob".to_owned()));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            program.to_string(),
            "var x = 5;const y: int = 10;var name: string = \"bob\";"
        );
    }

    #[test]
    fn test_any_token_names_a_type() {
        let program = parse_ok("var f: function = function() { 1; }; var p: point = 1;");
        match &program.statements[1].stmt {
            StmtType::Var(_, Some(ty), _) => assert_eq!(ty.name, "point"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_return_and_import() {
        let program = parse_ok("return 5; import \"lib/math\"; import \"util.gct\"");
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.token_literal(), "return");
        assert_eq!(program.statements[1].stmt, StmtType::Import("lib/math".to_owned()));
        assert_eq!(program.statements[2].stmt, StmtType::Import("util.gct".to_owned()));
    }

    #[test]
    fn test_if_else_expression() {
        let expr = single_expr("if (x < y) { x } else { y; z }");
        match &expr.expr {
            ExprType::If(condition, consequence, Some(alternative)) => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.statements.len(), 1);
                assert_eq!(alternative.statements.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(expr.to_string(), "if ((x < y)) { x; } else { y; z; }");
    }

    #[test]
    fn test_function_literal() {
        let expr = single_expr("function(a: int, b): string { return a + b; }");
        match &expr.expr {
            ExprType::Function(func) => {
                let names: Vec<_> = func.parameters.iter().map(|p| p.name()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(
                    func.parameters[0].type_annotation.as_ref().map(|t| t.name.as_str()),
                    Some("int")
                );
                assert!(func.parameters[1].type_annotation.is_none());
                assert_eq!(func.return_type.as_ref().map(|t| t.name.as_str()), Some("string"));
                assert_eq!(func.body.statements.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            expr.to_string(),
            "function(a: int, b): string { return (a + b); }"
        );
    }

    #[test]
    fn test_function_without_params() {
        let expr = single_expr("function() { }");
        assert_eq!(expr.to_string(), "function() { }");
    }

    #[test]
    fn test_call_expression() {
        let expr = single_expr("add(1, 2 * 3, 4 + 5)");
        match &expr.expr {
            ExprType::Call(callee, args) => {
                assert_eq!(callee.to_string(), "add");
                assert_eq!(args.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }

        let expr = single_expr("function(x) { x; }(5)");
        assert!(matches!(expr.expr, ExprType::Call(_, _)));
    }

    #[test]
    fn test_expected_token_errors() {
        assert_eq!(
            parse_errors("var = 5;"),
            vec![
                "expected next token to be IDENT, got = instead at 1:5".to_owned(),
                "no prefix parse function for = found at 1:5".to_owned(),
            ]
        );

        let errors = parse_errors("var x 5;");
        assert_eq!(errors[0], "expected next token to be =, got INT instead at 1:7");
    }

    #[test]
    fn test_missing_close_paren() {
        let errors = parse_errors("(1 + 2;");
        assert_eq!(errors[0], "expected next token to be ), got ; instead at 1:7");
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse_errors("1 + 2 = 3;");
        assert_eq!(
            errors[0],
            "expected identifier on left side of assignment, got 2 at 1:7"
        );

        let errors = parse_errors("f() = 3;");
        assert_eq!(
            errors[0],
            "expected identifier on left side of assignment, got ( at 1:5"
        );
    }

    #[test]
    fn test_import_requires_string() {
        let errors = parse_errors("import math;");
        assert_eq!(errors, vec!["expected string as import path, got IDENT at 1:8".to_owned()]);
    }

    #[test]
    fn test_integer_out_of_range() {
        let errors = parse_errors("99999999999999999999;");
        assert_eq!(
            errors,
            vec!["could not parse \"99999999999999999999\" as integer at 1:1".to_owned()]
        );
    }

    #[test]
    fn test_illegal_token_has_no_prefix_rule() {
        let (_, errors) = Parser::new("var x = @;").parse();
        assert_eq!(
            errors,
            vec![ParserError::NoPrefixRule {
                kind: TokenKind::Illegal,
                position: CodePosition::new(1, 9),
            }]
        );
    }

    #[test]
    fn test_parsing_continues_after_errors() {
        let (program, errors) = Parser::new("var = 1; var ok = 2; ]; ok;").parse();
        assert!(errors.len() >= 2);
        let rendered: Vec<_> = program.statements.iter().map(|s| s.to_string()).collect();
        assert!(rendered.contains(&"var ok = 2;".to_owned()));
        assert!(rendered.contains(&"ok;".to_owned()));
    }

    #[test]
    fn test_unterminated_block_ends_at_eof() {
        let program = parse_ok("if (x) { 1");
        assert_eq!(program.to_string(), "if (x) { 1; };");
    }

    #[test]
    fn test_rendering_is_stable_under_reparse() {
        let sources = [
            "var x: int = 5 * (2 + 3);",
            "const greet = function(name: string): string { return \"Hello, \" + name; };",
            "if (a == b) { print(a); } else { b = a; }",
            "var r = (x = 1) + 2;",
            "-5 + 3; !true; !!false;",
            "const f = function(n: int): int { if (n <= 1) { return 1; } return n * f(n - 1); };",
            "import \"lib/helpers\"; helpers(1)(2);",
            "function(x) { x; }(5);",
            "a < b <= c; a <= b < c; 10 % 3 - 1;",
            "var empty = function() { };",
        ];

        for source in sources.iter() {
            let first = parse_ok(source).to_string();
            let second = parse_ok(&first).to_string();
            assert_eq!(first, second, "source: {}", source);
        }
    }
}
