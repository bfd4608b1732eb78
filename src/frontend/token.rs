use super::span::CodePosition;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers and literals.
    Ident,
    Int,
    String,

    // Operators.
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Percent,
    Lt,
    Gt,
    Eq,
    NotEq,
    LtEq,
    GtEq,

    // Delimiters.
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords.
    Function,
    Var,
    Const,
    If,
    Else,
    Return,
    True,
    False,
    Import,

    // Type keywords.
    TypeInt,
    TypeFloat,
    TypeBool,
    TypeString,
    TypeChar,
}

impl TokenKind {
    /// Maps an identifier-shaped word to its keyword kind, if any.
    pub fn lookup_ident(word: &str) -> TokenKind {
        match word {
            "function" => TokenKind::Function,
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "import" => TokenKind::Import,
            "int" => TokenKind::TypeInt,
            "float" => TokenKind::TypeFloat,
            "bool" => TokenKind::TypeBool,
            "string" => TokenKind::TypeString,
            "char" => TokenKind::TypeChar,
            _ => TokenKind::Ident,
        }
    }

    /// Name of the category as it appears in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Function => "FUNCTION",
            TokenKind::Var => "VAR",
            TokenKind::Const => "CONST",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Import => "IMPORT",
            TokenKind::TypeInt => "INT_TYPE",
            TokenKind::TypeFloat => "FLOAT_TYPE",
            TokenKind::TypeBool => "BOOL_TYPE",
            TokenKind::TypeString => "STRING_TYPE",
            TokenKind::TypeChar => "CHAR_TYPE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: CodePosition,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: CodePosition) -> Self {
        Token {
            kind,
            literal: literal.into(),
            position,
        }
    }

    /// Token that stands in for a node with no source token of its own.
    #[cfg(test)]
    pub fn synthetic(kind: TokenKind, literal: &str) -> Self {
        Token::new(kind, literal, CodePosition::default())
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
