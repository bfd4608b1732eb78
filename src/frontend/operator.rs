use super::token::TokenKind;

use std::fmt;

/// Binding power of an operator, lowest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    // Lowest precedence
    Lowest,
    Equality,
    Relational,
    RelationalEq,
    Additive,
    Multiplicative,
    Prefix,
    Call,
    Assignment, // Highest precedence
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Negate,
    LogicalNot,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    EqualTo,
    NotEqualTo,
    LessThan,
    GreaterThan,
    LessEq,
    GreaterEq,
}

/// Everything that can continue an expression after its left operand.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParserOperator {
    Infix(InfixOperator),
    Call,
    Assignment,
}

impl PrefixOperator {
    pub fn from_token(kind: TokenKind) -> Option<PrefixOperator> {
        let op = match kind {
            TokenKind::Minus => PrefixOperator::Negate,
            TokenKind::Bang => PrefixOperator::LogicalNot,
            _ => return None,
        };

        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOperator::LogicalNot => "!",
            PrefixOperator::Negate => "-",
        }
    }
}

impl InfixOperator {
    pub fn from_token(kind: TokenKind) -> Option<InfixOperator> {
        let op = match kind {
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Subtract,
            TokenKind::Asterisk => InfixOperator::Multiply,
            TokenKind::Slash => InfixOperator::Divide,
            TokenKind::Percent => InfixOperator::Modulo,
            TokenKind::Eq => InfixOperator::EqualTo,
            TokenKind::NotEq => InfixOperator::NotEqualTo,
            TokenKind::Lt => InfixOperator::LessThan,
            TokenKind::Gt => InfixOperator::GreaterThan,
            TokenKind::LtEq => InfixOperator::LessEq,
            TokenKind::GtEq => InfixOperator::GreaterEq,
            _ => return None,
        };

        Some(op)
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            InfixOperator::EqualTo | InfixOperator::NotEqualTo => Precedence::Equality,
            InfixOperator::LessThan | InfixOperator::GreaterThan => Precedence::Relational,
            InfixOperator::LessEq | InfixOperator::GreaterEq => Precedence::RelationalEq,
            InfixOperator::Add | InfixOperator::Subtract => Precedence::Additive,
            InfixOperator::Multiply | InfixOperator::Divide | InfixOperator::Modulo => {
                Precedence::Multiplicative
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "!=",
            InfixOperator::LessThan => "<",
            InfixOperator::GreaterThan => ">",
            InfixOperator::LessEq => "<=",
            InfixOperator::GreaterEq => ">=",
        }
    }
}

impl ParserOperator {
    pub fn from_token(kind: TokenKind) -> Option<ParserOperator> {
        if let Some(op) = InfixOperator::from_token(kind) {
            return Some(ParserOperator::Infix(op));
        }

        match kind {
            TokenKind::LParen => Some(ParserOperator::Call),
            TokenKind::Assign => Some(ParserOperator::Assignment),
            _ => None,
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ParserOperator::Infix(op) => op.precedence(),
            ParserOperator::Call => Precedence::Call,
            ParserOperator::Assignment => Precedence::Assignment,
        }
    }
}

impl Precedence {
    /// Binding power of a token in infix position. Tokens without an infix
    /// rule bind at `Lowest`, which stops the expression loop.
    pub fn of(kind: TokenKind) -> Precedence {
        ParserOperator::from_token(kind).map_or(Precedence::Lowest, |op| op.precedence())
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
