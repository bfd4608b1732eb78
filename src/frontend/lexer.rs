use super::cursor::Cursor;
use super::span::CodePosition;
use super::token::{Token, TokenKind};

/// One-pass scanner. Never fails: unknown input becomes an `Illegal` token.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Rewinds to the start of the source.
    pub fn reset(&mut self) {
        self.cursor = Cursor::new(self.source);
    }

    /// Returns the next token. Keeps returning `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let position = self.cursor.position();
        let (start_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Token::new(TokenKind::Eof, "", position),
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            // Potentially two character tokens.
            '=' => self.look_for_eq_sign(TokenKind::Assign, TokenKind::Eq),
            '!' => self.look_for_eq_sign(TokenKind::Bang, TokenKind::NotEq),
            '<' => self.look_for_eq_sign(TokenKind::Lt, TokenKind::LtEq),
            '>' => self.look_for_eq_sign(TokenKind::Gt, TokenKind::GtEq),

            '"' => return self.lex_string(start_idx, position),

            _ if ch.is_ascii_digit() => {
                self.cursor.take_while(|c| c.is_ascii_digit());
                TokenKind::Int
            }

            _ if is_ident_start(ch) => {
                self.cursor.take_while(is_ident_char);
                let word = self.cursor.slice_from(start_idx);
                return Token::new(TokenKind::lookup_ident(word), word, position);
            }

            _ => TokenKind::Illegal,
        };

        Token::new(kind, self.cursor.slice_from(start_idx), position)
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.take_while(|ch| ch.is_whitespace());

            let mut lookahead = self.cursor.clone();
            if lookahead.take_if('/') && lookahead.take_if('/') {
                self.cursor.take_until(|ch| ch == '\n');
            } else {
                return;
            }
        }
    }

    /// Checks if next char is '='. If so, consume it and return `with_eq`.
    fn look_for_eq_sign(&mut self, single: TokenKind, with_eq: TokenKind) -> TokenKind {
        if self.cursor.take_if('=') {
            with_eq
        } else {
            single
        }
    }

    /// Scans up to the closing quote. The literal excludes both quotes.
    fn lex_string(&mut self, quote_idx: usize, position: CodePosition) -> Token {
        let content_start = quote_idx + 1;
        self.cursor.take_until(|ch| ch == '"');
        let content = self.cursor.slice_from(content_start);

        if self.cursor.take_if('"') {
            Token::new(TokenKind::String, content, position)
        } else {
            Token::new(TokenKind::Illegal, self.cursor.slice_from(quote_idx), position)
        }
    }

    /// Returns an iterator over every token, ending with a single `Eof`.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator {
            lexer: self,
            finished: false,
        }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
    finished: bool,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.lexer.next_token();
        if token.is(TokenKind::Eof) {
            self.finished = true;
        }

        Some(token)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
