//! Hand-written byte-cursor scanner.
//!
//! No regular expressions and no lexer generator: each token kind is
//! recognized by a small dedicated scan routine, mirroring the structure
//! of a classic recursive-descent lexer.

use bir_base::{Interner, Position, Symbol};

use crate::error::LexError;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    bytes: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    interner: &'a mut Interner,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Lexer {
            bytes: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
            interner,
        }
    }

    /// Scans the entire source into a token stream, terminated by `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.position)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn simple(&mut self, kind: TokenKind, position: Position) -> Token {
        self.advance();
        Token::new(kind, Symbol::EMPTY, position)
    }

    fn maybe_assign(
        &mut self,
        plain: TokenKind,
        with_eq: TokenKind,
        position: Position,
    ) -> Token {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            Token::new(with_eq, Symbol::EMPTY, position)
        } else {
            Token::new(plain, Symbol::EMPTY, position)
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let position = self.current_position();
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, Symbol::EMPTY, position));
        };

        let token = match ch {
            b'+' => self.maybe_assign(TokenKind::Plus, TokenKind::AddAssign, position),
            b'-' => self.maybe_assign(TokenKind::Minus, TokenKind::SubtractAssign, position),
            b'*' => self.maybe_assign(TokenKind::Multiply, TokenKind::MultiplyAssign, position),
            b'/' => self.maybe_assign(TokenKind::Divide, TokenKind::DivideAssign, position),
            b'=' => self.maybe_assign(TokenKind::Assign, TokenKind::Equal, position),
            b'<' => self.maybe_assign(TokenKind::Less, TokenKind::LessEqual, position),
            b'>' => self.maybe_assign(TokenKind::Greater, TokenKind::GreaterEqual, position),
            b'!' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::Different, Symbol::EMPTY, position)
                } else {
                    return Err(LexError::UnexpectedChar { ch: '!', position });
                }
            }
            b'(' => self.simple(TokenKind::OpenParen, position),
            b')' => self.simple(TokenKind::CloseParen, position),
            b'{' => self.simple(TokenKind::OpenBrace, position),
            b'}' => self.simple(TokenKind::CloseBrace, position),
            b'[' => self.simple(TokenKind::OpenBracket, position),
            b']' => self.simple(TokenKind::CloseBracket, position),
            b',' => self.simple(TokenKind::Comma, position),
            b'.' => self.simple(TokenKind::Dot, position),
            b':' => {
                self.advance();
                if self.peek() == Some(b':') {
                    self.advance();
                    Token::new(TokenKind::DoubleColon, Symbol::EMPTY, position)
                } else {
                    Token::new(TokenKind::Colon, Symbol::EMPTY, position)
                }
            }
            b'"' => self.scan_string(position)?,
            b'0'..=b'9' => self.scan_number(position)?,
            _ if is_ident_start(ch) => self.scan_identifier(position),
            _ => {
                return Err(LexError::UnexpectedChar {
                    ch: ch as char,
                    position,
                })
            }
        };

        Ok(token)
    }

    fn scan_string(&mut self, position: Position) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let start = self.position;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { position }),
                Some(b'"') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("");
        let symbol = self.interner.intern(text);
        self.advance(); // closing quote
        Ok(Token::new(TokenKind::StringLiteral, symbol, position))
    }

    fn scan_number(&mut self, position: Position) -> Result<Token, LexError> {
        let start = self.position;
        let leading_zero = self.peek() == Some(b'0');
        self.advance();

        let mut is_float = false;
        let mut saw_digit_after_zero = false;

        loop {
            match self.peek() {
                Some(b'0'..=b'9') => {
                    if leading_zero && !is_float {
                        saw_digit_after_zero = true;
                    }
                    self.advance();
                }
                Some(b'.') => {
                    if is_float {
                        return Err(LexError::MalformedNumber { position });
                    }
                    is_float = true;
                    self.advance();
                }
                _ => break,
            }
        }

        if leading_zero && saw_digit_after_zero {
            return Err(LexError::LeadingZero { position });
        }

        let text = std::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("");
        let symbol = self.interner.intern(text);
        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        Ok(Token::new(kind, symbol, position))
    }

    fn scan_identifier(&mut self, position: Position) -> Token {
        let start = self.position;
        self.advance();
        while let Some(ch) = self.peek() {
            if is_ident_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.position]).unwrap_or("");
        if let Some(keyword) = TokenKind::keyword(text) {
            Token::new(keyword, Symbol::EMPTY, position)
        } else {
            let symbol = self.interner.intern(text);
            Token::new(TokenKind::Identifier, symbol, position)
        }
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch == b'_' || ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(src, &mut interner);
        lexer.tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_arithmetic_and_compound_assign() {
        assert_eq!(
            kinds("+ - * / += -= *= /="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Multiply,
                TokenKind::Divide,
                TokenKind::AddAssign,
                TokenKind::SubtractAssign,
                TokenKind::MultiplyAssign,
                TokenKind::DivideAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_comparisons() {
        assert_eq!(
            kinds("< <= > >= == != ="),
            vec![
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Equal,
                TokenKind::Different,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_keywords_not_identifiers() {
        assert_eq!(
            kinds("if else while for in struct interface implement"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::For,
                TokenKind::In,
                TokenKind::Struct,
                TokenKind::Interface,
                TokenKind::Implement,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_identifier_with_underscore_and_digits() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("_foo_42", &mut interner);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(interner.resolve(tokens[0].text), "_foo_42");
    }

    #[test]
    fn scans_int_and_float_literals() {
        assert_eq!(
            kinds("42 3.14"),
            vec![TokenKind::IntLiteral, TokenKind::FloatLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn rejects_leading_zero_followed_by_digits() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("007", &mut interner);
        assert!(matches!(lexer.tokenize(), Err(LexError::LeadingZero { .. })));
    }

    #[test]
    fn allows_bare_zero() {
        assert_eq!(kinds("0"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
    }

    #[test]
    fn allows_zero_point_something() {
        assert_eq!(kinds("0.5"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn rejects_second_decimal_point() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("1.2.3", &mut interner);
        assert!(matches!(lexer.tokenize(), Err(LexError::MalformedNumber { .. })));
    }

    #[test]
    fn scans_string_literal() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(r#""hello world""#, &mut interner);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(interner.resolve(tokens[0].text), "hello world");
    }

    #[test]
    fn rejects_unterminated_string() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("\"unterminated", &mut interner);
        assert!(matches!(
            lexer.tokenize(),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("a\nb", &mut interner);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens[0].position.line, 1);
        assert_eq!(tokens[1].position.line, 2);
        assert_eq!(tokens[1].position.column, 1);
    }

    #[test]
    fn rejects_unknown_character() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("@", &mut interner);
        assert!(matches!(lexer.tokenize(), Err(LexError::UnexpectedChar { .. })));
    }
}
