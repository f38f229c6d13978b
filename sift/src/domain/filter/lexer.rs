//! Filter tokenizer
//!
//! Single pass over the decoded text, producing tokens lazily. The first
//! error ends the stream.

use super::Operator;
use super::token::{Token, TokenKind};
use crate::domain::error::CompileError;
use crate::utils::time::{looks_like_timestamp, timestamp_prefix_len};

const KEYWORDS: [&str; 4] = ["and", "or", "true", "false"];

/// Words that cannot be used as field names
pub fn is_reserved_word(word: &str) -> bool {
    KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k))
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            done: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        self.pos = end;
        Token {
            kind,
            lexeme: &self.src[start..end],
            position: start,
        }
    }

    fn lex_token(&mut self) -> Result<Token<'a>, CompileError> {
        let start = self.pos;
        let Some(b) = self.peek_byte(0) else {
            return Err(CompileError::lex(start, "unexpected end of input"));
        };

        match b {
            b'(' => Ok(self.token(TokenKind::LParen, start, start + 1)),
            b')' => Ok(self.token(TokenKind::RParen, start, start + 1)),
            b',' => Ok(self.token(TokenKind::Comma, start, start + 1)),
            b'=' => Ok(self.token(TokenKind::Op(Operator::Equal), start, start + 1)),
            b'!' if self.peek_byte(1) == Some(b'=') => {
                Ok(self.token(TokenKind::Op(Operator::NotEqual), start, start + 2))
            }
            b'>' | b'<' => Ok(self.lex_comparison(b, start)),
            b'$' => self.lex_named_operator(start),
            b'\'' => self.lex_quoted(start),
            b'-' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.lex_number(start)
            }
            b'0'..=b'9' => self.lex_number_or_timestamp(start),
            b if b.is_ascii_alphabetic() || b == b'_' => Ok(self.lex_word(start)),
            _ => {
                let found = self.src[start..].chars().next().unwrap_or_default();
                Err(CompileError::lex(
                    start,
                    format!("unexpected character '{}'", found),
                ))
            }
        }
    }

    fn lex_comparison(&mut self, first: u8, start: usize) -> Token<'a> {
        let or_equal = self.peek_byte(1) == Some(b'=');
        let op = match (first, or_equal) {
            (b'>', true) => Operator::GreaterOrEqual,
            (b'>', false) => Operator::Greater,
            (_, true) => Operator::LessOrEqual,
            (_, false) => Operator::Less,
        };
        let len = if or_equal { 2 } else { 1 };
        self.token(TokenKind::Op(op), start, start + len)
    }

    fn lex_named_operator(&mut self, start: usize) -> Result<Token<'a>, CompileError> {
        let end = self.scan_while(start + 1, |b| b.is_ascii_alphabetic());
        let symbol = &self.src[start..end];
        match Operator::from_symbol(symbol) {
            Some(op) => Ok(self.token(TokenKind::Op(op), start, end)),
            None => Err(CompileError::lex(
                start,
                format!("unknown operator '{}'", symbol),
            )),
        }
    }

    /// `'...'` with `''` as an escaped quote
    fn lex_quoted(&mut self, start: usize) -> Result<Token<'a>, CompileError> {
        let bytes = self.bytes();
        let mut i = start + 1;
        loop {
            match bytes.get(i) {
                None => {
                    return Err(CompileError::lex(start, "unterminated string literal"));
                }
                Some(b'\'') if bytes.get(i + 1) == Some(&b'\'') => i += 2,
                Some(b'\'') => break,
                Some(_) => i += 1,
            }
        }
        let content = &self.src[start + 1..i];
        let kind = if looks_like_timestamp(content) {
            TokenKind::LiteralTimestamp
        } else {
            TokenKind::LiteralString
        };
        self.pos = i + 1;
        Ok(Token {
            kind,
            lexeme: content,
            position: start,
        })
    }

    fn lex_number_or_timestamp(&mut self, start: usize) -> Result<Token<'a>, CompileError> {
        match timestamp_prefix_len(&self.src[start..]) {
            Some(len) => {
                let end = start + len;
                self.expect_delimiter(end, "timestamp")?;
                Ok(self.token(TokenKind::LiteralTimestamp, start, end))
            }
            None => self.lex_number(start),
        }
    }

    /// `-?digits(.digits)?`
    fn lex_number(&mut self, start: usize) -> Result<Token<'a>, CompileError> {
        let digits_from = if self.bytes()[start] == b'-' {
            start + 1
        } else {
            start
        };
        let mut end = self.scan_while(digits_from, |b| b.is_ascii_digit());
        if self.bytes().get(end) == Some(&b'.') {
            let fraction_end = self.scan_while(end + 1, |b| b.is_ascii_digit());
            if fraction_end == end + 1 {
                return Err(CompileError::lex(start, "malformed number"));
            }
            end = fraction_end;
        }
        self.expect_delimiter(end, "number")?;
        Ok(self.token(TokenKind::LiteralNumber, start, end))
    }

    fn lex_word(&mut self, start: usize) -> Token<'a> {
        let end = self.scan_while(start, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
        let word = &self.src[start..end];
        let kind = if word.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else {
            TokenKind::Ident
        };
        self.token(kind, start, end)
    }

    /// A literal must not run straight into identifier characters
    fn expect_delimiter(&self, end: usize, what: &str) -> Result<(), CompileError> {
        match self.bytes().get(end) {
            Some(b) if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.' || *b == b'-' => Err(
                CompileError::lex(self.pos, format!("malformed {}", what)),
            ),
            _ => Ok(()),
        }
    }

    fn scan_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let bytes = self.bytes();
        let mut i = from;
        while i < bytes.len() && pred(bytes[i]) {
            i += 1;
        }
        i
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.skip_whitespace();
        if self.pos >= self.src.len() {
            self.done = true;
            return None;
        }
        let result = self.lex_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Tokenize the whole text eagerly
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, CompileError> {
    Lexer::new(src).collect()
}
