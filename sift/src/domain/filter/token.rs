//! Filter tokens

use super::Operator;

/// A single unit of filter text with its byte position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text of the token. For quoted literals this is the content
    /// between the quotes, with doubled quotes still in place.
    pub lexeme: &'a str,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Op(Operator),
    LiteralString,
    LiteralNumber,
    LiteralTimestamp,
    And,
    Or,
    LParen,
    RParen,
    Comma,
}

impl TokenKind {
    /// Human-readable description for error messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Op(_) => "operator",
            TokenKind::LiteralString => "string literal",
            TokenKind::LiteralNumber => "number",
            TokenKind::LiteralTimestamp => "timestamp",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
        }
    }
}
