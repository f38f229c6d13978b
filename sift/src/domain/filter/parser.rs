//! Recursive-descent filter parser
//!
//! ```text
//! expr      := and_expr ( OR and_expr )*
//! and_expr  := term ( AND term )*
//! term      := '(' expr ')' | predicate
//! predicate := field ( '$null' | '$nn' | op literal | '$in' list )
//! list      := '(' literal ( ',' literal )* ')' | literal
//! ```
//!
//! The parser knows nothing about fields. It only checks shape and the
//! structural limits (nesting depth, predicate count, list length).

use std::borrow::Cow;
use std::iter::Peekable;

use super::Operator;
use super::ast::{Expr, Literal, LiteralKind, RawLiteral, RawPredicate};
use super::lexer::Lexer;
use super::operator::Arity;
use super::token::{Token, TokenKind};
use crate::core::config::CompilerLimits;
use crate::domain::error::CompileError;

pub struct Parser<'a, 'l> {
    tokens: Peekable<Lexer<'a>>,
    limits: &'l CompilerLimits,
    end: usize,
    depth: usize,
    predicates: usize,
}

/// Parse decoded filter text into a raw expression tree
pub fn parse<'a>(
    src: &'a str,
    limits: &CompilerLimits,
) -> Result<Expr<RawPredicate<'a>>, CompileError> {
    Parser::new(src, limits).parse()
}

impl<'a, 'l> Parser<'a, 'l> {
    pub fn new(src: &'a str, limits: &'l CompilerLimits) -> Self {
        Self {
            tokens: Lexer::new(src).peekable(),
            limits,
            end: src.len(),
            depth: 0,
            predicates: 0,
        }
    }

    pub fn parse(mut self) -> Result<Expr<RawPredicate<'a>>, CompileError> {
        if self.peek()?.is_none() {
            return Err(CompileError::parse(0, "filter expression is empty"));
        }

        let expr = self.parse_or()?;

        match self.peek()? {
            None => Ok(expr),
            Some(tok) if tok.kind == TokenKind::RParen => {
                Err(CompileError::parse(tok.position, "unbalanced ')'"))
            }
            Some(tok) => Err(CompileError::parse(
                tok.position,
                format!("unexpected {} after expression", tok.kind.describe()),
            )),
        }
    }

    fn peek(&mut self) -> Result<Option<Token<'a>>, CompileError> {
        match self.tokens.peek() {
            Some(Ok(tok)) => Ok(Some(*tok)),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(None),
        }
    }

    fn next(&mut self) -> Result<Option<Token<'a>>, CompileError> {
        self.tokens.next().transpose()
    }

    fn next_is(&mut self, kind: TokenKind) -> Result<bool, CompileError> {
        if self.peek()?.is_some_and(|t| t.kind == kind) {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_or(&mut self) -> Result<Expr<RawPredicate<'a>>, CompileError> {
        let mut left = self.parse_and()?;
        while self.next_is(TokenKind::Or)? {
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr<RawPredicate<'a>>, CompileError> {
        let mut left = self.parse_term()?;
        while self.next_is(TokenKind::And)? {
            let right = self.parse_term()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr<RawPredicate<'a>>, CompileError> {
        let Some(tok) = self.next()? else {
            return Err(CompileError::parse(self.end, "expected a predicate or '('"));
        };

        match tok.kind {
            TokenKind::LParen => self.parse_group(tok),
            TokenKind::Ident => self.parse_predicate(tok).map(Expr::Predicate),
            other => Err(CompileError::parse(
                tok.position,
                format!("expected a field name or '(', found {}", other.describe()),
            )),
        }
    }

    fn parse_group(&mut self, open: Token<'a>) -> Result<Expr<RawPredicate<'a>>, CompileError> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(CompileError::LimitExceeded {
                limit: "filter nesting depth",
                max: self.limits.max_depth,
            });
        }

        let expr = self.parse_or()?;

        match self.next()? {
            Some(tok) if tok.kind == TokenKind::RParen => {
                self.depth -= 1;
                Ok(expr)
            }
            Some(tok) => Err(CompileError::parse(tok.position, "expected ')'")),
            None => Err(CompileError::parse(open.position, "unbalanced '('")),
        }
    }

    fn parse_predicate(&mut self, field: Token<'a>) -> Result<RawPredicate<'a>, CompileError> {
        self.predicates += 1;
        if self.predicates > self.limits.max_predicates {
            return Err(CompileError::LimitExceeded {
                limit: "filter predicate count",
                max: self.limits.max_predicates,
            });
        }

        let operator = match self.next()? {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) => op,
            other => {
                let position = other.map_or(self.end, |t| t.position);
                return Err(CompileError::parse(
                    position,
                    format!("expected an operator after field '{}'", field.lexeme),
                ));
            }
        };

        let literal = match operator.arity() {
            Arity::Nullary => None,
            Arity::Unary => Some(RawLiteral::Single(self.parse_literal(operator)?)),
            Arity::List => Some(RawLiteral::List(self.parse_list(operator)?)),
        };

        Ok(RawPredicate {
            field: field.lexeme,
            position: field.position,
            operator,
            literal,
        })
    }

    fn parse_list(&mut self, operator: Operator) -> Result<Vec<Literal<'a>>, CompileError> {
        let open = match self.peek()? {
            Some(tok) if tok.kind == TokenKind::LParen => {
                self.next()?;
                tok
            }
            _ => return Ok(vec![self.parse_literal(operator)?]),
        };

        let mut values = Vec::new();
        loop {
            values.push(self.parse_literal(operator)?);
            if values.len() > self.limits.max_in_values {
                return Err(CompileError::LimitExceeded {
                    limit: "$in value count",
                    max: self.limits.max_in_values,
                });
            }

            match self.next()? {
                Some(tok) if tok.kind == TokenKind::Comma => continue,
                Some(tok) if tok.kind == TokenKind::RParen => return Ok(values),
                Some(tok) => {
                    return Err(CompileError::parse(
                        tok.position,
                        "expected ',' or ')' in value list",
                    ));
                }
                None => return Err(CompileError::parse(open.position, "unbalanced '('")),
            }
        }
    }

    fn parse_literal(&mut self, operator: Operator) -> Result<Literal<'a>, CompileError> {
        let Some(tok) = self.next()? else {
            return Err(CompileError::parse(
                self.end,
                format!("missing value for operator {}", operator),
            ));
        };

        literal_from(tok).ok_or_else(|| {
            CompileError::parse(
                tok.position,
                format!(
                    "expected a value for operator {}, found {}",
                    operator,
                    tok.kind.describe()
                ),
            )
        })
    }
}

fn literal_from(tok: Token<'_>) -> Option<Literal<'_>> {
    let kind = match tok.kind {
        TokenKind::LiteralString => LiteralKind::String,
        TokenKind::LiteralNumber => LiteralKind::Number,
        TokenKind::LiteralTimestamp => LiteralKind::Timestamp,
        TokenKind::Ident
            if tok.lexeme.eq_ignore_ascii_case("true")
                || tok.lexeme.eq_ignore_ascii_case("false") =>
        {
            LiteralKind::Boolean
        }
        _ => return None,
    };

    let text = if tok.lexeme.contains("''") {
        Cow::Owned(tok.lexeme.replace("''", "'"))
    } else {
        Cow::Borrowed(tok.lexeme)
    };

    Some(Literal {
        kind,
        text,
        position: tok.position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> CompilerLimits {
        CompilerLimits::default()
    }

    fn parse_ok(src: &str) -> Expr<RawPredicate<'_>> {
        parse(src, &limits()).unwrap()
    }

    fn parse_err(src: &str) -> CompileError {
        parse(src, &limits()).unwrap_err()
    }

    /// Compact rendering of the tree shape
    fn shape(expr: &Expr<RawPredicate<'_>>) -> String {
        match expr {
            Expr::Predicate(p) => p.field.to_string(),
            Expr::And(l, r) => format!("({} AND {})", shape(l), shape(r)),
            Expr::Or(l, r) => format!("({} OR {})", shape(l), shape(r)),
        }
    }

    #[test]
    fn test_single_predicate() {
        let expr = parse_ok("name $sw 'Jo'");
        let Expr::Predicate(p) = expr else {
            panic!("expected predicate");
        };
        assert_eq!(p.field, "name");
        assert_eq!(p.position, 0);
        assert_eq!(p.operator, Operator::StartWith);
        let Some(RawLiteral::Single(lit)) = p.literal else {
            panic!("expected single literal");
        };
        assert_eq!(lit.kind, LiteralKind::String);
        assert_eq!(lit.text, "Jo");
        assert_eq!(lit.position, 9);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(shape(&parse_ok("a=1 AND b=2 OR c=3")), "((a AND b) OR c)");
        assert_eq!(shape(&parse_ok("a=1 OR b=2 AND c=3")), "(a OR (b AND c))");
    }

    #[test]
    fn test_connectives_are_left_associative() {
        assert_eq!(shape(&parse_ok("a=1 AND b=2 AND c=3")), "((a AND b) AND c)");
        assert_eq!(shape(&parse_ok("a=1 or b=2 or c=3")), "((a OR b) OR c)");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            shape(&parse_ok("a=1 AND (b=2 OR c=3)")),
            "(a AND (b OR c))"
        );
        assert_eq!(shape(&parse_ok("((a $null))")), "a");
    }

    #[test]
    fn test_nullary_operators_take_no_literal() {
        let Expr::And(l, r) = parse_ok("a $null AND b $nn") else {
            panic!("expected AND");
        };
        assert!(matches!(*l, Expr::Predicate(RawPredicate { operator: Operator::Null, literal: None, .. })));
        assert!(matches!(*r, Expr::Predicate(RawPredicate { operator: Operator::NotNull, literal: None, .. })));
    }

    #[test]
    fn test_in_list() {
        let Expr::Predicate(p) = parse_ok("status $in ('a', 'b','c')") else {
            panic!("expected predicate");
        };
        let Some(RawLiteral::List(values)) = p.literal else {
            panic!("expected list");
        };
        let texts: Vec<&str> = values.iter().map(|l| l.text.as_ref()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_in_single_value_is_one_element_list() {
        let Expr::Predicate(p) = parse_ok("age $in 5") else {
            panic!("expected predicate");
        };
        assert!(matches!(p.literal, Some(RawLiteral::List(ref v)) if v.len() == 1));
    }

    #[test]
    fn test_doubled_quote_is_unescaped() {
        let Expr::Predicate(p) = parse_ok("name = 'O''Brien'") else {
            panic!("expected predicate");
        };
        let Some(RawLiteral::Single(lit)) = p.literal else {
            panic!("expected single literal");
        };
        assert_eq!(lit.text, "O'Brien");
        assert_eq!(lit.display(), "'O''Brien'");
    }

    #[test]
    fn test_boolean_words_are_literals() {
        let Expr::Predicate(p) = parse_ok("active = TRUE") else {
            panic!("expected predicate");
        };
        assert!(matches!(
            p.literal,
            Some(RawLiteral::Single(Literal { kind: LiteralKind::Boolean, .. }))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_err(""), CompileError::parse(0, "filter expression is empty"));
        assert_eq!(parse_err("   "), CompileError::parse(0, "filter expression is empty"));
    }

    #[test]
    fn test_missing_literal() {
        assert_eq!(parse_err("name ="), CompileError::parse(6, "missing value for operator ="));
        assert_eq!(
            parse_err("name = AND age = 1"),
            CompileError::parse(7, "expected a value for operator =, found AND")
        );
    }

    #[test]
    fn test_field_compared_to_field_is_rejected() {
        assert!(matches!(parse_err("name = other"), CompileError::Parse { position: 7, .. }));
    }

    #[test]
    fn test_missing_operator() {
        assert_eq!(
            parse_err("name 'Jo'"),
            CompileError::parse(5, "expected an operator after field 'name'")
        );
        assert_eq!(
            parse_err("name"),
            CompileError::parse(4, "expected an operator after field 'name'")
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(parse_err("(a $null"), CompileError::parse(0, "unbalanced '('"));
        assert_eq!(parse_err("a $null)"), CompileError::parse(7, "unbalanced ')'"));
        assert_eq!(parse_err("(a $null b $nn)"), CompileError::parse(9, "expected ')'"));
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse_err("a $null b $nn"),
            CompileError::parse(8, "unexpected identifier after expression")
        );
        assert!(matches!(parse_err("a $null AND"), CompileError::Parse { position: 11, .. }));
        assert!(matches!(parse_err("AND a $null"), CompileError::Parse { position: 0, .. }));
    }

    #[test]
    fn test_malformed_in_lists() {
        assert!(matches!(parse_err("a $in ()"), CompileError::Parse { position: 7, .. }));
        assert!(matches!(parse_err("a $in (1 2)"), CompileError::Parse { position: 9, .. }));
        assert_eq!(parse_err("a $in (1, 2"), CompileError::parse(6, "unbalanced '('"));
    }

    #[test]
    fn test_lex_errors_surface() {
        assert!(matches!(parse_err("a = 1 AND b # 2"), CompileError::Lex { position: 12, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let limits = CompilerLimits {
            max_depth: 2,
            ..CompilerLimits::default()
        };
        assert!(parse("((a $null))", &limits).is_ok());
        assert_eq!(
            parse("(((a $null)))", &limits).unwrap_err(),
            CompileError::LimitExceeded {
                limit: "filter nesting depth",
                max: 2
            }
        );
        assert!(parse("(a $null) AND (b $null) AND ((c $null))", &limits).is_ok());
    }

    #[test]
    fn test_predicate_limit() {
        let limits = CompilerLimits {
            max_predicates: 2,
            ..CompilerLimits::default()
        };
        assert!(parse("a $null AND b $null", &limits).is_ok());
        assert!(matches!(
            parse("a $null AND b $null OR c $null", &limits),
            Err(CompileError::LimitExceeded { max: 2, .. })
        ));
    }

    #[test]
    fn test_in_value_limit() {
        let limits = CompilerLimits {
            max_in_values: 3,
            ..CompilerLimits::default()
        };
        assert!(parse("a $in (1, 2, 3)", &limits).is_ok());
        assert!(matches!(
            parse("a $in (1, 2, 3, 4)", &limits),
            Err(CompileError::LimitExceeded { limit: "$in value count", max: 3 })
        ));
    }
}
