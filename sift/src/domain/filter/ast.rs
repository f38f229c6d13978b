//! Filter expression tree

use std::borrow::Cow;

use super::Operator;

/// Boolean expression over leaf predicates. `P` is the raw predicate after
/// parsing and the resolved predicate after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<P> {
    Predicate(P),
    And(Box<Expr<P>>, Box<Expr<P>>),
    Or(Box<Expr<P>>, Box<Expr<P>>),
}

impl<P> Expr<P> {
    pub fn and(left: Self, right: Self) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Self, right: Self) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Number of leaf predicates
    pub fn predicate_count(&self) -> usize {
        match self {
            Expr::Predicate(_) => 1,
            Expr::And(l, r) | Expr::Or(l, r) => l.predicate_count() + r.predicate_count(),
        }
    }

    /// Rebuild the tree with every leaf mapped, stopping at the first error
    pub fn try_map<Q, E>(self, f: &mut impl FnMut(P) -> Result<Q, E>) -> Result<Expr<Q>, E> {
        Ok(match self {
            Expr::Predicate(p) => Expr::Predicate(f(p)?),
            Expr::And(l, r) => Expr::and(l.try_map(f)?, r.try_map(f)?),
            Expr::Or(l, r) => Expr::or(l.try_map(f)?, r.try_map(f)?),
        })
    }
}

/// Predicate as written, naming its field by logical name
#[derive(Debug, Clone, PartialEq)]
pub struct RawPredicate<'a> {
    pub field: &'a str,
    pub position: usize,
    pub operator: Operator,
    pub literal: Option<RawLiteral<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawLiteral<'a> {
    Single(Literal<'a>),
    List(Vec<Literal<'a>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Number,
    Timestamp,
    Boolean,
}

/// Untyped literal. `text` has quotes removed and `''` unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal<'a> {
    pub kind: LiteralKind,
    pub text: Cow<'a, str>,
    pub position: usize,
}

impl Literal<'_> {
    /// Literal as it would be written in filter text
    pub fn display(&self) -> String {
        match self.kind {
            LiteralKind::String => format!("'{}'", self.text.replace('\'', "''")),
            _ => self.text.to_string(),
        }
    }
}
