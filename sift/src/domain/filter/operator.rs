//! Filter operators
//!
//! The symbols are part of the client-facing filter syntax and must not
//! change. Schema files may name an operator either by its symbol or by its
//! upper-case name (`"$sw"` or `"START_WITH"`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::schema::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    #[serde(alias = "=")]
    Equal,
    #[serde(alias = "!=")]
    NotEqual,
    #[serde(alias = ">")]
    Greater,
    #[serde(alias = ">=")]
    GreaterOrEqual,
    #[serde(alias = "<")]
    Less,
    #[serde(alias = "<=")]
    LessOrEqual,
    #[serde(alias = "$sw")]
    StartWith,
    #[serde(alias = "$ew")]
    EndWith,
    #[serde(alias = "$ct")]
    Contains,
    #[serde(alias = "$null")]
    Null,
    #[serde(alias = "$nn")]
    NotNull,
    #[serde(alias = "$in")]
    In,
}

/// How many literals an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Nullary,
    Unary,
    List,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::LessOrEqual,
        Operator::StartWith,
        Operator::EndWith,
        Operator::Contains,
        Operator::Null,
        Operator::NotNull,
        Operator::In,
    ];

    /// Filter-syntax spelling
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::StartWith => "$sw",
            Operator::EndWith => "$ew",
            Operator::Contains => "$ct",
            Operator::Null => "$null",
            Operator::NotNull => "$nn",
            Operator::In => "$in",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Equal => "EQUAL",
            Operator::NotEqual => "NOT_EQUAL",
            Operator::Greater => "GREATER",
            Operator::GreaterOrEqual => "GREATER_OR_EQUAL",
            Operator::Less => "LESS",
            Operator::LessOrEqual => "LESS_OR_EQUAL",
            Operator::StartWith => "START_WITH",
            Operator::EndWith => "END_WITH",
            Operator::Contains => "CONTAINS",
            Operator::Null => "NULL",
            Operator::NotNull => "NOT_NULL",
            Operator::In => "IN",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::Null | Operator::NotNull => Arity::Nullary,
            Operator::In => Arity::List,
            _ => Arity::Unary,
        }
    }

    /// LIKE-based operators
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::StartWith | Operator::EndWith | Operator::Contains
        )
    }

    fn is_range(self) -> bool {
        matches!(
            self,
            Operator::Greater | Operator::GreaterOrEqual | Operator::Less | Operator::LessOrEqual
        )
    }

    /// Whether the operator makes sense for a field of the given type
    pub fn applies_to(self, value_type: ValueType) -> bool {
        if self.is_pattern() {
            return value_type == ValueType::String;
        }
        if self.is_range() {
            return value_type != ValueType::Boolean;
        }
        true
    }

    /// SQL comparison operator for binary comparisons
    pub(crate) fn comparison_sql(self) -> Option<&'static str> {
        match self {
            Operator::Equal => Some("="),
            Operator::NotEqual => Some("<>"),
            Operator::Greater => Some(">"),
            Operator::GreaterOrEqual => Some(">="),
            Operator::Less => Some("<"),
            Operator::LessOrEqual => Some("<="),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compact set of operators allowed on a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorSet(u16);

impl OperatorSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every operator that applies to `value_type`
    pub fn all_for(value_type: ValueType) -> Self {
        Operator::ALL
            .into_iter()
            .filter(|op| op.applies_to(value_type))
            .collect()
    }

    fn bit(op: Operator) -> u16 {
        1 << (op as u16)
    }

    pub fn insert(&mut self, op: Operator) {
        self.0 |= Self::bit(op);
    }

    pub fn contains(&self, op: Operator) -> bool {
        self.0 & Self::bit(op) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        Operator::ALL.into_iter().filter(|op| self.contains(*op))
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = Operator>>(iter: I) -> Self {
        let mut set = Self::empty();
        for op in iter {
            set.insert(op);
        }
        set
    }
}
