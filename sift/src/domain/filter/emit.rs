//! Render a validated tree into a parameterized SQL fragment
//!
//! The fragment uses `?` for every placeholder. Dialects with numbered
//! placeholders re-render it with [`CompiledCondition::render`].

use serde::Serialize;

use super::Operator;
use super::ast::Expr;
use super::validate::{Operand, Predicate};
use super::value::TypedValue;
use crate::data::sql::SqlDialect;

/// Parameterized condition. Placeholders in `fragment` correspond
/// one-to-one, left to right, with `values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledCondition {
    pub fragment: String,
    pub values: Vec<TypedValue>,
}

impl CompiledCondition {
    pub fn placeholder_count(&self) -> usize {
        self.fragment.matches('?').count()
    }

    /// Fragment with placeholders in the dialect's syntax, numbered from
    /// `first_index`
    pub fn render(&self, dialect: &dyn SqlDialect, first_index: usize) -> String {
        let mut out = String::with_capacity(self.fragment.len());
        let mut index = first_index;
        for c in self.fragment.chars() {
            if c == '?' {
                out.push_str(&dialect.placeholder(index));
                index += 1;
            } else {
                out.push(c);
            }
        }
        out
    }
}

/// Render the tree, collecting bound values left to right
pub fn emit(expr: &Expr<Predicate<'_>>) -> CompiledCondition {
    let mut values = Vec::new();
    let fragment = build_expr(expr, &mut values);
    CompiledCondition { fragment, values }
}

fn build_expr(expr: &Expr<Predicate<'_>>, values: &mut Vec<TypedValue>) -> String {
    match expr {
        Expr::Predicate(p) => build_predicate(p, values),
        Expr::And(l, r) => {
            let left = build_expr(l, values);
            format!("({} AND {})", left, build_expr(r, values))
        }
        Expr::Or(l, r) => {
            let left = build_expr(l, values);
            format!("({} OR {})", left, build_expr(r, values))
        }
    }
}

fn build_predicate(p: &Predicate<'_>, values: &mut Vec<TypedValue>) -> String {
    let col = p.field.column();
    match &p.operand {
        Operand::None if p.operator == Operator::NotNull => format!("{} IS NOT NULL", col),
        Operand::None => format!("{} IS NULL", col),
        Operand::Value(value) => {
            values.push(value.clone());
            match p.operator.comparison_sql() {
                Some(op) => format!("{} {} ?", col, op),
                None => format!("{} LIKE ? ESCAPE '\\'", col),
            }
        }
        Operand::List(list) => {
            values.extend(list.iter().cloned());
            let placeholders = vec!["?"; list.len()].join(", ");
            format!("{} IN ({})", col, placeholders)
        }
    }
}
