//! Adapters that receive a compiled query
//!
//! A target only needs to accept a condition, an order clause and a page.
//! [`SqlStatement`] renders plain SQL text; [`SqlxQuery`] binds into an
//! `sqlx::QueryBuilder`.

mod sqlx;
mod statement;

pub use self::sqlx::{BindTypedValue, SqlxQuery};
pub use statement::SqlStatement;

use crate::domain::filter::CompiledCondition;
use crate::domain::order::OrderClause;

/// Receiver for the parts of a compiled query
pub trait QueryTarget {
    fn apply_condition(&mut self, condition: &CompiledCondition);

    fn apply_order(&mut self, order: &OrderClause);

    fn apply_page(&mut self, page: u32, page_size: u32);
}

/// Rows to skip before `page` (1-based)
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}
