//! Per-database rendering of placeholders, sort keys and paging

use crate::domain::order::OrderDirection;

/// Database-specific SQL syntax
///
/// Compiled conditions always use `?`. Dialects differ in:
/// - Parameter placeholders (? vs $1)
/// - Sort key rendering
/// - Limit/offset clauses
pub trait SqlDialect: Send + Sync {
    /// Backend name, matching [`super::Backend::name`]
    fn name(&self) -> &'static str;

    /// Placeholder for the bound value at `index` (1-based). Positional
    /// dialects ignore the index.
    fn placeholder(&self, index: usize) -> String;

    /// Generate a single ORDER BY key
    fn order_by(&self, col: &str, direction: OrderDirection) -> String {
        format!("{} {}", col, direction.as_sql())
    }

    /// Paging clause for one page of `limit` rows
    fn limit_offset(&self, limit: u32, offset: u64) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }
}
