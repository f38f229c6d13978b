//! SQLite SQL dialect implementation

use super::SqlDialect;
use crate::domain::order::OrderDirection;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// NULL placement pinned to PostgreSQL's defaults
    fn order_by(&self, col: &str, direction: OrderDirection) -> String {
        match direction {
            OrderDirection::Asc => format!("{} ASC NULLS LAST", col),
            OrderDirection::Desc => format!("{} DESC NULLS FIRST", col),
        }
    }
}
