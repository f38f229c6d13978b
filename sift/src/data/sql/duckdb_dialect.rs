//! DuckDB SQL dialect implementation

use super::SqlDialect;
use crate::domain::order::OrderDirection;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
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
