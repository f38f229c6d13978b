//! sqlx `QueryBuilder` target

use sqlx::{Database, Postgres, QueryBuilder, Sqlite};

use crate::data::sql::{PostgresDialect, SqlDialect, SqliteDialect};
use crate::domain::filter::{CompiledCondition, TypedValue};
use crate::domain::order::OrderClause;

use super::{QueryTarget, page_offset};

/// Databases that can bind every [`TypedValue`]
pub trait BindTypedValue: Database {
    fn dialect() -> &'static dyn SqlDialect;

    fn push_typed(builder: &mut QueryBuilder<'_, Self>, value: TypedValue);
}

impl BindTypedValue for Sqlite {
    fn dialect() -> &'static dyn SqlDialect {
        &SqliteDialect
    }

    fn push_typed(builder: &mut QueryBuilder<'_, Self>, value: TypedValue) {
        match value {
            TypedValue::String(s) => builder.push_bind(s),
            TypedValue::Integer(n) => builder.push_bind(n),
            // SQLite has no decimal type; text keeps the exact value
            TypedValue::Decimal(d) => builder.push_bind(d.to_string()),
            TypedValue::Timestamp(ts) => builder.push_bind(ts),
            TypedValue::Boolean(b) => builder.push_bind(b),
        };
    }
}

impl BindTypedValue for Postgres {
    fn dialect() -> &'static dyn SqlDialect {
        &PostgresDialect
    }

    fn push_typed(builder: &mut QueryBuilder<'_, Self>, value: TypedValue) {
        match value {
            TypedValue::String(s) => builder.push_bind(s),
            TypedValue::Integer(n) => builder.push_bind(n),
            TypedValue::Decimal(d) => builder.push_bind(d),
            TypedValue::Timestamp(ts) => builder.push_bind(ts),
            TypedValue::Boolean(b) => builder.push_bind(b),
        };
    }
}

/// Appends WHERE / ORDER BY / LIMIT to a builder that already holds the
/// SELECT and FROM parts. The builder numbers placeholders itself.
pub struct SqlxQuery<'b, 'args, DB: Database> {
    builder: &'b mut QueryBuilder<'args, DB>,
    has_where: bool,
}

impl<'b, 'args, DB: BindTypedValue> SqlxQuery<'b, 'args, DB> {
    pub fn new(builder: &'b mut QueryBuilder<'args, DB>) -> Self {
        Self {
            builder,
            has_where: false,
        }
    }
}

impl<DB: BindTypedValue> QueryTarget for SqlxQuery<'_, '_, DB> {
    fn apply_condition(&mut self, condition: &CompiledCondition) {
        self.builder
            .push(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;

        let mut values = condition.values.iter().cloned();
        for (i, part) in condition.fragment.split('?').enumerate() {
            if i > 0
                && let Some(value) = values.next()
            {
                DB::push_typed(self.builder, value);
            }
            self.builder.push(part);
        }
    }

    fn apply_order(&mut self, order: &OrderClause) {
        let keys: Vec<String> = order
            .iter()
            .map(|k| DB::dialect().order_by(&k.column, k.direction))
            .collect();
        self.builder.push(" ORDER BY ").push(keys.join(", "));
    }

    fn apply_page(&mut self, page: u32, page_size: u32) {
        let offset = i64::try_from(page_offset(page, page_size)).unwrap_or(i64::MAX);
        self.builder.push(" LIMIT ");
        DB::push_typed(self.builder, TypedValue::Integer(i64::from(page_size)));
        self.builder.push(" OFFSET ");
        DB::push_typed(self.builder, TypedValue::Integer(offset));
    }
}
