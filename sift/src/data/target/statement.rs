//! Plain-text SQL target

use crate::data::sql::SqlDialect;
use crate::domain::filter::{CompiledCondition, TypedValue};
use crate::domain::order::OrderClause;
use crate::domain::schema::RecordSchema;

use super::{QueryTarget, page_offset};

/// A SELECT over a record's tables, assembled from a compiled query
pub struct SqlStatement<'d> {
    dialect: &'d dyn SqlDialect,
    select: String,
    from: String,
    where_clause: Option<String>,
    order_by: Option<String>,
    limit: Option<String>,
    params: Vec<TypedValue>,
}

impl<'d> SqlStatement<'d> {
    pub fn new(dialect: &'d dyn SqlDialect, schema: &RecordSchema) -> Self {
        Self {
            dialect,
            select: schema.select_list().to_string(),
            from: schema.from_clause().to_string(),
            where_clause: None,
            order_by: None,
            limit: None,
            params: Vec::new(),
        }
    }

    pub fn sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select, self.from);
        if let Some(ref w) = self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(w);
        }
        if let Some(ref o) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(o);
        }
        if let Some(ref l) = self.limit {
            sql.push(' ');
            sql.push_str(l);
        }
        sql
    }

    /// Bound values in placeholder order
    pub fn params(&self) -> &[TypedValue] {
        &self.params
    }
}

impl QueryTarget for SqlStatement<'_> {
    fn apply_condition(&mut self, condition: &CompiledCondition) {
        let rendered = condition.render(self.dialect, self.params.len() + 1);
        self.params.extend(condition.values.iter().cloned());
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => format!("{} AND {}", existing, rendered),
            None => rendered,
        });
    }

    fn apply_order(&mut self, order: &OrderClause) {
        let keys: Vec<String> = order
            .iter()
            .map(|k| self.dialect.order_by(&k.column, k.direction))
            .collect();
        self.order_by = Some(keys.join(", "));
    }

    fn apply_page(&mut self, page: u32, page_size: u32) {
        self.limit = Some(
            self.dialect
                .limit_offset(page_size, page_offset(page, page_size)),
        );
    }
}
