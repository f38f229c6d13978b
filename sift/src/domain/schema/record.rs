//! Per-record-type schema

use std::collections::HashMap;

use serde::Deserialize;

use super::{FieldDescriptor, FieldSpec, SchemaError};
use crate::domain::filter::{OperatorSet, is_reserved_word};

/// Declaration of a record type: its fields plus the base query parts
/// (`select`, `tables`) and the alias used for default column mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    pub name: String,
    #[serde(default)]
    pub select: Option<String>,
    #[serde(default)]
    pub tables: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl RecordSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            select: None,
            tables: None,
            alias: None,
            fields: Vec::new(),
        }
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn tables(mut self, tables: impl Into<String>) -> Self {
        self.tables = Some(tables.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Resolve defaults and validate every field
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        let record = self.name.trim().to_string();
        if record.is_empty() {
            return Err(SchemaError::InvalidRecordName(self.name));
        }

        for (location, sql) in [("select", &self.select), ("tables", &self.tables)] {
            if let Some(sql) = sql {
                check_sql_fragment(&record, location, sql)?;
            }
        }
        if self.tables.is_none() {
            check_sql_fragment(&record, "tables", &record)?;
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());

        for spec in self.fields {
            if !is_valid_field_name(&spec.name) {
                return Err(SchemaError::InvalidFieldName {
                    record,
                    field: spec.name,
                });
            }
            if index.contains_key(&spec.name) {
                return Err(SchemaError::DuplicateField {
                    record,
                    field: spec.name,
                });
            }

            let column = match (spec.column, &self.alias) {
                (Some(column), _) => column.trim().to_string(),
                (None, Some(alias)) => format!("{}.{}", alias.trim(), spec.name),
                (None, None) => spec.name.clone(),
            };
            check_sql_fragment(&record, &format!("column of {}", spec.name), &column)?;

            let operators = match spec.operators {
                Some(ops) => {
                    if let Some(op) = ops.iter().find(|op| !op.applies_to(spec.value_type)) {
                        return Err(SchemaError::OperatorNotApplicable {
                            record,
                            field: spec.name,
                            operator: *op,
                            value_type: spec.value_type,
                        });
                    }
                    ops.into_iter().collect()
                }
                None => OperatorSet::all_for(spec.value_type),
            };
            if operators.is_empty() {
                return Err(SchemaError::NoOperators {
                    record,
                    field: spec.name,
                });
            }

            index.insert(spec.name.clone(), fields.len());
            fields.push(FieldDescriptor::new(
                spec.name,
                column,
                spec.value_type,
                operators,
                spec.orderable,
            ));
        }

        Ok(RecordSchema {
            name: record,
            select: self.select,
            tables: self.tables,
            fields,
            index,
        })
    }
}

/// Field names must lex as a single identifier and must not be a keyword
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !is_reserved_word(name)
}

/// Reject trusted SQL that could break placeholder numbering or statement
/// boundaries
fn check_sql_fragment(record: &str, location: &str, sql: &str) -> Result<(), SchemaError> {
    let unsafe_sql = sql.trim().is_empty()
        || sql.contains('?')
        || sql.contains('\'')
        || sql.contains(';')
        || sql.contains("--")
        || sql.contains("/*");
    if unsafe_sql {
        return Err(SchemaError::UnsafeSql {
            record: record.to_string(),
            location: location.to_string(),
            sql: sql.to_string(),
        });
    }
    Ok(())
}

/// Immutable schema of one record type
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    select: Option<String>,
    tables: Option<String>,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSpec {
        RecordSpec::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Select list for a base query (`*` when undeclared)
    pub fn select_list(&self) -> &str {
        self.select.as_deref().unwrap_or("*")
    }

    /// FROM clause for a base query (the record name when undeclared)
    pub fn from_clause(&self) -> &str {
        self.tables.as_deref().unwrap_or(&self.name)
    }
}
