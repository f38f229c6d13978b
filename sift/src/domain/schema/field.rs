//! Field declarations and resolved descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::filter::{Operator, OperatorSet};

/// Declared value type of a field; literals are coerced to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Integer,
    Decimal,
    Timestamp,
    Boolean,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Timestamp => "timestamp",
            ValueType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field as declared, before record-level defaults are applied.
///
/// Without `column` the field maps to `<alias>.<name>` (or `<name>` when the
/// record has no alias). Without `operators` every operator applicable to
/// the value type is allowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub operators: Option<Vec<Operator>>,
    #[serde(default)]
    pub orderable: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            column: None,
            value_type,
            operators: None,
            orderable: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }
}

/// Resolved, immutable whitelist entry for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    column: String,
    value_type: ValueType,
    operators: OperatorSet,
    orderable: bool,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        column: String,
        value_type: ValueType,
        operators: OperatorSet,
        orderable: bool,
    ) -> Self {
        Self {
            name,
            column,
            value_type,
            operators,
            orderable,
        }
    }

    /// Logical name used in filter and order text
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column or expression emitted into SQL
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn operators(&self) -> OperatorSet {
        self.operators
    }

    pub fn allows(&self, op: Operator) -> bool {
        self.operators.contains(op)
    }

    pub fn is_orderable(&self) -> bool {
        self.orderable
    }
}
