//! Schema registration errors

use std::path::PathBuf;

use thiserror::Error;

use super::ValueType;
use crate::domain::filter::Operator;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid record name: '{0}'")]
    InvalidRecordName(String),

    #[error("Record type {0} is registered more than once")]
    DuplicateRecord(String),

    #[error("Record {record} declares field {field} more than once")]
    DuplicateField { record: String, field: String },

    /// Field names must be usable as identifiers in filter text
    #[error("Record {record}: '{field}' is not a valid field name")]
    InvalidFieldName { record: String, field: String },

    #[error("Record {record}: unsafe SQL in {location}: {sql}")]
    UnsafeSql {
        record: String,
        location: String,
        sql: String,
    },

    #[error("Record {record}: operator {operator} cannot apply to {value_type} field {field}")]
    OperatorNotApplicable {
        record: String,
        field: String,
        operator: Operator,
        value_type: ValueType,
    },

    #[error("Record {record}: field {field} allows no operators")]
    NoOperators { record: String, field: String },

    #[error("Failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid schema definition: {0}")]
    Json(#[from] serde_json::Error),
}
