//! Literal coercion against a field's declared type

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Operator;
use super::ast::{Literal, LiteralKind};
use crate::domain::error::CompileError;
use crate::domain::schema::{FieldDescriptor, ValueType};
use crate::utils::sql::{LikeMatch, like_pattern};
use crate::utils::time::parse_iso_timestamp;

/// A bound value, typed by the field it is compared against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    Boolean(bool),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "'{}'", s),
            TypedValue::Integer(n) => write!(f, "{}", n),
            TypedValue::Decimal(d) => write!(f, "{}", d),
            TypedValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Coerce a literal to the field's type. Never truncates: an integer that
/// does not fit `i64` or a decimal that cannot be represented exactly is a
/// mismatch.
pub fn coerce(field: &FieldDescriptor, literal: &Literal<'_>) -> Result<TypedValue, CompileError> {
    let text = literal.text.as_ref();
    let value = match (field.value_type(), literal.kind) {
        (ValueType::String, LiteralKind::String | LiteralKind::Timestamp) => {
            Some(TypedValue::String(text.to_string()))
        }
        (ValueType::Integer, LiteralKind::Number) => text.parse().ok().map(TypedValue::Integer),
        (ValueType::Decimal, LiteralKind::Number) => {
            Decimal::from_str_exact(text).ok().map(TypedValue::Decimal)
        }
        (ValueType::Timestamp, LiteralKind::Timestamp) => {
            parse_iso_timestamp(text).map(TypedValue::Timestamp)
        }
        (ValueType::Boolean, LiteralKind::Boolean) => {
            Some(TypedValue::Boolean(text.eq_ignore_ascii_case("true")))
        }
        _ => None,
    };

    value.ok_or_else(|| CompileError::TypeMismatch {
        field: field.name().to_string(),
        literal: literal.display(),
        expected: field.value_type(),
    })
}

/// Coerce a pattern operand into an escaped LIKE pattern
pub fn coerce_pattern(
    field: &FieldDescriptor,
    operator: Operator,
    literal: &Literal<'_>,
) -> Result<TypedValue, CompileError> {
    let kind = match operator {
        Operator::StartWith => LikeMatch::Prefix,
        Operator::EndWith => LikeMatch::Suffix,
        _ => LikeMatch::Substring,
    };
    match coerce(field, literal)? {
        TypedValue::String(s) => Ok(TypedValue::String(like_pattern(&s, kind))),
        _ => Err(CompileError::TypeMismatch {
            field: field.name().to_string(),
            literal: literal.display(),
            expected: ValueType::String,
        }),
    }
}
