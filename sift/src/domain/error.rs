//! Compile error taxonomy
//!
//! Every variant is terminal for the compilation call that produced it and
//! carries enough context to build a client-facing message. `code()` gives a
//! stable identifier for API responses.

use thiserror::Error;

use super::filter::Operator;
use super::schema::ValueType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Bad percent-encoding in the raw parameter
    #[error("Malformed input at byte {position}: {reason}")]
    MalformedInput {
        position: usize,
        reason: &'static str,
    },

    /// Unrecognized character sequence in the filter text
    #[error("Invalid filter syntax at position {position}: {message}")]
    Lex { position: usize, message: String },

    /// Token stream does not match the filter grammar
    #[error("Invalid filter expression at position {position}: {reason}")]
    Parse { position: usize, reason: String },

    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    #[error("Operator {operator} is not allowed on field {field}")]
    OperatorNotAllowed { field: String, operator: Operator },

    #[error("Cannot order by field: {field}")]
    FieldNotOrderable { field: String },

    #[error("Value {literal} is not a valid {expected} for field {field}")]
    TypeMismatch {
        field: String,
        literal: String,
        expected: ValueType,
    },

    #[error("Invalid sort direction '{direction}' for field {field}. Use 'asc' or 'desc'")]
    InvalidDirection { field: String, direction: String },

    #[error("Field {field} appears more than once in the order")]
    DuplicateOrderField { field: String },

    #[error("Empty order segment at index {index}")]
    EmptyOrderSegment { index: usize },

    #[error("Invalid {parameter} {value}: {reason}")]
    InvalidPagination {
        parameter: &'static str,
        value: u32,
        reason: String,
    },

    #[error("No field metadata registered for record type: {record}")]
    MetadataNotFound { record: String },

    #[error("{limit} exceeds the maximum of {max}")]
    LimitExceeded { limit: &'static str, max: usize },
}

impl CompileError {
    pub fn parse(position: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            position,
            reason: reason.into(),
        }
    }

    pub fn lex(position: usize, message: impl Into<String>) -> Self {
        Self::Lex {
            position,
            message: message.into(),
        }
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "MALFORMED_INPUT",
            Self::Lex { .. } => "INVALID_FILTER_SYNTAX",
            Self::Parse { .. } => "INVALID_FILTER_EXPRESSION",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::OperatorNotAllowed { .. } => "OPERATOR_NOT_ALLOWED",
            Self::FieldNotOrderable { .. } => "FIELD_NOT_ORDERABLE",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::InvalidDirection { .. } => "INVALID_ORDER_DIRECTION",
            Self::DuplicateOrderField { .. } => "DUPLICATE_ORDER_FIELD",
            Self::EmptyOrderSegment { .. } => "INVALID_ORDER",
            Self::InvalidPagination { .. } => "INVALID_PAGINATION",
            Self::MetadataNotFound { .. } => "METADATA_NOT_FOUND",
            Self::LimitExceeded { .. } => "LIMIT_EXCEEDED",
        }
    }

    /// Whether the caller should report this as a bad request.
    ///
    /// Only a missing record registration points at server configuration.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::MetadataNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_not_allowed_display() {
        let err = CompileError::OperatorNotAllowed {
            field: "name".to_string(),
            operator: Operator::Greater,
        };
        assert_eq!(err.to_string(), "Operator > is not allowed on field name");
        assert_eq!(err.code(), "OPERATOR_NOT_ALLOWED");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = CompileError::TypeMismatch {
            field: "age".to_string(),
            literal: "'ten'".to_string(),
            expected: ValueType::Integer,
        };
        assert_eq!(
            err.to_string(),
            "Value 'ten' is not a valid integer for field age"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = CompileError::parse(7, "expected ')'");
        assert_eq!(
            err.to_string(),
            "Invalid filter expression at position 7: expected ')'"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CompileError::unknown_field("x").is_client_error());
        assert!(
            !CompileError::MetadataNotFound {
                record: "user".to_string()
            }
            .is_client_error()
        );
    }
}
