//! End-to-end tests for the filter compiler

use super::*;
use chrono::{TimeZone, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;

use crate::data::sql::{PostgresDialect, SqliteDialect};
use crate::domain::schema::{FieldSpec, ValueType};
use crate::utils::decode::decode_param;

fn user_schema() -> RecordSchema {
    RecordSchema::builder("user")
        .select("u.id, u.name, u.age, u.created_at")
        .tables("users u")
        .alias("u")
        .field(
            FieldSpec::new("name", ValueType::String)
                .operators([Operator::Equal, Operator::StartWith, Operator::Null])
                .orderable(),
        )
        .field(
            FieldSpec::new("createdAt", ValueType::Timestamp)
                .column("u.created_at")
                .operators([Operator::Greater, Operator::GreaterOrEqual]),
        )
        .field(FieldSpec::new("age", ValueType::Integer).orderable())
        .field(FieldSpec::new("email", ValueType::String))
        .field(FieldSpec::new("balance", ValueType::Decimal))
        .field(FieldSpec::new("active", ValueType::Boolean))
        .build()
        .unwrap()
}

fn compile(src: &str) -> Result<CompiledCondition, CompileError> {
    compile_filter(src, &user_schema(), &CompilerLimits::default())
}

fn jan_first_2020() -> TypedValue {
    TypedValue::Timestamp(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
}

// === Emission ===

#[test]
fn test_starts_with_and_timestamp() {
    let c = compile("name $sw 'Jo' AND createdAt > '2020-01-01T00:00:00Z'").unwrap();
    assert_eq!(
        c.fragment,
        "(u.name LIKE ? ESCAPE '\\' AND u.created_at > ?)"
    );
    assert_eq!(
        c.values,
        vec![TypedValue::String("Jo%".to_string()), jan_first_2020()]
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let c = compile("age = 1 AND age = 2 OR age = 3").unwrap();
    assert_eq!(c.fragment, "((u.age = ? AND u.age = ?) OR u.age = ?)");
    assert_eq!(
        c.values,
        vec![
            TypedValue::Integer(1),
            TypedValue::Integer(2),
            TypedValue::Integer(3)
        ]
    );
}

#[test]
fn test_explicit_grouping_is_preserved() {
    let c = compile("age > 1 and (email $ct 'x' or email $ew '.org')").unwrap();
    assert_eq!(
        c.fragment,
        "(u.age > ? AND (u.email LIKE ? ESCAPE '\\' OR u.email LIKE ? ESCAPE '\\'))"
    );
    assert_eq!(
        c.values,
        vec![
            TypedValue::Integer(1),
            TypedValue::String("%x%".to_string()),
            TypedValue::String("%.org".to_string()),
        ]
    );
}

#[test]
fn test_comparison_operators() {
    let cases = [
        ("age = 5", "u.age = ?"),
        ("age != 5", "u.age <> ?"),
        ("age > 5", "u.age > ?"),
        ("age >= 5", "u.age >= ?"),
        ("age < 5", "u.age < ?"),
        ("age <= 5", "u.age <= ?"),
    ];
    for (src, expected) in cases {
        let c = compile(src).unwrap();
        assert_eq!(c.fragment, expected, "{}", src);
        assert_eq!(c.values, vec![TypedValue::Integer(5)]);
    }
}

#[test]
fn test_null_checks_bind_nothing() {
    let c = compile("name $null OR email $nn").unwrap();
    assert_eq!(c.fragment, "(u.name IS NULL OR u.email IS NOT NULL)");
    assert!(c.values.is_empty());
}

#[test]
fn test_in_list() {
    let c = compile("age $in (18, 21, 65)").unwrap();
    assert_eq!(c.fragment, "u.age IN (?, ?, ?)");
    assert_eq!(
        c.values,
        vec![
            TypedValue::Integer(18),
            TypedValue::Integer(21),
            TypedValue::Integer(65)
        ]
    );

    let c = compile("email $in 'a@b.c'").unwrap();
    assert_eq!(c.fragment, "u.email IN (?)");
}

#[test]
fn test_typed_values() {
    let c = compile("balance >= 10.25 AND active = true").unwrap();
    assert_eq!(
        c.values,
        vec![
            TypedValue::Decimal(Decimal::new(1025, 2)),
            TypedValue::Boolean(true)
        ]
    );

    let c = compile("createdAt >= 2020-01-01").unwrap();
    assert_eq!(c.values, vec![jan_first_2020()]);
}

// === Injection safety ===

#[test]
fn test_literals_never_reach_fragment() {
    let sources = [
        "name = 'x'' OR 1=1 --'",
        "email $ct '; DROP TABLE users; --'",
        "email $in ('a) OR (1=1', 'b')",
        "name $sw '?'",
    ];
    for src in sources {
        let c = compile(src).unwrap();
        assert_eq!(c.placeholder_count(), c.values.len(), "{}", src);
        assert!(!c.fragment.contains("DROP"), "{}", src);
        assert!(!c.fragment.contains("1=1"), "{}", src);
    }
}

#[test]
fn test_placeholder_count_matches_values() {
    let c = compile(
        "(name $sw 'a' OR name = 'b') AND (age $in (1,2) OR age $nn) AND createdAt > 2021-06-01T12:00",
    )
    .unwrap();
    assert_eq!(c.placeholder_count(), 5);
    assert_eq!(c.values.len(), 5);
}

// === Errors ===

#[test]
fn test_operator_not_allowed_is_enforced() {
    let err = compile("name > 5").unwrap_err();
    assert_eq!(err.code(), "OPERATOR_NOT_ALLOWED");
    let err = compile("createdAt = '2020-01-01'").unwrap_err();
    assert_eq!(
        err,
        CompileError::OperatorNotAllowed {
            field: "createdAt".to_string(),
            operator: Operator::Equal,
        }
    );
}

#[test]
fn test_error_codes_per_stage() {
    assert_eq!(compile("name = 'x").unwrap_err().code(), "INVALID_FILTER_SYNTAX");
    assert_eq!(
        compile("name = 'x' AND").unwrap_err().code(),
        "INVALID_FILTER_EXPRESSION"
    );
    assert_eq!(compile("nick = 'x'").unwrap_err().code(), "UNKNOWN_FIELD");
    assert_eq!(compile("age = 'x'").unwrap_err().code(), "TYPE_MISMATCH");
    assert_eq!(compile("createdAt > 'soon'").unwrap_err().code(), "TYPE_MISMATCH");
}

#[test]
fn test_no_partial_success() {
    assert!(compile("age = 1 OR nick = 2").is_err());
    assert!(compile("age = 1 AND (age = 2 OR age = 'three')").is_err());
}

// === Rendering ===

#[test]
fn test_render_for_postgres() {
    let c = compile("name $sw 'Jo' AND (age $in (1, 2) OR age > 3)").unwrap();
    assert_eq!(
        c.render(&PostgresDialect, 1),
        "(u.name LIKE $1 ESCAPE '\\' AND (u.age IN ($2, $3) OR u.age > $4))"
    );
    assert_eq!(
        c.render(&PostgresDialect, 3),
        "(u.name LIKE $3 ESCAPE '\\' AND (u.age IN ($4, $5) OR u.age > $6))"
    );
    assert_eq!(c.render(&SqliteDialect, 1), c.fragment);
}

// === Decoding ===

#[test]
fn test_percent_encoding_round_trip() {
    let sources = [
        "name $sw 'Jo' AND createdAt > '2020-01-01T00:00:00Z'",
        "email $ct '100% ''legit''' OR age $in (1, 2)",
        "(age >= 18 and active = false) or name $null",
    ];
    for src in sources {
        let encoded = utf8_percent_encode(src, NON_ALPHANUMERIC).to_string();
        let decoded = decode_param(Some(&encoded)).unwrap().unwrap();
        assert_eq!(compile(&decoded), compile(src), "{}", src);
    }
}

#[test]
fn test_form_encoded_spaces() {
    let decoded = decode_param(Some("name+%24sw+%27Jo%27")).unwrap().unwrap();
    assert_eq!(compile(&decoded).unwrap().fragment, "u.name LIKE ? ESCAPE '\\'");
}
