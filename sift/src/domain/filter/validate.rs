//! Resolve raw predicates against a record schema

use super::Operator;
use super::ast::{Expr, RawLiteral, RawPredicate};
use super::value::{TypedValue, coerce, coerce_pattern};
use crate::domain::error::CompileError;
use crate::domain::schema::{FieldDescriptor, RecordSchema};

/// A predicate whose field, operator and operand have all been checked
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<'s> {
    pub field: &'s FieldDescriptor,
    pub operator: Operator,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `$null` / `$nn`
    None,
    Value(TypedValue),
    List(Vec<TypedValue>),
}

/// Check every predicate in source order. The first violation wins.
pub fn validate<'s>(
    expr: Expr<RawPredicate<'_>>,
    schema: &'s RecordSchema,
) -> Result<Expr<Predicate<'s>>, CompileError> {
    expr.try_map(&mut |raw| resolve(raw, schema))
}

fn resolve<'s>(
    raw: RawPredicate<'_>,
    schema: &'s RecordSchema,
) -> Result<Predicate<'s>, CompileError> {
    let field = schema
        .field(raw.field)
        .ok_or_else(|| CompileError::unknown_field(raw.field))?;

    if !field.allows(raw.operator) {
        return Err(CompileError::OperatorNotAllowed {
            field: field.name().to_string(),
            operator: raw.operator,
        });
    }

    let operand = match raw.literal {
        None => Operand::None,
        Some(RawLiteral::Single(literal)) if raw.operator.is_pattern() => {
            Operand::Value(coerce_pattern(field, raw.operator, &literal)?)
        }
        Some(RawLiteral::Single(literal)) => Operand::Value(coerce(field, &literal)?),
        Some(RawLiteral::List(literals)) => Operand::List(
            literals
                .iter()
                .map(|literal| coerce(field, literal))
                .collect::<Result<_, _>>()?,
        ),
    };

    Ok(Predicate {
        field,
        operator: raw.operator,
        operand,
    })
}
