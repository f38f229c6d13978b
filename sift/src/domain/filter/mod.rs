//! Filter compiler
//!
//! Decoded filter text goes through four stages, each in its own module:
//!
//! 1. [`lexer`] splits text into [`token::Token`]s
//! 2. [`parser`] builds an AND/OR tree of raw predicates
//! 3. [`validate`] resolves fields against a [`RecordSchema`] and coerces
//!    literals into [`TypedValue`]s
//! 4. [`emit`] renders the tree as a [`CompiledCondition`]
//!
//! No literal ever reaches the fragment text; every value is bound.

pub mod ast;
pub mod emit;
pub mod lexer;
pub mod operator;
pub mod parser;
pub mod token;
pub mod validate;
pub mod value;

#[cfg(test)]
mod tests;

pub use emit::CompiledCondition;
pub use lexer::is_reserved_word;
pub use operator::{Arity, Operator, OperatorSet};
pub use value::TypedValue;

use crate::core::config::CompilerLimits;
use crate::domain::error::CompileError;
use crate::domain::schema::RecordSchema;

/// Compile decoded, non-blank filter text against a record schema
pub fn compile_filter(
    text: &str,
    schema: &RecordSchema,
    limits: &CompilerLimits,
) -> Result<CompiledCondition, CompileError> {
    let tree = parser::parse(text, limits)?;
    let predicates = tree.predicate_count();
    let resolved = validate::validate(tree, schema)?;
    let condition = emit::emit(&resolved);

    tracing::trace!(
        record = %schema.name(),
        predicates,
        fragment = %condition.fragment,
        "Compiled filter"
    );

    Ok(condition)
}
