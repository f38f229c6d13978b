//! Filter and order compilation

pub mod conditions;
pub mod error;
pub mod filter;
pub mod order;
pub mod schema;

pub use conditions::{CompiledQuery, ConditionBuilder, QueryConditions};
pub use error::CompileError;
pub use filter::{CompiledCondition, Operator, TypedValue};
pub use order::{OrderBy, OrderClause, OrderDirection};
pub use schema::{MetadataResolver, RecordSchema, SchemaRegistry};
