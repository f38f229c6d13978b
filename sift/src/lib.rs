//! Compiles untrusted, URL-encoded filter and order-by text into
//! parameterized SQL conditions, checked against a whitelist of fields.
//!
//! ```
//! use sift::core::CompilerConfig;
//! use sift::domain::filter::Operator;
//! use sift::domain::schema::{FieldSpec, RecordSchema, SchemaRegistry, ValueType};
//! use sift::domain::{ConditionBuilder, QueryConditions};
//!
//! let user = RecordSchema::builder("user")
//!     .alias("u")
//!     .field(FieldSpec::new("name", ValueType::String).operators([Operator::StartWith]))
//!     .field(FieldSpec::new("age", ValueType::Integer).orderable())
//!     .build()
//!     .unwrap();
//! let registry = SchemaRegistry::new([user]).unwrap();
//! let builder = ConditionBuilder::new(registry, CompilerConfig::default());
//!
//! let conditions = QueryConditions::default()
//!     .filter("name%20%24sw%20%27Jo%27")
//!     .order("age+desc");
//! let query = builder.compile(&conditions, "user").unwrap();
//!
//! let condition = query.condition.unwrap();
//! assert_eq!(condition.fragment, "u.name LIKE ? ESCAPE '\\'");
//! assert_eq!(query.order.iter().next().unwrap().to_sql(), "u.age DESC");
//! ```

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
