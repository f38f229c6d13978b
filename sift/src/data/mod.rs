//! Query-target adapters
//!
//! `sql` holds the per-database dialects, `target` the adapters that
//! receive a compiled query.

pub mod sql;
pub mod target;
