//! Order-by compiler
//!
//! Order text is a comma-separated list of `field[ direction]` segments.
//! Sort priority follows segment order.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::core::config::CompilerConfig;
use crate::domain::error::CompileError;
use crate::domain::schema::RecordSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// Case-insensitive `asc` / `desc`
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One sort key, already resolved to its column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction)
    }
}

/// Sort keys in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderClause(Vec<OrderBy>);

impl OrderClause {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderBy> {
        self.0.iter()
    }
}

impl From<Vec<OrderBy>> for OrderClause {
    fn from(keys: Vec<OrderBy>) -> Self {
        Self(keys)
    }
}

/// Compile decoded, non-blank order text against a record schema.
///
/// With `strict_order` off, segments naming an unknown or non-orderable
/// field are skipped instead of failing the call.
pub fn compile_order(
    text: &str,
    schema: &RecordSchema,
    config: &CompilerConfig,
) -> Result<OrderClause, CompileError> {
    let segments: Vec<&str> = text.split(',').collect();
    if segments.len() > config.limits.max_order_fields {
        return Err(CompileError::LimitExceeded {
            limit: "order field count",
            max: config.limits.max_order_fields,
        });
    }

    let mut seen = FxHashSet::default();
    let mut keys = Vec::with_capacity(segments.len());

    for (index, segment) in segments.into_iter().enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(CompileError::EmptyOrderSegment { index });
        }

        let (name, direction) = match segment.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (segment, None),
        };

        let direction = match direction {
            None => OrderDirection::Asc,
            Some(dir) => OrderDirection::parse(dir).ok_or_else(|| {
                CompileError::InvalidDirection {
                    field: name.to_string(),
                    direction: dir.to_string(),
                }
            })?,
        };

        let field = match schema.field(name) {
            Some(field) if field.is_orderable() => field,
            found => {
                if !config.strict_order {
                    tracing::debug!(
                        record = %schema.name(),
                        field = %name,
                        "Dropping unresolved order field"
                    );
                    continue;
                }
                return Err(match found {
                    Some(_) => CompileError::FieldNotOrderable {
                        field: name.to_string(),
                    },
                    None => CompileError::unknown_field(name),
                });
            }
        };

        if !seen.insert(field.name()) {
            return Err(CompileError::DuplicateOrderField {
                field: name.to_string(),
            });
        }

        keys.push(OrderBy {
            column: field.column().to_string(),
            direction,
        });
    }

    Ok(OrderClause(keys))
}
