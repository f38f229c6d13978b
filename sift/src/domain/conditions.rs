//! Request conditions and the compiler entry point
//!
//! [`ConditionBuilder`] resolves the record schema, decodes and compiles the
//! filter and order text, and checks pagination. The result is a
//! [`CompiledQuery`] that can be applied to any [`QueryTarget`].

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::config::CompilerConfig;
use crate::core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PARAM_PAGE, PARAM_PAGE_SIZE};
use crate::data::target::QueryTarget;
use crate::domain::error::CompileError;
use crate::domain::filter::{CompiledCondition, compile_filter};
use crate::domain::order::{OrderClause, compile_order};
use crate::domain::schema::MetadataResolver;
use crate::utils::decode::decode_param;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for page size parameter
pub fn validate_page_size(page_size: u32) -> Result<(), ValidationError> {
    if page_size < 1 {
        return Err(ValidationError::new("page_size_min")
            .with_message("Page size must be >= 1".into()));
    }
    Ok(())
}

/// Raw request parameters, as received from a client.
///
/// Wire and `Default` values for `page`/`pageSize` are fixed (1 and 20).
/// Use [`ConditionBuilder::conditions`] to start from the configured
/// defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryConditions {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,

    /// URL-encoded filter expression
    #[serde(default)]
    pub filter: Option<String>,

    /// URL-encoded order expression
    #[serde(default)]
    pub order: Option<String>,
}

impl Default for QueryConditions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filter: None,
            order: None,
        }
    }
}

impl QueryConditions {
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Everything a query target needs, fully checked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    /// Absent when no filter was supplied
    pub condition: Option<CompiledCondition>,
    /// Empty when no order was supplied
    pub order: OrderClause,
    pub page: u32,
    pub page_size: u32,
}

impl CompiledQuery {
    /// Hand the compiled parts to a target. Empty parts are skipped.
    pub fn apply_to<T: QueryTarget + ?Sized>(&self, target: &mut T) {
        if let Some(ref condition) = self.condition {
            target.apply_condition(condition);
        }
        if !self.order.is_empty() {
            target.apply_order(&self.order);
        }
        target.apply_page(self.page, self.page_size);
    }
}

/// Compiles request conditions against registered record schemas.
///
/// Holds no per-call state; one builder can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ConditionBuilder<R> {
    resolver: R,
    config: CompilerConfig,
}

impl<R: MetadataResolver> ConditionBuilder<R> {
    pub fn new(resolver: R, config: CompilerConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Empty request using the configured default page and page size
    pub fn conditions(&self) -> QueryConditions {
        QueryConditions {
            page: self.config.default_page,
            page_size: self.config.default_page_size,
            ..QueryConditions::default()
        }
    }

    pub fn compile(
        &self,
        conditions: &QueryConditions,
        record: &str,
    ) -> Result<CompiledQuery, CompileError> {
        let schema = self
            .resolver
            .resolve(record)
            .ok_or_else(|| CompileError::MetadataNotFound {
                record: record.to_string(),
            })?;
        let limits = &self.config.limits;

        let filter = check_length(
            conditions.filter.as_deref(),
            "filter length",
            limits.max_filter_length,
        )?;
        let condition = match decode_param(filter)? {
            Some(text) => Some(compile_filter(&text, schema, limits)?),
            None => None,
        };

        let order = check_length(
            conditions.order.as_deref(),
            "order length",
            limits.max_order_length,
        )?;
        let order = match decode_param(order)? {
            Some(text) => compile_order(&text, schema, &self.config)?,
            None => OrderClause::default(),
        };

        self.check_pagination(conditions)?;

        tracing::debug!(
            record = %schema.name(),
            has_filter = condition.is_some(),
            order_keys = order.len(),
            page = conditions.page,
            page_size = conditions.page_size,
            "Compiled query conditions"
        );

        Ok(CompiledQuery {
            condition,
            order,
            page: conditions.page,
            page_size: conditions.page_size,
        })
    }

    fn check_pagination(&self, conditions: &QueryConditions) -> Result<(), CompileError> {
        validate_page(conditions.page)
            .map_err(|e| pagination_error(PARAM_PAGE, conditions.page, e))?;
        validate_page_size(conditions.page_size)
            .map_err(|e| pagination_error(PARAM_PAGE_SIZE, conditions.page_size, e))?;

        let max = self.config.limits.max_page_size;
        if conditions.page_size > max {
            return Err(CompileError::InvalidPagination {
                parameter: PARAM_PAGE_SIZE,
                value: conditions.page_size,
                reason: format!("Page size must be <= {}", max),
            });
        }
        Ok(())
    }
}

fn check_length<'a>(
    raw: Option<&'a str>,
    limit: &'static str,
    max: usize,
) -> Result<Option<&'a str>, CompileError> {
    match raw {
        Some(text) if text.len() > max => Err(CompileError::LimitExceeded { limit, max }),
        _ => Ok(raw),
    }
}

fn pagination_error(parameter: &'static str, value: u32, e: ValidationError) -> CompileError {
    CompileError::InvalidPagination {
        parameter,
        value,
        reason: e
            .message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| e.code.into_owned()),
    }
}
