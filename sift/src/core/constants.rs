//! Application constants

// =============================================================================
// Application
// =============================================================================

pub const APP_NAME_LOWER: &str = "sift";
pub const CONFIG_FILE_NAME: &str = "sift.json";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_CONFIG: &str = "SIFT_CONFIG";
pub const ENV_SCHEMA: &str = "SIFT_SCHEMA";
pub const ENV_DIALECT: &str = "SIFT_DIALECT";
pub const ENV_LOG: &str = "SIFT_LOG";
pub const ENV_LENIENT_ORDER: &str = "SIFT_LENIENT_ORDER";

// =============================================================================
// Query Parameters
// =============================================================================

/// Reserved request parameter names. These are part of the client contract.
pub const PARAM_FILTER: &str = "filter";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PAGE_SIZE: &str = "pageSize";

// =============================================================================
// Pagination
// =============================================================================

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound on page size unless configured otherwise
pub const MAX_PAGE_SIZE: u32 = 500;

// =============================================================================
// Compiler Limits
// =============================================================================

/// Maximum raw (still encoded) filter text length in bytes
pub const MAX_FILTER_LENGTH: usize = 16 * 1024;
/// Maximum raw order text length in bytes
pub const MAX_ORDER_LENGTH: usize = 1024;
/// Maximum number of predicates in one filter
pub const MAX_PREDICATES: usize = 50;
/// Maximum parenthesis nesting depth
pub const MAX_FILTER_DEPTH: usize = 32;
/// Maximum number of values in one `$in` list
pub const MAX_IN_VALUES: usize = 100;
/// Maximum number of sort keys
pub const MAX_ORDER_FIELDS: usize = 10;
