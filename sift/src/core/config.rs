use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::sql::Backend;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_FILTER_DEPTH, MAX_FILTER_LENGTH,
    MAX_IN_VALUES, MAX_ORDER_FIELDS, MAX_ORDER_LENGTH, MAX_PAGE_SIZE, MAX_PREDICATES,
};

// =============================================================================
// Compiler Configuration
// =============================================================================

/// Resource limits applied to every compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerLimits {
    pub max_filter_length: usize,
    pub max_order_length: usize,
    pub max_predicates: usize,
    pub max_depth: usize,
    pub max_in_values: usize,
    pub max_order_fields: usize,
    pub max_page_size: u32,
}

impl Default for CompilerLimits {
    fn default() -> Self {
        Self {
            max_filter_length: MAX_FILTER_LENGTH,
            max_order_length: MAX_ORDER_LENGTH,
            max_predicates: MAX_PREDICATES,
            max_depth: MAX_FILTER_DEPTH,
            max_in_values: MAX_IN_VALUES,
            max_order_fields: MAX_ORDER_FIELDS,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Library-level compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub limits: CompilerLimits,
    /// Unknown or non-orderable order fields fail the call. When false they
    /// are dropped.
    pub strict_order: bool,
    /// Seed for `ConditionBuilder::conditions`
    pub default_page: u32,
    pub default_page_size: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            limits: CompilerLimits::default(),
            strict_order: true,
            default_page: DEFAULT_PAGE,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CompilerConfig {
    fn validate(&self) -> Result<()> {
        let limits = [
            ("max_filter_length", self.limits.max_filter_length),
            ("max_order_length", self.limits.max_order_length),
            ("max_predicates", self.limits.max_predicates),
            ("max_depth", self.limits.max_depth),
            ("max_in_values", self.limits.max_in_values),
            ("max_order_fields", self.limits.max_order_fields),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, v)| *v == 0) {
            anyhow::bail!("Configuration error: compiler.limits.{} must be greater than 0", name);
        }
        if self.default_page == 0 {
            anyhow::bail!("Configuration error: compiler.default_page must be greater than 0");
        }
        if self.default_page_size == 0 || self.default_page_size > self.limits.max_page_size {
            anyhow::bail!(
                "Configuration error: compiler.default_page_size must be between 1 and {}",
                self.limits.max_page_size
            );
        }
        Ok(())
    }
}

// =============================================================================
// File Configuration
// =============================================================================

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub schema: Option<PathBuf>,
    pub dialect: Option<Backend>,
    pub compiler: Option<CompilerConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub schema_path: PathBuf,
    pub dialect: Backend,
    pub compiler: CompilerConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. CLI-specified config path OR local directory config (./sift.json)
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let config_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match config_path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        Self::resolve(cli, file_config)
    }

    /// Layer CLI/env overrides on top of file values and defaults
    fn resolve(cli: &CliConfig, file: FileConfig) -> Result<Self> {
        let schema_path = cli.schema.clone().or(file.schema).context(
            "No schema file configured. Use --schema, SIFT_SCHEMA or \"schema\" in the config file",
        )?;

        let dialect = cli.dialect.or(file.dialect).unwrap_or_default();

        let mut compiler = file.compiler.unwrap_or_default();
        if cli.lenient_order {
            compiler.strict_order = false;
        }

        let config = Self {
            schema_path,
            dialect,
            compiler,
        };

        config.compiler.validate()?;

        tracing::debug!(
            schema = %config.schema_path.display(),
            dialect = %config.dialect,
            strict_order = config.compiler.strict_order,
            "Configuration loaded"
        );

        Ok(config)
    }
}
