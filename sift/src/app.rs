//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Value as JsonValue, json};

use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::target::SqlStatement;
use crate::domain::conditions::{CompiledQuery, ConditionBuilder, QueryConditions};
use crate::domain::error::CompileError;
use crate::domain::schema::{MetadataResolver, RecordSchema, SchemaRegistry};

pub struct CoreApp {
    pub config: AppConfig,
    pub registry: Arc<SchemaRegistry>,
    pub builder: ConditionBuilder<Arc<SchemaRegistry>>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;

        let output = match command {
            Commands::Compile {
                record,
                filter,
                order,
                page,
                page_size,
                sql,
            } => {
                let defaults = app.builder.conditions();
                let conditions = QueryConditions {
                    page: page.unwrap_or(defaults.page),
                    page_size: page_size.unwrap_or(defaults.page_size),
                    filter,
                    order,
                };
                app.compile(&record, &conditions, sql)?
            }
            Commands::Schema => app.describe_schema(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let registry = SchemaRegistry::from_file(&config.schema_path).with_context(|| {
            format!("Failed to load schema file: {}", config.schema_path.display())
        })?;
        let registry = Arc::new(registry);

        tracing::debug!(records = registry.len(), "Schema registry loaded");

        let builder = ConditionBuilder::new(Arc::clone(&registry), config.compiler.clone());
        Ok(Self {
            config,
            registry,
            builder,
        })
    }

    fn init_logging() {
        let default_filter = format!("warn,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Compile one request and render it for the configured dialect
    pub fn compile(
        &self,
        record: &str,
        conditions: &QueryConditions,
        full_statement: bool,
    ) -> Result<JsonValue> {
        let query = self
            .builder
            .compile(conditions, record)
            .map_err(|e| compile_failure(record, e))?;

        let dialect = self.config.dialect.dialect();

        if full_statement {
            let schema = self
                .registry
                .resolve(record)
                .with_context(|| format!("Record not registered: {}", record))?;
            let mut stmt = SqlStatement::new(dialect, schema);
            query.apply_to(&mut stmt);
            return Ok(json!({
                "dialect": self.config.dialect,
                "sql": stmt.sql(),
                "params": stmt.params(),
            }));
        }

        Ok(render_parts(&query, self))
    }

    /// Registered records and their fields
    pub fn describe_schema(&self) -> JsonValue {
        let records: Vec<JsonValue> = self
            .registry
            .records()
            .into_iter()
            .map(describe_record)
            .collect();
        json!({ "records": records })
    }
}

fn compile_failure(record: &str, e: CompileError) -> anyhow::Error {
    if e.is_client_error() {
        tracing::debug!(
            record = %record,
            code = e.code(),
            error = %e,
            "Rejected query conditions"
        );
    }
    anyhow::anyhow!("{} [{}]", e, e.code())
}

fn render_parts(query: &CompiledQuery, app: &CoreApp) -> JsonValue {
    let dialect = app.config.dialect.dialect();
    let condition = query.condition.as_ref().map(|c| {
        json!({
            "fragment": c.render(dialect, 1),
            "values": c.values,
        })
    });
    let order: Vec<String> = query
        .order
        .iter()
        .map(|k| dialect.order_by(&k.column, k.direction))
        .collect();

    json!({
        "dialect": app.config.dialect,
        "condition": condition,
        "order": order,
        "page": query.page,
        "pageSize": query.page_size,
    })
}

fn describe_record(schema: &RecordSchema) -> JsonValue {
    let fields: Vec<JsonValue> = schema
        .fields()
        .iter()
        .map(|f| {
            let operators: Vec<&str> = f.operators().iter().map(|op| op.symbol()).collect();
            json!({
                "name": f.name(),
                "column": f.column(),
                "type": f.value_type(),
                "operators": operators,
                "orderable": f.is_orderable(),
            })
        })
        .collect();

    json!({
        "name": schema.name(),
        "select": schema.select_list(),
        "from": schema.from_clause(),
        "fields": fields,
    })
}
