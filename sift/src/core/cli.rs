use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::data::sql::Backend;

use super::constants::{ENV_CONFIG, ENV_DIALECT, ENV_LENIENT_ORDER, ENV_SCHEMA};

#[derive(Parser)]
#[command(name = "sift")]
#[command(
    version,
    about = "Compile filter and order-by text into parameterized SQL",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Path to the record schema file (JSON)
    #[arg(long, short = 's', global = true, env = ENV_SCHEMA)]
    pub schema: Option<PathBuf>,

    /// SQL dialect for rendered placeholders (sqlite, postgres or duckdb)
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_backend)]
    pub dialect: Option<Backend>,

    /// Skip unknown or non-orderable order fields instead of failing
    #[arg(long, global = true, env = ENV_LENIENT_ORDER)]
    pub lenient_order: bool,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        "duckdb" => Ok(Backend::Duckdb),
        _ => Err(format!(
            "Invalid dialect '{}'. Valid options: sqlite, postgres, duckdb",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile filter and order text for a record
    Compile {
        /// Record name as registered in the schema file
        #[arg(long, short = 'r')]
        record: String,

        /// URL-encoded filter expression
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// URL-encoded order expression
        #[arg(long, short = 'o')]
        order: Option<String>,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        page_size: Option<u32>,

        /// Print a full SELECT statement instead of the compiled parts
        #[arg(long)]
        sql: bool,
    },
    /// Validate the schema file and list its records
    Schema,
}

#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub schema: Option<PathBuf>,
    pub dialect: Option<Backend>,
    pub lenient_order: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        schema: cli.schema,
        dialect: cli.dialect,
        lenient_order: cli.lenient_order,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("sqlite"), Ok(Backend::Sqlite));
        assert_eq!(parse_backend("PostgreSQL"), Ok(Backend::Postgres));
        assert_eq!(parse_backend("duckdb"), Ok(Backend::Duckdb));
        assert!(parse_backend("oracle").is_err());
    }

    #[test]
    fn test_compile_command() {
        let cli = Cli::try_parse_from([
            "sift",
            "--schema",
            "records.json",
            "compile",
            "--record",
            "user",
            "--filter",
            "name%20%24sw%20%27Jo%27",
            "--page-size",
            "50",
            "-d",
            "postgres",
        ])
        .unwrap();

        assert_eq!(cli.schema, Some(PathBuf::from("records.json")));
        assert_eq!(cli.dialect, Some(Backend::Postgres));
        let Commands::Compile {
            record,
            filter,
            order,
            page,
            page_size,
            sql,
        } = cli.command
        else {
            panic!("expected compile command");
        };
        assert_eq!(record, "user");
        assert_eq!(filter.as_deref(), Some("name%20%24sw%20%27Jo%27"));
        assert!(order.is_none());
        assert!(page.is_none());
        assert_eq!(page_size, Some(50));
        assert!(!sql);
    }

    #[test]
    fn test_compile_requires_record() {
        assert!(Cli::try_parse_from(["sift", "compile"]).is_err());
    }
}
