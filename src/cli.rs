//! Command-line argument parsing for the db2i-bridge harness.

use db2i_bridge::config::{AdditionalOptions, ExecutionMode, OutputMode, RunConfig, DEFAULT_CL, DEFAULT_SQL};
use db2i_bridge::error::{BridgeError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Offline run harness for the IBM i execution engine.
///
/// Resolves a run configuration from arguments, config file, and environment,
/// executes it against a scripted in-memory session client, and prints the
/// output records as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "db2i-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Statement text: SQL or CL depending on --mode
    #[arg(value_name = "STATEMENT")]
    pub statement: Option<String>,

    /// Execution mode: sql or cl
    #[arg(short, long, default_value = "sql")]
    pub mode: String,

    /// Page size for SQL result paging
    #[arg(long, value_name = "N", default_value = "100")]
    pub fetch_size: u32,

    /// Emit one record per row instead of one aggregate per item
    #[arg(long)]
    pub per_row: bool,

    /// Omit column metadata and update count from aggregate output
    #[arg(long)]
    pub no_metadata: bool,

    /// Request compact row encoding
    #[arg(long)]
    pub terse: bool,

    /// Share one session across all items
    #[arg(long)]
    pub reuse_connection: bool,

    /// Parameter JSON: an array of values or a name-to-value object
    #[arg(long, value_name = "JSON")]
    pub parameters: Option<String>,

    /// Statement timeout in milliseconds (0 = none)
    #[arg(long, value_name = "MS", default_value = "0")]
    pub timeout: u64,

    /// Number of work items to run the statement against
    #[arg(long, value_name = "N", default_value = "1")]
    pub items: usize,

    /// Convert per-item failures into inline error records
    #[arg(long)]
    pub tolerate: bool,

    /// Use named connection from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page-script fixture (JSON array of result pages) for the offline client
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the run configuration from the arguments.
    pub fn to_run_config(&self) -> Result<RunConfig> {
        let mode = ExecutionMode::parse(&self.mode)
            .ok_or_else(|| BridgeError::config(format!("Invalid mode '{}'", self.mode)))?;

        let statement = match (&self.statement, mode) {
            (Some(text), _) => text.clone(),
            (None, ExecutionMode::Sql) => DEFAULT_SQL.to_string(),
            (None, ExecutionMode::Cl) => DEFAULT_CL.to_string(),
        };

        let config = RunConfig {
            mode,
            statement,
            fetch_size: self.fetch_size,
            options: AdditionalOptions {
                terse_results: self.terse,
                include_metadata: !self.no_metadata,
                reuse_connection: self.reuse_connection,
                use_parameters: self.parameters.is_some(),
                parameters_json: self.parameters.clone(),
                query_timeout: self.timeout,
                output_mode: if self.per_row {
                    OutputMode::PerRow
                } else {
                    OutputMode::Single
                },
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(db2i_bridge::config::Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}
