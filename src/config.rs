//! Configuration for db2i-bridge.
//!
//! Covers the two configuration surfaces: the per-run execution settings
//! (mode, statement, paging, tuning options) and the connection credential
//! material, with support for named connection profiles loaded from a TOML
//! file and environment-variable defaults.

use crate::client::ConnectParams;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default statement texts: harmless introspective calls.
pub const DEFAULT_SQL: &str = "SELECT * FROM SYSIBM.SYSDUMMY1";
pub const DEFAULT_CL: &str = "DSPLIBL";

/// What kind of statement a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Execute a SQL statement with result paging.
    #[default]
    Sql,
    /// Execute a CL (control language) command, single shot.
    Cl,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Cl => "cl",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sql" => Some(Self::Sql),
            "cl" => Some(Self::Cl),
            _ => None,
        }
    }
}

/// How SQL results are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// One aggregate record per work item.
    #[default]
    Single,
    /// One record per fetched row.
    PerRow,
}

/// Optional per-run tuning options, each independently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalOptions {
    /// Request compact row encoding from the daemon.
    pub terse_results: bool,

    /// Include column metadata and update count in aggregate output.
    pub include_metadata: bool,

    /// Share one session across all work items in the run.
    pub reuse_connection: bool,

    /// Enable parameter binding from `parameters_json`.
    pub use_parameters: bool,

    /// Textual JSON: an ordered array of values or a name-to-value object.
    /// Parsed only when `use_parameters` is set.
    pub parameters_json: Option<String>,

    /// Statement timeout in milliseconds; 0 means no timeout.
    pub query_timeout: u64,

    /// Aggregate-per-item or one-record-per-row output.
    pub output_mode: OutputMode,
}

impl Default for AdditionalOptions {
    fn default() -> Self {
        Self {
            terse_results: false,
            include_metadata: true,
            reuse_connection: false,
            use_parameters: false,
            parameters_json: None,
            query_timeout: 0,
            output_mode: OutputMode::Single,
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// SQL or CL.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Statement text: SQL text or CL command text depending on mode.
    pub statement: String,

    /// Page size for SQL result paging. Must be at least 1.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: u32,

    #[serde(default)]
    pub options: AdditionalOptions,
}

fn default_fetch_size() -> u32 {
    100
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sql,
            statement: DEFAULT_SQL.to_string(),
            fetch_size: default_fetch_size(),
            options: AdditionalOptions::default(),
        }
    }
}

impl RunConfig {
    /// Validates run-level settings before the main loop starts.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_size == 0 {
            return Err(BridgeError::config("fetch size must be at least 1"));
        }
        if self.statement.trim().is_empty() {
            return Err(BridgeError::config("statement text must not be empty"));
        }
        Ok(())
    }
}

/// Connection credential material for the proxy daemon.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectionProfile {
    /// Daemon host.
    pub host: String,

    /// Daemon port.
    pub port: u16,

    /// IBM i user profile.
    pub user: String,

    /// User password. Treated as a secret; never logged.
    pub password: String,

    /// Skip TLS certificate verification.
    pub ignore_unauthorized: bool,

    /// Custom trust anchor (PEM text). Presence forces verification on.
    pub ca: Option<String>,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8085,
            user: String::new(),
            password: String::new(),
            ignore_unauthorized: true,
            ca: None,
        }
    }
}

// Password must never leak through logs or debug dumps.
impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ignore_unauthorized", &self.ignore_unauthorized)
            .field("ca", &self.ca.as_ref().map(|_| "<pem>"))
            .finish()
    }
}

impl ConnectionProfile {
    /// Derives the daemon connection parameters.
    ///
    /// `reject_unauthorized` is the negation of the ignore toggle, except
    /// that a custom trust anchor always enforces verification.
    pub fn connect_params(&self) -> ConnectParams {
        let reject_unauthorized = !self.ignore_unauthorized || self.ca.is_some();
        ConnectParams {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            reject_unauthorized,
            ca: self.ca.clone(),
        }
    }

    /// Fills empty fields from `DB2I_*` environment variables.
    pub fn apply_env_defaults(&mut self) {
        if self.user.is_empty() {
            if let Ok(user) = std::env::var("DB2I_USER") {
                self.user = user;
            }
        }
        if self.password.is_empty() {
            if let Ok(password) = std::env::var("DB2I_PASSWORD") {
                self.password = password;
            }
        }
        if let Ok(host) = std::env::var("DB2I_HOST") {
            if self.host == "localhost" {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("DB2I_PORT") {
            if let Ok(port) = port.parse() {
                if self.port == 8085 {
                    self.port = port;
                }
            }
        }
    }

    /// Returns a loggable description with no secret material.
    pub fn display_string(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named connection profiles.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionProfile>,
}

impl Config {
    /// Returns the default config file path
    /// (`<platform config dir>/db2i-bridge/config.toml`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("db2i-bridge")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default (empty) configuration; a malformed
    /// file is a configuration error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::config(format!("Cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| BridgeError::config(format!("Invalid config file {}: {e}", path.display())))
    }

    /// Looks up a connection profile by name, or the `default` entry when
    /// no name is given.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionProfile> {
        self.connections.get(name.unwrap_or("default"))
    }
}
