//! Wire-facing types for the session client.
//!
//! Defines the handles, option blocks, and result pages exchanged with the
//! proxy daemon, independent of any concrete transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Parameters for opening a session against the daemon.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectParams {
    /// Daemon host.
    pub host: String,

    /// Daemon port.
    pub port: u16,

    /// IBM i user profile.
    pub user: String,

    /// User password.
    pub password: String,

    /// Whether to reject TLS certificates that fail verification.
    pub reject_unauthorized: bool,

    /// Custom trust anchor (PEM). Presence implies verification is enforced.
    pub ca: Option<String>,
}

// Password must never leak through logs or debug dumps.
impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("reject_unauthorized", &self.reject_unauthorized)
            .field("ca", &self.ca.as_ref().map(|_| "<pem>"))
            .finish()
    }
}

/// An open, stateful session on the daemon.
///
/// Owned by whichever caller opened it; must be closed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    /// Daemon-assigned session identifier.
    pub id: u64,
}

/// Server-side cursor reference for a submitted SQL statement.
///
/// Consumed by execute/fetch calls; never reused across statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHandle {
    pub id: u64,
    pub session_id: u64,
}

/// Server-side reference for a submitted CL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    pub id: u64,
    pub session_id: u64,
}

/// Per-statement tuning options forwarded to the daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Request compact row encoding from the daemon.
    #[serde(default)]
    pub terse_results: bool,

    /// Ordered values or name-to-value mapping for parameter markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// Advisory statement timeout in milliseconds. Absent means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

/// One fetch's worth of result data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    /// Rows for this page, in server order.
    #[serde(default)]
    pub rows: Vec<Value>,

    /// Terminal marker: true when no further pages exist.
    #[serde(default)]
    pub is_done: bool,

    /// Opaque column descriptor. Only meaningful for SQL statements.
    #[serde(default)]
    pub metadata: Option<Value>,

    /// Rows affected by DML. Only meaningful for SQL statements.
    #[serde(default)]
    pub update_count: Option<i64>,
}

impl ResultPage {
    /// A terminal page with no rows.
    pub fn empty() -> Self {
        Self {
            is_done: true,
            ..Default::default()
        }
    }
}

/// Result of executing a CL command handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,

    /// Command output as reported by the daemon (joblog text, message data).
    #[serde(default)]
    pub data: Value,

    /// Error text when the command failed, if any.
    #[serde(default)]
    pub error: Option<String>,
}

/// A loosely-shaped failure reported by the daemon.
///
/// The daemon does not guarantee a consistent error shape; every field
/// besides `message` is optional and read defensively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientError {
    pub message: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Generic error code; preferred over the SQL-specific code.
    #[serde(default)]
    pub code: Option<String>,

    /// SQLSTATE reported by Db2, when the failure carries one.
    #[serde(default)]
    pub sql_state: Option<String>,

    /// Server-side stack text, when the daemon forwards one.
    #[serde(default)]
    pub stack: Option<String>,
}

impl ClientError {
    /// Builds a client error carrying only a message.
    pub fn message_only(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(state) = &self.sql_state {
            write!(f, " (SQLSTATE {state})")?;
        }
        Ok(())
    }
}
