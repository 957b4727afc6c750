//! Result normalization.
//!
//! Pure shaping functions that map the heterogeneous outcomes of the SQL and
//! CL flows into the stable output shapes emitted to the caller, and arbitrary
//! failures into a complete [`NormalizedError`]. No side effects here; the
//! execution loop stays focused on data acquisition.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of output emitted to the caller.
///
/// Serialized untagged: the field set itself distinguishes the shapes, the
/// way the workflow host expects them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OutputRecord {
    /// Aggregate SQL result: all rows for one work item.
    #[serde(rename_all = "camelCase")]
    SqlAggregate {
        rows: Vec<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        update_count: Option<i64>,
    },

    /// One SQL result row.
    #[serde(rename_all = "camelCase")]
    SqlRow {
        row: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },

    /// CL command outcome.
    #[serde(rename_all = "camelCase")]
    Command {
        success: bool,
        data: Value,
        message: Option<String>,
    },

    /// A tolerated per-item failure.
    #[serde(rename_all = "camelCase")]
    Failure { error: NormalizedError },
}

/// Stable error shape for tolerated failures.
///
/// Every field besides `message` is optional; `message` always has a value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Shapes an aggregate SQL result for one work item.
pub fn shape_sql_aggregate(
    rows: Vec<Value>,
    metadata: Option<Value>,
    update_count: Option<i64>,
    include_metadata: bool,
) -> OutputRecord {
    if include_metadata {
        OutputRecord::SqlAggregate {
            rows,
            metadata,
            update_count,
        }
    } else {
        OutputRecord::SqlAggregate {
            rows,
            metadata: None,
            update_count: None,
        }
    }
}

/// Shapes a per-row SQL result: one record per fetched row.
///
/// When metadata is included it is repeated on every record; it describes the
/// result set, not the individual row.
pub fn shape_sql_per_row(
    rows: Vec<Value>,
    metadata: Option<Value>,
    include_metadata: bool,
) -> Vec<OutputRecord> {
    rows.into_iter()
        .map(|row| OutputRecord::SqlRow {
            row,
            metadata: if include_metadata {
                metadata.clone()
            } else {
                None
            },
        })
        .collect()
}

/// Shapes a CL command outcome.
pub fn shape_command(success: bool, data: Value, error: Option<String>) -> OutputRecord {
    OutputRecord::Command {
        success,
        data,
        message: error,
    }
}

/// Normalizes any bridge failure into a complete [`NormalizedError`].
///
/// Reads each field defensively: statement errors surface whatever structured
/// fields the daemon carried, everything else degrades to the error's display
/// form with its category as the name. Never panics.
pub fn normalize_error(raw: &BridgeError) -> NormalizedError {
    match raw {
        BridgeError::Statement(client_err) => {
            let message = if client_err.message.is_empty() {
                raw.to_string()
            } else {
                client_err.message.clone()
            };
            NormalizedError {
                message,
                name: client_err.name.clone(),
                // Prefer the generic code; fall back to the SQL state when
                // the daemon reported only that.
                code: client_err
                    .code
                    .clone()
                    .or_else(|| client_err.sql_state.clone()),
                sql_state: client_err.sql_state.clone(),
                stack: client_err.stack.clone(),
            }
        }
        other => NormalizedError {
            message: other.to_string(),
            name: Some(other.category().to_string()),
            ..Default::default()
        },
    }
}

impl From<&BridgeError> for NormalizedError {
    fn from(raw: &BridgeError) -> Self {
        normalize_error(raw)
    }
}
