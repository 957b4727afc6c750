//! Error types for db2i-bridge.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

use crate::client::ClientError;

/// Main error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Session open/close errors (host unreachable, auth failed, TLS, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement errors raised while submitting, executing, or fetching
    /// a SQL statement or CL command. Carries whatever structured fields
    /// the daemon reported.
    #[error("Statement error: {0}")]
    Statement(ClientError),

    /// Invalid parameter JSON supplied for statement binding.
    #[error("Invalid parameters JSON: {0}")]
    Parameters(String),

    /// Configuration errors (invalid config file, bad run settings, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a statement error carrying only a message.
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement(ClientError::message_only(msg))
    }

    /// Creates a parameter-JSON error with the given message.
    pub fn parameters(msg: impl Into<String>) -> Self {
        Self::Parameters(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Statement(_) => "Statement Error",
            Self::Parameters(_) => "Parameter Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<ClientError> for BridgeError {
    fn from(err: ClientError) -> Self {
        Self::Statement(err)
    }
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
