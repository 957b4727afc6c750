//! db2i-bridge - query execution and result paging for IBM i (Db2-on-i)
//! through a lightweight proxy daemon.
//!
//! The crate turns a SQL statement or CL command into a (possibly
//! multi-page) result set, manages the session lifecycle, applies optional
//! parameter binding and per-run tuning options, and normalizes success and
//! failure outcomes into stable output shapes. The wire protocol itself is
//! behind the [`client::SessionClient`] trait.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod run;
pub mod session;

pub use client::SessionClient;
pub use config::{AdditionalOptions, ConnectionProfile, ExecutionMode, OutputMode, RunConfig};
pub use error::{BridgeError, Result};
pub use output::{NormalizedError, OutputRecord};
pub use run::{execute_run, WorkItem};
