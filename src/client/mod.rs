//! Session client abstraction for the proxy daemon.
//!
//! Provides a trait-based interface over the daemon's session operations so
//! the execution engine can be driven against a real transport or an
//! in-memory client interchangeably. Implementing the wire protocol itself
//! is out of scope for this crate.

mod mock;
mod types;

pub use mock::{FailPoint, FailingSessionClient, MockCalls, MockSessionClient};
pub use types::{
    ClientError, CommandHandle, CommandOutcome, ConnectParams, QueryHandle, QueryOptions,
    ResultPage, Session,
};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface to the remote execution daemon.
///
/// All operations are async and return Results with BridgeError. Handles are
/// produced by `submit_*` calls and consumed by the matching execute/fetch
/// calls; they are never valid across sessions.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Opens a new session with the given connection parameters.
    async fn open_session(&self, params: &ConnectParams) -> Result<Session>;

    /// Closes a session. Must be called exactly once per opened session.
    async fn close_session(&self, session: &Session) -> Result<()>;

    /// Submits a SQL statement, returning a cursor handle.
    async fn submit_query(
        &self,
        session: &Session,
        sql: &str,
        options: &QueryOptions,
    ) -> Result<QueryHandle>;

    /// Executes a submitted statement and returns the first result page.
    async fn execute_handle(&self, handle: &QueryHandle, page_size: u32) -> Result<ResultPage>;

    /// Fetches the next result page for a handle whose previous page was
    /// not terminal.
    async fn fetch_next_page(&self, handle: &QueryHandle, page_size: u32) -> Result<ResultPage>;

    /// Submits a CL command, returning a command handle.
    async fn submit_command(&self, session: &Session, command: &str) -> Result<CommandHandle>;

    /// Executes a submitted CL command. No paging: one call, one outcome.
    async fn execute_command(&self, handle: &CommandHandle) -> Result<CommandOutcome>;
}
