//! Mock session clients for testing.
//!
//! Provides in-memory daemon stand-ins: a scripted client that replays a
//! fixed page sequence and records every call, and a failing client that
//! errors at a configurable point in the per-item flow.

use super::{
    ClientError, CommandHandle, CommandOutcome, ConnectParams, QueryHandle, QueryOptions,
    ResultPage, Session, SessionClient,
};
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Call counters and captured arguments, shared with tests.
#[derive(Debug, Default, Clone)]
pub struct MockCalls {
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub queries_submitted: usize,
    pub execute_calls: usize,
    pub fetch_calls: usize,
    pub commands_submitted: usize,
    pub command_executions: usize,
    /// Options captured from the most recent `submit_query`.
    pub last_query_options: Option<QueryOptions>,
    /// Statement text captured from the most recent submission.
    pub last_statement: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    calls: MockCalls,
    next_id: u64,
    /// Index of the next page to hand out for the current handle.
    cursor: usize,
}

/// A mock session client that replays a scripted page sequence.
///
/// Each `submit_query` resets the page cursor, so the same script serves
/// every statement in a run. `execute_handle` returns the first page and
/// `fetch_next_page` walks the remainder.
pub struct MockSessionClient {
    pages: Vec<ResultPage>,
    command_outcome: CommandOutcome,
    state: Mutex<MockState>,
}

impl MockSessionClient {
    /// Creates a mock whose every statement yields a single terminal page
    /// with one row.
    pub fn new() -> Self {
        Self::with_pages(vec![ResultPage {
            rows: vec![serde_json::json!({"RESULT": 1})],
            is_done: true,
            metadata: Some(serde_json::json!([{"name": "RESULT", "type": "INTEGER"}])),
            update_count: Some(-1),
        }])
    }

    /// Creates a mock that replays the given pages per statement.
    ///
    /// The last page should have `is_done` set; the paging loop will call
    /// `fetch_next_page` until it sees it.
    pub fn with_pages(pages: Vec<ResultPage>) -> Self {
        Self {
            pages,
            command_outcome: CommandOutcome {
                success: true,
                data: Value::Null,
                error: None,
            },
            state: Mutex::new(MockState::default()),
        }
    }

    /// Sets the outcome returned for every CL command execution.
    pub fn with_command_outcome(mut self, outcome: CommandOutcome) -> Self {
        self.command_outcome = outcome;
        self
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> MockCalls {
        self.state.lock().expect("mock state poisoned").calls.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

impl Default for MockSessionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionClient for MockSessionClient {
    async fn open_session(&self, _params: &ConnectParams) -> Result<Session> {
        let mut state = self.state();
        state.calls.sessions_opened += 1;
        state.next_id += 1;
        Ok(Session { id: state.next_id })
    }

    async fn close_session(&self, _session: &Session) -> Result<()> {
        self.state().calls.sessions_closed += 1;
        Ok(())
    }

    async fn submit_query(
        &self,
        session: &Session,
        sql: &str,
        options: &QueryOptions,
    ) -> Result<QueryHandle> {
        let mut state = self.state();
        state.calls.queries_submitted += 1;
        state.calls.last_query_options = Some(options.clone());
        state.calls.last_statement = Some(sql.to_string());
        state.cursor = 0;
        state.next_id += 1;
        Ok(QueryHandle {
            id: state.next_id,
            session_id: session.id,
        })
    }

    async fn execute_handle(&self, _handle: &QueryHandle, _page_size: u32) -> Result<ResultPage> {
        let mut state = self.state();
        state.calls.execute_calls += 1;
        let page = self.pages.first().cloned().unwrap_or_else(ResultPage::empty);
        state.cursor = 1;
        Ok(page)
    }

    async fn fetch_next_page(&self, _handle: &QueryHandle, _page_size: u32) -> Result<ResultPage> {
        let mut state = self.state();
        state.calls.fetch_calls += 1;
        let page = self
            .pages
            .get(state.cursor)
            .cloned()
            .unwrap_or_else(ResultPage::empty);
        state.cursor += 1;
        Ok(page)
    }

    async fn submit_command(&self, session: &Session, command: &str) -> Result<CommandHandle> {
        let mut state = self.state();
        state.calls.commands_submitted += 1;
        state.calls.last_statement = Some(command.to_string());
        state.next_id += 1;
        Ok(CommandHandle {
            id: state.next_id,
            session_id: session.id,
        })
    }

    async fn execute_command(&self, _handle: &CommandHandle) -> Result<CommandOutcome> {
        self.state().calls.command_executions += 1;
        Ok(self.command_outcome.clone())
    }
}

/// Where a [`FailingSessionClient`] raises its error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Open,
    Submit,
    Execute,
    Fetch,
    Command,
}

/// A session client that fails at a fixed point, for error-path tests.
///
/// Calls before the fail point behave like [`MockSessionClient`] with a
/// two-page script so the fetch path is reachable.
pub struct FailingSessionClient {
    fail_at: FailPoint,
    error: ClientError,
    inner: MockSessionClient,
}

impl FailingSessionClient {
    pub fn new(fail_at: FailPoint) -> Self {
        Self::with_error(
            fail_at,
            ClientError {
                message: "injected failure".to_string(),
                name: Some("MockError".to_string()),
                code: Some("-104".to_string()),
                sql_state: Some("42601".to_string()),
                stack: None,
            },
        )
    }

    pub fn with_error(fail_at: FailPoint, error: ClientError) -> Self {
        Self {
            fail_at,
            error,
            inner: MockSessionClient::with_pages(vec![
                ResultPage {
                    rows: vec![serde_json::json!({"N": 1})],
                    is_done: false,
                    metadata: None,
                    update_count: None,
                },
                ResultPage::empty(),
            ]),
        }
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> MockCalls {
        self.inner.calls()
    }

    fn fail(&self) -> BridgeError {
        BridgeError::Statement(self.error.clone())
    }
}

#[async_trait]
impl SessionClient for FailingSessionClient {
    async fn open_session(&self, params: &ConnectParams) -> Result<Session> {
        if self.fail_at == FailPoint::Open {
            return Err(BridgeError::connection(self.error.message.clone()));
        }
        self.inner.open_session(params).await
    }

    async fn close_session(&self, session: &Session) -> Result<()> {
        self.inner.close_session(session).await
    }

    async fn submit_query(
        &self,
        session: &Session,
        sql: &str,
        options: &QueryOptions,
    ) -> Result<QueryHandle> {
        if self.fail_at == FailPoint::Submit {
            return Err(self.fail());
        }
        self.inner.submit_query(session, sql, options).await
    }

    async fn execute_handle(&self, handle: &QueryHandle, page_size: u32) -> Result<ResultPage> {
        if self.fail_at == FailPoint::Execute {
            return Err(self.fail());
        }
        self.inner.execute_handle(handle, page_size).await
    }

    async fn fetch_next_page(&self, handle: &QueryHandle, page_size: u32) -> Result<ResultPage> {
        if self.fail_at == FailPoint::Fetch {
            return Err(self.fail());
        }
        self.inner.fetch_next_page(handle, page_size).await
    }

    async fn submit_command(&self, session: &Session, command: &str) -> Result<CommandHandle> {
        if self.fail_at == FailPoint::Command {
            return Err(self.fail());
        }
        self.inner.submit_command(session, command).await
    }

    async fn execute_command(&self, handle: &CommandHandle) -> Result<CommandOutcome> {
        if self.fail_at == FailPoint::Command {
            return Err(self.fail());
        }
        self.inner.execute_command(handle).await
    }
}
