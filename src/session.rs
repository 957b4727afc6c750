//! Session lifecycle management.
//!
//! Owns the open/close contract for daemon sessions: either a fresh session
//! per work item, or one shared session for the whole run. The policy is
//! decided once, before the run's main loop, so the per-item code never
//! branches on ad hoc open/close conditions.

use crate::client::{ConnectParams, Session, SessionClient};
use crate::error::Result;
use tracing::{debug, warn};

/// Brokers session acquisition and release for one run.
///
/// Exclusively owns the optional shared session; no other component may
/// acquire or close it. Execution is strictly sequential, so no locking is
/// needed here.
pub struct SessionBroker<'a> {
    client: &'a dyn SessionClient,
    params: &'a ConnectParams,
    reuse: bool,
    shared: Option<Session>,
}

impl<'a> SessionBroker<'a> {
    /// Creates a broker with the reuse policy fixed for the whole run.
    pub fn new(client: &'a dyn SessionClient, params: &'a ConnectParams, reuse: bool) -> Self {
        Self {
            client,
            params,
            reuse,
            shared: None,
        }
    }

    /// Resolves the session for the next work item.
    ///
    /// With reuse enabled, lazily opens one session on the first call and
    /// returns it on every subsequent call. Otherwise opens a fresh session
    /// per call.
    pub async fn acquire(&mut self) -> Result<Session> {
        if self.reuse {
            if let Some(session) = &self.shared {
                return Ok(session.clone());
            }
            let session = self.client.open_session(self.params).await?;
            debug!(session_id = session.id, "opened shared session");
            self.shared = Some(session.clone());
            return Ok(session);
        }

        let session = self.client.open_session(self.params).await?;
        debug!(session_id = session.id, "opened per-item session");
        Ok(session)
    }

    /// Releases a session after one item's work completes.
    ///
    /// A no-op for the shared session; a per-item session is closed
    /// immediately, on success and failure paths alike.
    pub async fn release_item(&mut self, session: Session) -> Result<()> {
        if self.reuse {
            return Ok(());
        }
        debug!(session_id = session.id, "closing per-item session");
        self.client.close_session(&session).await
    }

    /// Closes the shared session, if one was opened. Idempotent.
    pub async fn finish(&mut self) -> Result<()> {
        if let Some(session) = self.shared.take() {
            debug!(session_id = session.id, "closing shared session");
            self.client.close_session(&session).await?;
        }
        Ok(())
    }

    /// Best-effort variant of [`finish`](Self::finish) for error paths,
    /// where the original failure must still surface.
    pub async fn finish_best_effort(&mut self) {
        if let Err(e) = self.finish().await {
            warn!("failed to close shared session: {e}");
        }
    }
}
