//! Connection to the journey worker.
//!
//! A session moves through `Disconnected → Connecting → Connected | Failed`
//! and back to `Disconnected` on [`ConnectionSession::disconnect`]. Binding
//! runs on a spawned task; its outcome is posted back to the board task
//! tagged with the connect cycle it belongs to, so an outcome that arrives
//! after the session moved on is released instead of adopted.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::board::{BoardEvent, EventSender};
use crate::worker::{BindError, JourneyClientHandle, WorkerBinder};

/// Connection lifecycle state.
#[derive(Debug)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(JourneyClientHandle),
    /// Bind failed; a new `connect()` is required.
    Failed(BindError),
}

/// Summary of [`ConnectionState`] without the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionStatus {
    /// Stable name used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection to the journey worker.
///
/// Exactly one handle is live per connected period. Dropping the session
/// disconnects it, so the binding is released on every exit path.
pub struct ConnectionSession {
    binder: Arc<dyn WorkerBinder>,
    events: EventSender,
    state: ConnectionState,
    cycle: u64,
}

impl ConnectionSession {
    pub(crate) fn new(binder: Arc<dyn WorkerBinder>, events: EventSender) -> Self {
        Self {
            binder,
            events,
            state: ConnectionState::Disconnected,
            cycle: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Current state without the handle.
    pub fn status(&self) -> ConnectionStatus {
        match self.state {
            ConnectionState::Disconnected => ConnectionStatus::Disconnected,
            ConnectionState::Connecting => ConnectionStatus::Connecting,
            ConnectionState::Connected(_) => ConnectionStatus::Connected,
            ConnectionState::Failed(_) => ConnectionStatus::Failed,
        }
    }

    /// The live handle, when connected.
    pub fn handle(&self) -> Option<&JourneyClientHandle> {
        match &self.state {
            ConnectionState::Connected(handle) => Some(handle),
            _ => None,
        }
    }

    /// Start connecting.
    ///
    /// Ignored while already connecting or connected. From `Failed` this
    /// starts a fresh attempt.
    pub fn connect(&mut self) {
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected(_)
        ) {
            debug!(state = %self.status(), "connect ignored");
            return;
        }

        self.cycle += 1;
        let cycle = self.cycle;
        self.state = ConnectionState::Connecting;
        info!(cycle, "connecting to journey worker");

        let bind = self.binder.bind();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = bind.await;
            if events.send(BoardEvent::Bound { cycle, result }).is_err() {
                debug!(cycle, "board gone before bind completed");
            }
        });
    }

    /// Apply a bind outcome for connect cycle `cycle`.
    ///
    /// Returns the handle when the session became connected. Outcomes for a
    /// cycle that is no longer current are dropped, releasing any handle.
    pub fn on_bind_result(
        &mut self,
        cycle: u64,
        result: Result<JourneyClientHandle, BindError>,
    ) -> Option<JourneyClientHandle> {
        if cycle != self.cycle || !matches!(self.state, ConnectionState::Connecting) {
            debug!(
                cycle,
                current = self.cycle,
                state = %self.status(),
                "ignoring stale bind outcome"
            );
            return None;
        }

        match result {
            Ok(handle) => {
                info!(cycle, binding = handle.binding_id(), "connected to journey worker");
                self.state = ConnectionState::Connected(handle.clone());
                Some(handle)
            }
            Err(e) => {
                error!(cycle, error = %e, "failed to bind journey worker");
                self.state = ConnectionState::Failed(e);
                None
            }
        }
    }

    /// Disconnect and release the handle. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        match std::mem::replace(&mut self.state, ConnectionState::Disconnected) {
            ConnectionState::Disconnected => {
                debug!("disconnect ignored: already disconnected");
            }
            ConnectionState::Connecting => {
                self.cycle += 1;
                info!("connect abandoned");
            }
            ConnectionState::Connected(handle) => {
                self.cycle += 1;
                info!(binding = handle.binding_id(), "disconnected from journey worker");
            }
            ConnectionState::Failed(_) => {
                self.cycle += 1;
                debug!("cleared failed connection");
            }
        }
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        if !matches!(self.state, ConnectionState::Disconnected) {
            warn!(state = %self.status(), "session dropped while not disconnected");
            self.disconnect();
        }
    }
}

impl fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .finish()
    }
}
