//! The journey board: session and selection driven from one task.
//!
//! All state mutation and every render callback happen on the board task.
//! Consumers talk to it through [`JourneyBoard`], and background work
//! (binds, fetches) reports back over an internal channel, so the
//! "is this result still current?" decision never races with a selection
//! change.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::{RoutePair, RoutePairCatalog};
use crate::selection::{RenderSink, SelectionCoordinator, SelectionState};
use crate::session::{ConnectionSession, ConnectionStatus};
use crate::worker::{BindError, JourneyClientHandle, JourneyQueryResult, WorkerBinder};

/// Completion of background work, posted back to the board task.
#[derive(Debug)]
pub(crate) enum BoardEvent {
    /// A bind started by connect cycle `cycle` finished
    Bound {
        cycle: u64,
        result: Result<JourneyClientHandle, BindError>,
    },
    /// A fetch for catalog index `index` finished
    Fetched {
        index: usize,
        result: JourneyQueryResult,
    },
}

pub(crate) type EventSender = mpsc::UnboundedSender<BoardEvent>;

/// Requests from consumers.
#[derive(Debug)]
enum Command {
    Connect,
    Disconnect,
    AdvanceSelection,
    Status(oneshot::Sender<BoardStatus>),
    Close,
}

/// Errors from talking to the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The board task has exited
    #[error("journey board has shut down")]
    Closed,
}

/// Snapshot of the board's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStatus {
    /// Connection lifecycle state
    pub connection: ConnectionStatus,
    /// Selection bookkeeping
    pub selection: SelectionState,
    /// The selected route pair
    pub current_pair: RoutePair,
}

/// Consumer-facing handle to a running board.
///
/// Cloning is cheap. The board task exits when [`close`](Self::close) is
/// called or every clone is dropped; either way it disconnects first.
#[derive(Debug, Clone)]
pub struct JourneyBoard {
    commands: mpsc::UnboundedSender<Command>,
}

impl JourneyBoard {
    /// Start a board task.
    ///
    /// The board starts disconnected with the first catalog pair selected.
    /// Must be called from within a tokio runtime.
    pub fn spawn<R: RenderSink>(
        binder: Arc<dyn WorkerBinder>,
        catalog: Arc<RoutePairCatalog>,
        sink: R,
    ) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = BoardTask {
            commands: command_rx,
            events: event_rx,
            session: ConnectionSession::new(binder, event_tx.clone()),
            coordinator: SelectionCoordinator::new(catalog, sink, event_tx),
        };

        let join = tokio::spawn(task.run());
        (
            Self {
                commands: command_tx,
            },
            join,
        )
    }

    /// Start connecting to the worker.
    pub fn connect(&self) -> Result<(), BoardError> {
        self.send(Command::Connect)
    }

    /// Disconnect from the worker. Safe to call repeatedly.
    pub fn disconnect(&self) -> Result<(), BoardError> {
        self.send(Command::Disconnect)
    }

    /// Select the next route pair and fetch its journeys.
    pub fn advance_selection(&self) -> Result<(), BoardError> {
        self.send(Command::AdvanceSelection)
    }

    /// Current state, after every command sent before this call.
    pub async fn status(&self) -> Result<BoardStatus, BoardError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Status(tx))?;
        rx.await.map_err(|_| BoardError::Closed)
    }

    /// Disconnect and stop the board task.
    pub fn close(&self) -> Result<(), BoardError> {
        self.send(Command::Close)
    }

    fn send(&self, command: Command) -> Result<(), BoardError> {
        self.commands.send(command).map_err(|_| BoardError::Closed)
    }
}

/// State owned by the board task.
struct BoardTask<R> {
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedReceiver<BoardEvent>,
    session: ConnectionSession,
    coordinator: SelectionCoordinator<R>,
}

impl<R: RenderSink> BoardTask<R> {
    async fn run(mut self) {
        info!(route = %self.coordinator.current_pair(), "journey board started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Close) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = self.events.recv() => self.handle_event(event),
            }
        }

        self.disconnect();
        info!("journey board stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => self.session.connect(),
            Command::Disconnect => self.disconnect(),
            Command::AdvanceSelection => {
                if let Err(e) = self.coordinator.advance_selection() {
                    error!(error = %e, "cannot advance selection");
                }
            }
            Command::Status(reply) => {
                if reply.send(self.status()).is_err() {
                    debug!("status requester went away");
                }
            }
            Command::Close => {}
        }
    }

    fn handle_event(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::Bound { cycle, result } => {
                if let Some(handle) = self.session.on_bind_result(cycle, result) {
                    self.coordinator.on_connected(handle);
                }
            }
            BoardEvent::Fetched { index, result } => {
                self.coordinator.deliver(index, result);
            }
        }
    }

    fn disconnect(&mut self) {
        self.coordinator.on_disconnected();
        self.session.disconnect();
    }

    fn status(&self) -> BoardStatus {
        BoardStatus {
            connection: self.session.status(),
            selection: self.coordinator.state(),
            current_pair: self.coordinator.current_pair().clone(),
        }
    }
}
