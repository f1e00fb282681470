//! Current route selection and result delivery.
//!
//! The coordinator owns the selected index. Every selection change issues
//! a fresh fetch; older fetches are never cancelled, their results are
//! simply not rendered once they no longer match the selection.

use std::sync::Arc;

use tracing::{debug, info};

use crate::board::{BoardEvent, EventSender};
use crate::domain::{DomainError, RoutePair, RoutePairCatalog};
use crate::worker::{JourneyClientHandle, JourneyQueryResult};

/// Receives what the presentation layer should show.
///
/// Called only from the board task. Each `on_result` replaces whatever was
/// shown before; an empty list is a valid result.
pub trait RenderSink: Send + 'static {
    /// A fetch for `pair` has started; previous results are out of date.
    fn on_pending(&mut self, _pair: &RoutePair) {}

    /// The result for the currently selected pair.
    fn on_result(&mut self, pair: &RoutePair, result: JourneyQueryResult);
}

impl<F> RenderSink for F
where
    F: FnMut(&RoutePair, JourneyQueryResult) + Send + 'static,
{
    fn on_result(&mut self, pair: &RoutePair, result: JourneyQueryResult) {
        self(pair, result)
    }
}

/// Selection bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// Index of the selected pair in the catalog
    pub current_index: usize,
    /// Index of the pair whose result was last rendered
    pub last_delivered_index: Option<usize>,
    /// Fetches issued so far
    pub fetches_issued: u64,
    /// Results discarded because the selection had moved on
    pub stale_discards: u64,
}

/// Owns the selected route pair and decides which results are rendered.
pub struct SelectionCoordinator<R> {
    catalog: Arc<RoutePairCatalog>,
    state: SelectionState,
    handle: Option<JourneyClientHandle>,
    seen_handle: bool,
    sink: R,
    events: EventSender,
}

impl<R: RenderSink> SelectionCoordinator<R> {
    pub(crate) fn new(catalog: Arc<RoutePairCatalog>, sink: R, events: EventSender) -> Self {
        Self {
            catalog,
            state: SelectionState::default(),
            handle: None,
            seen_handle: false,
            sink,
            events,
        }
    }

    /// Selection bookkeeping.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// The selected pair.
    pub fn current_pair(&self) -> &RoutePair {
        &self.catalog.pairs()[self.state.current_index]
    }

    /// Record a new handle and fetch the current selection.
    ///
    /// Fetches again on every reconnect.
    pub fn on_connected(&mut self, handle: JourneyClientHandle) {
        if self.seen_handle {
            debug!(binding = handle.binding_id(), "reconnected; refreshing selection");
        } else {
            info!(binding = handle.binding_id(), "first handle; loading selection");
        }
        self.seen_handle = true;
        self.handle = Some(handle);
        self.issue_fetch();
    }

    /// Forget the handle. Fetches already in flight still deliver.
    pub fn on_disconnected(&mut self) {
        self.handle = None;
    }

    /// Select the next pair and fetch it.
    ///
    /// Without a handle the selection still moves; the fetch happens on the
    /// next connect.
    pub fn advance_selection(&mut self) -> Result<usize, DomainError> {
        let next = self.catalog.next(self.state.current_index)?;
        self.state.current_index = next;
        info!(index = next, route = %self.current_pair(), "selection advanced");
        self.issue_fetch();
        Ok(next)
    }

    /// Deliver a completed fetch for catalog index `index`.
    ///
    /// Renders only if `index` is still selected. Returns whether it did.
    pub fn deliver(&mut self, index: usize, result: JourneyQueryResult) -> bool {
        if index != self.state.current_index {
            self.state.stale_discards += 1;
            debug!(
                index,
                current = self.state.current_index,
                "discarding result for stale selection"
            );
            return false;
        }

        match &result {
            Ok(journeys) => debug!(index, count = journeys.len(), "rendering journeys"),
            Err(e) => info!(index, kind = %e.kind(), error = %e, "rendering failed lookup"),
        }

        self.state.last_delivered_index = Some(index);
        let pair = &self.catalog.pairs()[index];
        self.sink.on_result(pair, result);
        true
    }

    fn issue_fetch(&mut self) {
        let Some(handle) = &self.handle else {
            debug!("no worker handle; fetch deferred until connected");
            return;
        };

        let index = self.state.current_index;
        let pair = &self.catalog.pairs()[index];
        self.sink.on_pending(pair);

        let request = handle.request_journey(pair, None);
        self.state.fetches_issued += 1;

        let events = self.events.clone();
        tokio::spawn(async move {
            let result = request.await;
            if events.send(BoardEvent::Fetched { index, result }).is_err() {
                debug!(index, "board gone before fetch completed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navitia::FetchError;
    use crate::worker::{JourneyService, JourneySource};
    use chrono::NaiveDateTime;
    use futures::future::BoxFuture;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct EmptySource;

    impl JourneySource for EmptySource {
        fn journeys<'a>(
            &'a self,
            _origin: &'a str,
            _destination: &'a str,
            _date: Option<NaiveDateTime>,
        ) -> BoxFuture<'a, JourneyQueryResult> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    type Rendered = Arc<Mutex<Vec<(String, bool)>>>;

    fn recording_sink() -> (Rendered, impl RenderSink) {
        let rendered: Rendered = Arc::default();
        let sink_log = Arc::clone(&rendered);
        let sink = move |pair: &RoutePair, result: JourneyQueryResult| {
            sink_log
                .lock()
                .unwrap()
                .push((pair.origin_id.clone(), result.is_ok()));
        };
        (rendered, sink)
    }

    fn catalog() -> Arc<RoutePairCatalog> {
        Arc::new(
            RoutePairCatalog::new(vec![
                RoutePair::new("A", "A", "B", "B"),
                RoutePair::new("B", "B", "A", "A"),
                RoutePair::new("C", "C", "A", "A"),
            ])
            .unwrap(),
        )
    }

    async fn next_fetched(rx: &mut mpsc::UnboundedReceiver<BoardEvent>) -> usize {
        match rx.recv().await {
            Some(BoardEvent::Fetched { index, .. }) => index,
            other => panic!("expected fetch completion, got {other:?}"),
        }
    }

    #[test]
    fn advance_cycles_back_to_start() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (_, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        for expected in [1, 2, 0] {
            assert_eq!(coordinator.advance_selection().unwrap(), expected);
        }
        assert_eq!(coordinator.state().current_index, 0);
        assert_eq!(coordinator.state().fetches_issued, 0);
    }

    #[test]
    fn stale_result_is_discarded() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (rendered, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        coordinator.advance_selection().unwrap();

        assert!(coordinator.deliver(1, Ok(Vec::new())));
        assert!(!coordinator.deliver(0, Ok(Vec::new())));

        assert_eq!(*rendered.lock().unwrap(), vec![("B".to_string(), true)]);
        let state = coordinator.state();
        assert_eq!(state.last_delivered_index, Some(1));
        assert_eq!(state.stale_discards, 1);
    }

    #[test]
    fn failure_is_rendered_like_success() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (rendered, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        let failure = Err(FetchError::Http {
            status: 503,
            body: "maintenance".to_string(),
        });
        assert!(coordinator.deliver(0, failure));
        assert_eq!(*rendered.lock().unwrap(), vec![("A".to_string(), false)]);
    }

    #[tokio::test]
    async fn connect_fetches_current_selection() {
        let worker = JourneyService::start(EmptySource);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (rendered, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        coordinator.advance_selection().unwrap();
        coordinator.on_connected(worker.attach().unwrap());

        let index = next_fetched(&mut rx).await;
        assert_eq!(index, 1);
        assert_eq!(coordinator.state().fetches_issued, 1);
        assert!(rendered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn advance_while_pending_supersedes() {
        let worker = JourneyService::start(EmptySource);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (rendered, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        coordinator.on_connected(worker.attach().unwrap());
        coordinator.advance_selection().unwrap();

        let mut completed = vec![next_fetched(&mut rx).await, next_fetched(&mut rx).await];
        completed.sort_unstable();
        assert_eq!(completed, vec![0, 1]);

        // Deliver in either order: only the current pair renders
        coordinator.deliver(0, Ok(Vec::new()));
        coordinator.deliver(1, Ok(Vec::new()));
        assert_eq!(*rendered.lock().unwrap(), vec![("B".to_string(), true)]);
        assert_eq!(coordinator.state().stale_discards, 1);
    }

    #[tokio::test]
    async fn reconnect_refetches() {
        let worker = JourneyService::start(EmptySource);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_, sink) = recording_sink();
        let mut coordinator = SelectionCoordinator::new(catalog(), sink, tx);

        coordinator.on_connected(worker.attach().unwrap());
        next_fetched(&mut rx).await;

        coordinator.on_disconnected();
        coordinator.advance_selection().unwrap();
        assert_eq!(coordinator.state().fetches_issued, 1);

        coordinator.on_connected(worker.attach().unwrap());
        assert_eq!(next_fetched(&mut rx).await, 1);
        assert_eq!(coordinator.state().fetches_issued, 2);
    }

    #[test]
    fn pending_hook_called_before_fetch() {
        struct Counting(Arc<Mutex<Vec<String>>>);

        impl RenderSink for Counting {
            fn on_pending(&mut self, pair: &RoutePair) {
                self.0.lock().unwrap().push(format!("pending {}", pair.origin_id));
            }

            fn on_result(&mut self, pair: &RoutePair, _result: JourneyQueryResult) {
                self.0.lock().unwrap().push(format!("result {}", pair.origin_id));
            }
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let _guard = runtime.enter();

        let worker = JourneyService::start(EmptySource);
        let (tx, _rx) = mpsc::unbounded_channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator =
            SelectionCoordinator::new(catalog(), Counting(Arc::clone(&log)), tx);

        coordinator.on_connected(worker.attach().unwrap());
        coordinator.deliver(0, Ok(Vec::new()));

        assert_eq!(*log.lock().unwrap(), vec!["pending A", "result A"]);
    }
}
