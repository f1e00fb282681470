//! Background journey worker and the handles bound to it.
//!
//! The worker owns the journey source (live API or fixtures). A session
//! binds to it through [`WorkerBinder`] and receives a
//! [`JourneyClientHandle`]; every request made through a handle runs on its
//! own spawned task, so callers never block on the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::domain::{Journey, RoutePair};
use crate::navitia::FetchError;

/// Outcome of one journey lookup.
pub type JourneyQueryResult = Result<Vec<Journey>, FetchError>;

/// Anything that can look up journeys between two identifiers.
///
/// This abstraction allows the worker to run against the live API, canned
/// fixtures, or test doubles.
pub trait JourneySource: Send + Sync {
    /// Look up journeys from `origin` to `destination`.
    fn journeys<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
        date: Option<NaiveDateTime>,
    ) -> BoxFuture<'a, JourneyQueryResult>;
}

/// Errors from binding to the worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The worker has been stopped
    #[error("journey worker is stopped")]
    Stopped,

    /// Binding failed for another reason
    #[error("bind failed: {0}")]
    Failed(String),
}

/// Something a session can bind to.
pub trait WorkerBinder: Send + Sync {
    /// Start binding. Resolves once with a handle or an error.
    fn bind(&self) -> BoxFuture<'static, Result<JourneyClientHandle, BindError>>;
}

struct WorkerInner {
    source: Arc<dyn JourneySource>,
    stopped: AtomicBool,
    live_bindings: AtomicUsize,
    next_binding: AtomicU64,
}

/// The background worker.
///
/// Cloning is cheap; clones refer to the same worker.
#[derive(Clone)]
pub struct JourneyService {
    inner: Arc<WorkerInner>,
}

impl JourneyService {
    /// Start a worker over a journey source.
    pub fn start(source: impl JourneySource + 'static) -> Self {
        info!("journey worker started");
        Self {
            inner: Arc::new(WorkerInner {
                source: Arc::new(source),
                stopped: AtomicBool::new(false),
                live_bindings: AtomicUsize::new(0),
                next_binding: AtomicU64::new(1),
            }),
        }
    }

    /// Stop the worker.
    ///
    /// New binds fail with [`BindError::Stopped`] and existing handles
    /// answer new requests with a transport failure. Requests already in
    /// flight run to completion.
    pub fn stop(&self) {
        if !self.inner.stopped.swap(true, Ordering::SeqCst) {
            info!(
                live_bindings = self.live_bindings(),
                "journey worker stopped"
            );
        }
    }

    /// Returns true once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Number of handles currently bound and not yet released.
    pub fn live_bindings(&self) -> usize {
        self.inner.live_bindings.load(Ordering::SeqCst)
    }

    /// Bind synchronously.
    pub fn attach(&self) -> Result<JourneyClientHandle, BindError> {
        if self.is_stopped() {
            return Err(BindError::Stopped);
        }
        let id = self.inner.next_binding.fetch_add(1, Ordering::SeqCst);
        self.inner.live_bindings.fetch_add(1, Ordering::SeqCst);
        debug!(binding = id, "worker binding created");
        Ok(JourneyClientHandle {
            binding: Arc::new(Binding {
                id,
                worker: Arc::clone(&self.inner),
            }),
        })
    }
}

impl WorkerBinder for JourneyService {
    fn bind(&self) -> BoxFuture<'static, Result<JourneyClientHandle, BindError>> {
        let worker = self.clone();
        Box::pin(async move { worker.attach() })
    }
}

/// One binding to the worker. Dropping the last handle clone releases it.
struct Binding {
    id: u64,
    worker: Arc<WorkerInner>,
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.worker.live_bindings.fetch_sub(1, Ordering::SeqCst);
        debug!(binding = self.id, "worker binding released");
    }
}

/// A live binding to the worker, able to request journeys.
///
/// Clones share the binding. The handle holds no selection state and does
/// not cache or deduplicate: every call is an independent lookup.
#[derive(Clone)]
pub struct JourneyClientHandle {
    binding: Arc<Binding>,
}

impl JourneyClientHandle {
    /// Identifier of the underlying binding.
    pub fn binding_id(&self) -> u64 {
        self.binding.id
    }

    /// Request journeys for a route pair.
    ///
    /// The lookup is spawned immediately on the runtime; the returned future
    /// only waits for its result. Must be called from within a tokio runtime.
    pub fn request_journey(
        &self,
        pair: &RoutePair,
        date: Option<NaiveDateTime>,
    ) -> impl Future<Output = JourneyQueryResult> + Send + use<> {
        let worker = Arc::clone(&self.binding.worker);
        let origin = pair.origin_id.clone();
        let destination = pair.destination_id.clone();
        let binding = self.binding.id;

        debug!(binding, %origin, %destination, "journey request issued");

        let task = tokio::spawn(async move {
            if worker.stopped.load(Ordering::SeqCst) {
                return Err(FetchError::Transport("journey worker is stopped".to_string()));
            }
            worker.source.journeys(&origin, &destination, date).await
        });

        async move {
            task.await.unwrap_or_else(|e| {
                warn!(binding, error = %e, "journey task failed");
                Err(FetchError::Transport(format!("journey task failed: {e}")))
            })
        }
    }
}

impl std::fmt::Debug for JourneyClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyClientHandle")
            .field("binding", &self.binding.id)
            .finish()
    }
}
