//! Suffix-keyed binding between a document source and observable state.
//!
//! # State Transitions
//! ```text
//! bind(new suffix): * → default      (synchronous, before the fetch starts)
//! fetch resolves:   default → document   (subject to StalePolicy)
//! fetch fails:      unchanged
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::binding::source::DocumentSource;
use crate::binding::state::ObservableState;
use crate::config::StalePolicy;
use crate::fetch::{FetchError, FetchResult};
use crate::observability::metrics;

/// What a settled fetch did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The document was written to the state.
    Applied,
    /// A newer bind superseded this fetch; the document was discarded.
    Stale,
}

/// Handle to the fetch started by [`ReactiveBinding::bind`].
///
/// Dropping the handle does not cancel the fetch.
#[derive(Debug)]
pub struct FetchHandle {
    suffix: String,
    task: JoinHandle<FetchResult<FetchOutcome>>,
}

impl FetchHandle {
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Wait for the fetch to resolve and the state update (if any) to land.
    pub async fn settled(self) -> FetchResult<FetchOutcome> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(FetchError::Interrupted { suffix: self.suffix }),
        }
    }
}

/// Exposes a document as observable state that follows the bound suffix.
pub struct ReactiveBinding<S, T = Value> {
    source: Arc<S>,
    default: T,
    policy: StalePolicy,
    state: Arc<ObservableState<T>>,
    generation: Arc<AtomicU64>,
    suffix: Option<String>,
    runtime: Option<Handle>,
}

impl<S, T> ReactiveBinding<S, T>
where
    S: DocumentSource,
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create an unbound binding whose state starts at `default`.
    ///
    /// Fetches run on the Tokio runtime current at construction, if any;
    /// see [`with_runtime`](Self::with_runtime) to pick one explicitly.
    pub fn new(source: S, default: T, policy: StalePolicy) -> Self {
        Self::with_shared_source(Arc::new(source), default, policy)
    }

    /// Like [`new`](Self::new), for a source shared with other bindings.
    pub fn with_shared_source(source: Arc<S>, default: T, policy: StalePolicy) -> Self {
        let state = Arc::new(ObservableState::new(default.clone()));
        Self {
            source,
            default,
            policy,
            state,
            generation: Arc::new(AtomicU64::new(0)),
            suffix: None,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Spawn fetches on `runtime`, so `bind` can be called from threads
    /// that are not part of any runtime (a UI thread, say).
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Create a binding and bind it to `suffix` straight away.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(
        source: S,
        suffix: &str,
        default: T,
        policy: StalePolicy,
    ) -> (Self, FetchHandle) {
        let mut binding = Self::new(source, default, policy);
        let handle = binding.spawn_fetch(suffix);
        (binding, handle)
    }

    /// Current value: the default until a fetch for the bound suffix lands.
    pub fn get(&self) -> T {
        self.state.get()
    }

    /// Latest-value receiver; writes close together may be coalesced.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.state.subscribe()
    }

    /// Every write from now on, resets included, in the order applied.
    pub fn updates(&self) -> mpsc::UnboundedReceiver<T> {
        self.state.updates()
    }

    pub fn current_suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Point the binding at `suffix`.
    ///
    /// A new suffix resets the state to the default and starts one fetch.
    /// Binding the suffix that is already bound does nothing and returns
    /// `None`. Earlier fetches keep running.
    ///
    /// # Panics
    ///
    /// Panics when the binding was built outside a Tokio runtime, no
    /// runtime was given through [`with_runtime`](Self::with_runtime), and
    /// the calling thread is not inside one either.
    pub fn bind(&mut self, suffix: &str) -> Option<FetchHandle> {
        if self.suffix.as_deref() == Some(suffix) {
            return None;
        }
        Some(self.spawn_fetch(suffix))
    }

    fn spawn_fetch(&mut self, suffix: &str) -> FetchHandle {
        let runtime = self.runtime.clone().unwrap_or_else(Handle::current);

        self.suffix = Some(suffix.to_string());

        // Bump the generation under the state lock so a resolving fetch
        // cannot interleave between the bump and the reset.
        let mut generation = 0;
        let default = self.default.clone();
        let latest = Arc::clone(&self.generation);
        self.state.update_if(|current| {
            generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
            *current = default;
            true
        });

        tracing::debug!(suffix, generation, "Binding to new suffix");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let policy = self.policy;
        let owned_suffix = suffix.to_string();

        let task = runtime.spawn(async move {
            let suffix = owned_suffix;
            let result = source.fetch_document(&suffix).await.and_then(|value| {
                serde_json::from_value::<T>(value).map_err(|source| {
                    FetchError::UnexpectedShape {
                        target: suffix.clone(),
                        source,
                    }
                })
            });

            let value = match result {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(
                        suffix = %suffix,
                        error = %e,
                        "Fetch failed, keeping current state"
                    );
                    metrics::record_binding_update("failed");
                    return Err(e);
                }
            };

            let applied = state.update_if(|current| {
                if policy == StalePolicy::DropStale && latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *current = value;
                true
            });

            if applied {
                tracing::debug!(suffix = %suffix, generation, "State updated");
                metrics::record_binding_update("applied");
                Ok(FetchOutcome::Applied)
            } else {
                tracing::debug!(
                    suffix = %suffix,
                    generation,
                    "Discarding result for superseded suffix"
                );
                metrics::record_binding_update("stale");
                Ok(FetchOutcome::Stale)
            }
        });

        FetchHandle {
            suffix: suffix.to_string(),
            task,
        }
    }
}
