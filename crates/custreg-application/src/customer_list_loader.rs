//! Customer list loader.
//!
//! Holds the displayed collection and the loading flag, and reloads the
//! collection whenever a refresh event arrives or the user asks for it.
//!
//! # Concurrency
//!
//! Each reload is independent. When several are in flight the collection
//! ends up holding the response that arrived last, regardless of which
//! reload was issued last. The loading flag stays set until every in-flight
//! reload has completed. After [`CustomerListLoader::unmount`], responses
//! that are still on their way are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use custreg_core::customer::{Customer, CustomerRepository};
use custreg_core::error::Result;
use custreg_core::refresh::RefreshListener;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What observers of the list see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListSnapshot {
    pub customers: Vec<Customer>,
    pub loading: bool,
    /// Incremented every time the collection is replaced.
    pub version: u64,
    /// Message of the most recent failed reload, cleared by the next success.
    pub last_error: Option<String>,
}

/// Result of a single reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The collection was replaced with `count` rows.
    Loaded { count: usize },
    /// The query failed; the previous collection is still shown.
    Failed { message: String },
    /// Manual reload refused because another reload is in flight.
    Busy,
    /// The loader was unmounted; nothing was applied.
    Discarded,
}

#[derive(Debug, Default)]
struct LoaderState {
    customers: Vec<Customer>,
    in_flight: usize,
    version: u64,
    last_error: Option<String>,
}

impl LoaderState {
    fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            customers: self.customers.clone(),
            loading: self.in_flight > 0,
            version: self.version,
            last_error: self.last_error.clone(),
        }
    }
}

/// Loads and holds the customer list. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CustomerListLoader {
    repository: Arc<dyn CustomerRepository>,
    state: Arc<Mutex<LoaderState>>,
    mounted: Arc<AtomicBool>,
    snapshots: Arc<watch::Sender<ListSnapshot>>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl CustomerListLoader {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        let (snapshots, _) = watch::channel(ListSnapshot::default());
        Self {
            repository,
            state: Arc::new(Mutex::new(LoaderState::default())),
            mounted: Arc::new(AtomicBool::new(true)),
            snapshots: Arc::new(snapshots),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &LoaderState) {
        self.snapshots.send_replace(state.snapshot());
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.lock().snapshot()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.lock().customers.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshots.subscribe()
    }

    /// Marks a reload as started. Manual reloads are refused while loading.
    fn begin(&self, manual: bool) -> bool {
        let mut state = self.lock();
        if manual && state.in_flight > 0 {
            return false;
        }
        state.in_flight += 1;
        self.publish(&state);
        true
    }

    /// Applies a query result, unless the loader has been unmounted.
    ///
    /// The in-flight count drops either way; only the result is discarded.
    fn complete(&self, result: Result<Vec<Customer>>) -> ReloadOutcome {
        if !self.is_mounted() {
            tracing::debug!("List loader unmounted; discarding query result");
            return self.discard();
        }

        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(customers) => {
                let count = customers.len();
                state.customers = customers;
                state.version += 1;
                state.last_error = None;
                tracing::debug!(count, version = state.version, "Customer list replaced");
                ReloadOutcome::Loaded { count }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load customers; keeping previous list");
                let message = err.to_string();
                state.last_error = Some(message.clone());
                ReloadOutcome::Failed { message }
            }
        };
        self.publish(&state);
        outcome
    }

    /// Ends a started reload without touching the collection.
    fn discard(&self) -> ReloadOutcome {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        self.publish(&state);
        ReloadOutcome::Discarded
    }

    async fn fetch(&self) -> ReloadOutcome {
        let result = self.repository.list_recent_first().await;
        self.complete(result)
    }

    /// Reloads unconditionally. Used for refresh events.
    pub async fn reload(&self) -> ReloadOutcome {
        if !self.is_mounted() {
            return ReloadOutcome::Discarded;
        }
        self.begin(false);
        self.fetch().await
    }

    /// The user's "reload now" action; refused while a reload is in flight.
    pub async fn reload_now(&self) -> ReloadOutcome {
        if !self.is_mounted() {
            return ReloadOutcome::Discarded;
        }
        if !self.begin(true) {
            tracing::debug!("Manual reload ignored; already loading");
            return ReloadOutcome::Busy;
        }
        self.fetch().await
    }

    /// Starts a reload in the background. The loading flag is set before
    /// this returns.
    pub fn spawn_reload(&self) -> JoinHandle<ReloadOutcome> {
        let loader = self.clone();
        let started = self.is_mounted() && self.begin(false);
        tokio::spawn(async move {
            if !started {
                return ReloadOutcome::Discarded;
            }
            if !loader.is_mounted() {
                return loader.discard();
            }
            loader.fetch().await
        })
    }

    /// Listens for refresh events, issuing one reload per event.
    pub fn attach(&self, mut listener: RefreshListener) {
        let loader = self.clone();
        let handle = tokio::spawn(async move {
            while let Some(event) = listener.recv().await {
                if !loader.is_mounted() {
                    break;
                }
                tracing::debug!(generation = event.generation, "Refresh requested");
                loader.spawn_reload();
            }
            tracing::debug!("Refresh listener closed");
        });

        let mut watcher = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = watcher.replace(handle) {
            previous.abort();
        }
    }

    /// Initial load plus refresh subscription.
    pub fn mount(&self, listener: RefreshListener) -> JoinHandle<ReloadOutcome> {
        let initial = self.spawn_reload();
        self.attach(listener);
        initial
    }

    /// Stops listening; results still in flight are dropped on arrival.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        let mut watcher = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = watcher.take() {
            handle.abort();
        }
    }
}
