//! Loader coordinator
//!
//! Tracks the `LoadState` of every namespace and owns the component
//! registry. Fetches run on background threads; their results travel back
//! over a channel and are committed by [`LoaderCoordinator::poll`] on the
//! render thread. A commit registers the whole bundle and flips the
//! namespace to `Loaded` under the registry write lock, so a namespace's
//! components become visible all at once.
//!
//! Lock order: `entries` before `registry`.

use crate::fetch::LibraryFetcher;
use crate::state::LoadState;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
};
use std::thread;
use std::time::{Duration, Instant};
use trellis_core::{Diagnostic, Fingerprint, Result, TrellisError};
use trellis_schema::{ComponentRegistry, LibraryBundle};

/// A committed load-state transition, delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded {
        namespace: String,
        components: usize,
        fingerprint: Option<Fingerprint>,
    },
    Failed {
        namespace: String,
        reason: String,
    },
    /// An explicit reload dropped the namespace's components
    Reloading { namespace: String },
}

impl LoadEvent {
    pub fn namespace(&self) -> &str {
        match self {
            LoadEvent::Loaded { namespace, .. }
            | LoadEvent::Failed { namespace, .. }
            | LoadEvent::Reloading { namespace } => namespace,
        }
    }
}

/// Longest single wait on the completion channel. Waiters release the
/// receiver between slices, so `poll` never queues behind them.
const RECV_SLICE: Duration = Duration::from_millis(10);

/// Load failures kept for `take_diagnostics`; the oldest are dropped first
const MAX_RECORDED_DIAGNOSTICS: usize = 64;

#[derive(Debug, Default)]
struct Entry {
    state: LoadState,
    /// Bumped by every fetch start and install; completions carrying an
    /// older generation are discarded.
    generation: u64,
}

enum Received {
    Completion(Completion),
    /// One slice passed without a completion
    Idle,
    /// The deadline passed
    Done,
}

struct Completion {
    namespace: String,
    generation: u64,
    result: Result<LibraryBundle>,
}

struct Inner {
    fetcher: Arc<dyn LibraryFetcher>,
    entries: Mutex<HashMap<String, Entry>>,
    registry: RwLock<ComponentRegistry>,
    completion_tx: Sender<Completion>,
    completion_rx: Mutex<Receiver<Completion>>,
    subscribers: Mutex<Vec<Sender<LoadEvent>>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

/// Process-wide load coordinator. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct LoaderCoordinator {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl LoaderCoordinator {
    /// Create a coordinator with an empty registry
    pub fn new(fetcher: impl LibraryFetcher + 'static) -> Self {
        Self::with_shared_fetcher(Arc::new(fetcher))
    }

    pub fn with_shared_fetcher(fetcher: Arc<dyn LibraryFetcher>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            inner: Arc::new(Inner {
                fetcher,
                entries: Mutex::new(HashMap::new()),
                registry: RwLock::new(ComponentRegistry::new()),
                completion_tx,
                completion_rx: Mutex::new(completion_rx),
                subscribers: Mutex::new(Vec::new()),
                diagnostics: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Start loading a namespace unless it was already requested.
    ///
    /// Never blocks. Returns true if this call started a fetch.
    pub fn request_load(&self, namespace: &str) -> bool {
        let generation = {
            let mut entries = lock(&self.inner.entries);
            let entry = entries.entry(namespace.to_string()).or_default();
            if entry.state != LoadState::NotRequested {
                return false;
            }
            entry.state = LoadState::Loading;
            entry.generation += 1;
            entry.generation
        };

        tracing::debug!(namespace, fetcher = self.inner.fetcher.name(), "requesting library load");
        self.spawn_fetch(namespace, generation);
        true
    }

    /// Drop a namespace's components and fetch it again.
    ///
    /// This is the only way out of `Loaded` or `Failed`. Returns false if a
    /// fetch for the namespace is already in flight.
    pub fn reload(&self, namespace: &str) -> bool {
        let generation = {
            let mut entries = lock(&self.inner.entries);
            let entry = entries.entry(namespace.to_string()).or_default();
            if entry.state == LoadState::Loading {
                return false;
            }
            entry.state = LoadState::Loading;
            entry.generation += 1;
            write(&self.inner.registry).unregister_namespace(namespace);
            entry.generation
        };

        tracing::info!(namespace, "reloading library");
        self.notify(&[LoadEvent::Reloading {
            namespace: namespace.to_string(),
        }]);
        self.spawn_fetch(namespace, generation);
        true
    }

    /// Register a bundle directly and mark its namespace loaded, without
    /// fetching. Any in-flight fetch for the namespace is superseded.
    pub fn install(&self, bundle: LibraryBundle) -> usize {
        let namespace = bundle.namespace.clone();
        let fingerprint = bundle.fingerprint;
        let components = {
            let mut entries = lock(&self.inner.entries);
            let entry = entries.entry(namespace.clone()).or_default();
            entry.generation += 1;
            let mut registry = write(&self.inner.registry);
            registry.unregister_namespace(&namespace);
            let components = registry.register_bundle(bundle);
            entry.state = LoadState::Loaded;
            components
        };

        tracing::info!(namespace = %namespace, components, "library installed");
        self.notify(&[LoadEvent::Loaded {
            namespace,
            components,
            fingerprint,
        }]);
        components
    }

    pub fn is_loaded(&self, namespace: &str) -> bool {
        lock(&self.inner.entries)
            .get(namespace)
            .map(|e| e.state.is_loaded())
            .unwrap_or(false)
    }

    pub fn load_state(&self, namespace: &str) -> LoadState {
        lock(&self.inner.entries)
            .get(namespace)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    /// Generation of the namespace's current contents, if it is loaded.
    /// Changes whenever a reload or install replaces them.
    pub fn loaded_generation(&self, namespace: &str) -> Option<u64> {
        lock(&self.inner.entries)
            .get(namespace)
            .filter(|e| e.state.is_loaded())
            .map(|e| e.generation)
    }

    /// Every namespace that has left `NotRequested`, with its state, sorted
    pub fn states(&self) -> Vec<(String, LoadState)> {
        let entries = lock(&self.inner.entries);
        let mut states: Vec<_> = entries
            .iter()
            .filter(|(_, e)| e.state != LoadState::NotRequested)
            .map(|(ns, e)| (ns.clone(), e.state.clone()))
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        states
    }

    /// True while any fetch is in flight
    pub fn has_pending(&self) -> bool {
        lock(&self.inner.entries)
            .values()
            .any(|e| e.state == LoadState::Loading)
    }

    /// Run `f` against the registry if, and only if, the namespace is
    /// loaded. The state check and the read happen under one lock, so a
    /// concurrent reload can never expose a half-registered namespace.
    pub fn with_loaded_registry<R>(
        &self,
        namespace: &str,
        f: impl FnOnce(&ComponentRegistry) -> R,
    ) -> Option<R> {
        let entries = lock(&self.inner.entries);
        let loaded = entries
            .get(namespace)
            .map(|e| e.state.is_loaded())
            .unwrap_or(false);
        if !loaded {
            return None;
        }
        let registry = read(&self.inner.registry);
        Some(f(&registry))
    }

    /// Read access to the registry
    pub fn registry(&self) -> RwLockReadGuard<'_, ComponentRegistry> {
        read(&self.inner.registry)
    }

    /// Receive every committed load event from now on
    pub fn subscribe(&self) -> Receiver<LoadEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.inner.subscribers).push(tx);
        rx
    }

    /// Drain load-failure diagnostics recorded since the last call.
    ///
    /// For hosts that do not subscribe; subscribers get the same failures as
    /// `LoadEvent::Failed`. Only the most recent failures are kept.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *lock(&self.inner.diagnostics))
    }

    /// Commit every finished fetch. Never blocks: if a `settle` or
    /// `wait_for` on another thread holds the completion channel, that
    /// thread commits instead and this call returns no events.
    pub fn poll(&self) -> Vec<LoadEvent> {
        let completions: Vec<Completion> = match self.inner.completion_rx.try_lock() {
            Ok(rx) => rx.try_iter().collect(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().try_iter().collect(),
            Err(TryLockError::WouldBlock) => Vec::new(),
        };
        self.commit_all(completions)
    }

    /// Block until no fetch is in flight or the timeout passes, committing
    /// results as they arrive.
    pub fn settle(&self, timeout: Duration) -> Vec<LoadEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while self.has_pending() {
            match self.recv_slice(deadline) {
                Received::Completion(completion) => {
                    events.extend(self.commit_all(vec![completion]));
                    events.extend(self.poll());
                }
                Received::Idle => {}
                Received::Done => break,
            }
        }
        events
    }

    /// Block until the namespace reaches a terminal state or the timeout
    /// passes. Returns the state at that point.
    pub fn wait_for(&self, namespace: &str, timeout: Duration) -> LoadState {
        let deadline = Instant::now() + timeout;
        self.poll();
        loop {
            let state = self.load_state(namespace);
            if state != LoadState::Loading {
                return state;
            }
            match self.recv_slice(deadline) {
                Received::Completion(completion) => {
                    self.commit_all(vec![completion]);
                }
                Received::Idle => {}
                Received::Done => return self.load_state(namespace),
            }
        }
    }

    fn recv_slice(&self, deadline: Instant) -> Received {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            return Received::Done;
        };
        match lock(&self.inner.completion_rx).recv_timeout(remaining.min(RECV_SLICE)) {
            Ok(completion) => Received::Completion(completion),
            Err(RecvTimeoutError::Timeout) => Received::Idle,
            Err(RecvTimeoutError::Disconnected) => Received::Done,
        }
    }

    fn spawn_fetch(&self, namespace: &str, generation: u64) {
        let fetcher = Arc::clone(&self.inner.fetcher);
        let tx = self.inner.completion_tx.clone();
        let ns = namespace.to_string();

        let spawned = thread::Builder::new()
            .name(format!("trellis-load-{}", namespace))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(&ns)))
                    .unwrap_or_else(|_| {
                        Err(TrellisError::FetchError(format!(
                            "fetcher '{}' panicked",
                            fetcher.name()
                        )))
                    });
                // The coordinator may be gone; nobody is left to care
                let _ = tx.send(Completion {
                    namespace: ns,
                    generation,
                    result,
                });
            });

        if let Err(e) = spawned {
            let _ = self.inner.completion_tx.send(Completion {
                namespace: namespace.to_string(),
                generation,
                result: Err(TrellisError::FetchError(format!(
                    "could not start load thread: {}",
                    e
                ))),
            });
        }
    }

    fn commit_all(&self, completions: Vec<Completion>) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = completions
            .into_iter()
            .filter_map(|c| self.commit(c))
            .collect();
        self.notify(&events);
        events
    }

    fn commit(&self, completion: Completion) -> Option<LoadEvent> {
        let Completion {
            namespace,
            generation,
            result,
        } = completion;

        let mut entries = lock(&self.inner.entries);
        let entry = entries.get_mut(&namespace)?;
        if entry.generation != generation || entry.state != LoadState::Loading {
            tracing::debug!(namespace = %namespace, generation, "discarding stale load result");
            return None;
        }

        match result {
            Ok(bundle) => {
                let fingerprint = bundle.fingerprint;
                let version = bundle.version.clone();
                let mut registry = write(&self.inner.registry);
                registry.unregister_namespace(&namespace);
                let components = registry.register_bundle(bundle);
                entry.state = LoadState::Loaded;
                drop(registry);

                tracing::info!(
                    namespace = %namespace,
                    components,
                    version = version.as_deref().unwrap_or("unversioned"),
                    "library loaded"
                );
                Some(LoadEvent::Loaded {
                    namespace,
                    components,
                    fingerprint,
                })
            }
            Err(e) => {
                let reason = e.reason();
                entry.state = LoadState::Failed(reason.clone());
                drop(entries);

                tracing::warn!(namespace = %namespace, reason = %reason, "library load failed");
                record_diagnostic(
                    &mut lock(&self.inner.diagnostics),
                    Diagnostic::load_failure(&namespace, &reason),
                );
                Some(LoadEvent::Failed { namespace, reason })
            }
        }
    }

    fn notify(&self, events: &[LoadEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = lock(&self.inner.subscribers);
        subscribers.retain(|tx| events.iter().all(|ev| tx.send(ev.clone()).is_ok()));
    }
}

fn record_diagnostic(recorded: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if recorded.len() >= MAX_RECORDED_DIAGNOSTICS {
        let excess = recorded.len() + 1 - MAX_RECORDED_DIAGNOSTICS;
        recorded.drain(..excess);
    }
    recorded.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trellis_core::DiagnosticKind;

    const TIMEOUT: Duration = Duration::from_secs(5);

    const MYLIB: &str = r#"
[library]
namespace = "mylib"

[component.Widget.props]
required_string = { type = "string", required = true }
"#;

    /// Counts fetches; serves `mylib` from a manifest
    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl LibraryFetcher for CountingFetcher {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            LibraryBundle::from_manifest_str(MYLIB)?.expect_namespace(namespace)
        }
    }

    /// Blocks every fetch until the test releases it
    struct GatedFetcher {
        gate: Mutex<Receiver<()>>,
    }

    impl LibraryFetcher for GatedFetcher {
        fn name(&self) -> &str {
            "gated"
        }

        fn fetch(&self, namespace: &str) -> Result<LibraryBundle> {
            lock(&self.gate)
                .recv()
                .map_err(|_| TrellisError::FetchError("gate closed".to_string()))?;
            LibraryBundle::from_manifest_str(MYLIB)?.expect_namespace(namespace)
        }
    }

    struct FailingFetcher;

    impl LibraryFetcher for FailingFetcher {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _namespace: &str) -> Result<LibraryBundle> {
            Err(TrellisError::FetchError("network error".to_string()))
        }
    }

    struct PanickingFetcher;

    impl LibraryFetcher for PanickingFetcher {
        fn name(&self) -> &str {
            "panicking"
        }

        fn fetch(&self, _namespace: &str) -> Result<LibraryBundle> {
            panic!("bundle exploded")
        }
    }

    #[test]
    fn test_concurrent_requests_fetch_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = LoaderCoordinator::new(CountingFetcher {
            calls: Arc::clone(&calls),
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = coordinator.clone();
                thread::spawn(move || c.request_load("mylib"))
            })
            .collect();
        let started: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();

        // Requests after the load finished are no-ops as well
        coordinator.settle(TIMEOUT);
        assert!(!coordinator.request_load("mylib"));

        assert_eq!(started, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(coordinator.is_loaded("mylib"));
    }

    #[test]
    fn test_not_loaded_until_commit_then_stable() {
        let (release, gate) = mpsc::channel();
        let coordinator = LoaderCoordinator::new(GatedFetcher {
            gate: Mutex::new(gate),
        });

        assert_eq!(coordinator.load_state("mylib"), LoadState::NotRequested);
        coordinator.request_load("mylib");
        for _ in 0..3 {
            coordinator.poll();
            assert!(!coordinator.is_loaded("mylib"));
            assert_eq!(coordinator.load_state("mylib"), LoadState::Loading);
        }
        assert!(coordinator.with_loaded_registry("mylib", |_| ()).is_none());

        release.send(()).unwrap();
        assert_eq!(coordinator.wait_for("mylib", TIMEOUT), LoadState::Loaded);
        for _ in 0..3 {
            coordinator.poll();
            assert!(coordinator.is_loaded("mylib"));
        }
        let found = coordinator
            .with_loaded_registry("mylib", |r| r.get("mylib", "Widget").is_some())
            .unwrap();
        assert!(found);
    }

    #[test]
    fn test_failure_is_terminal_and_reported_once() {
        let coordinator = LoaderCoordinator::new(FailingFetcher);
        coordinator.request_load("mylib");
        coordinator.settle(TIMEOUT);

        assert_eq!(
            coordinator.load_state("mylib"),
            LoadState::Failed("network error".to_string())
        );
        assert!(!coordinator.request_load("mylib"));
        coordinator.settle(TIMEOUT);

        let diagnostics = coordinator.take_diagnostics();
        assert_eq!(diagnostics, vec![Diagnostic::load_failure("mylib", "network error")]);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::LoadFailure);
        assert!(coordinator.take_diagnostics().is_empty());
    }

    #[test]
    fn test_panicking_fetcher_fails_namespace() {
        let coordinator = LoaderCoordinator::new(PanickingFetcher);
        coordinator.request_load("mylib");
        let state = coordinator.wait_for("mylib", TIMEOUT);
        assert!(matches!(state, LoadState::Failed(reason) if reason.contains("panicked")));
    }

    #[test]
    fn test_not_found_fails_namespace() {
        let coordinator = LoaderCoordinator::new(StaticFetcher::new());
        coordinator.request_load("ghost");
        assert!(matches!(
            coordinator.wait_for("ghost", TIMEOUT),
            LoadState::Failed(_)
        ));
    }

    #[test]
    fn test_subscribers_see_commits() {
        let coordinator =
            LoaderCoordinator::new(StaticFetcher::new().with_manifest("mylib", MYLIB));
        let events = coordinator.subscribe();

        coordinator.request_load("mylib");
        coordinator.settle(TIMEOUT);

        let received: Vec<LoadEvent> = events.try_iter().collect();
        assert_eq!(received.len(), 1);
        assert!(matches!(
            &received[0],
            LoadEvent::Loaded { namespace, components: 1, fingerprint: Some(_) } if namespace == "mylib"
        ));
    }

    #[test]
    fn test_reload_replaces_components() {
        let coordinator =
            LoaderCoordinator::new(StaticFetcher::new().with_manifest("mylib", MYLIB));
        coordinator.request_load("mylib");
        coordinator.settle(TIMEOUT);
        let events = coordinator.subscribe();

        assert!(coordinator.reload("mylib"));
        // Components vanish with the Loading state
        assert!(!coordinator.is_loaded("mylib"));
        assert!(!coordinator.registry().has_namespace("mylib"));
        assert!(!coordinator.reload("mylib"));

        assert_eq!(coordinator.wait_for("mylib", TIMEOUT), LoadState::Loaded);
        assert!(coordinator.registry().has_namespace("mylib"));

        let received: Vec<LoadEvent> = events.try_iter().collect();
        assert_eq!(received[0], LoadEvent::Reloading { namespace: "mylib".to_string() });
        assert!(matches!(received[1], LoadEvent::Loaded { .. }));
    }

    #[test]
    fn test_reload_recovers_failed_namespace() {
        let coordinator = LoaderCoordinator::new(FailingFetcher);
        coordinator.request_load("mylib");
        coordinator.settle(TIMEOUT);
        assert!(matches!(coordinator.load_state("mylib"), LoadState::Failed(_)));

        assert!(coordinator.reload("mylib"));
        assert_eq!(coordinator.load_state("mylib"), LoadState::Loading);
        coordinator.settle(TIMEOUT);
        assert_eq!(coordinator.take_diagnostics().len(), 2);
    }

    #[test]
    fn test_install_supersedes_in_flight_fetch() {
        let (release, gate) = mpsc::channel();
        let coordinator = LoaderCoordinator::new(GatedFetcher {
            gate: Mutex::new(gate),
        });

        coordinator.request_load("mylib");
        let bundle = LibraryBundle::from_manifest_str(MYLIB).unwrap();
        assert_eq!(coordinator.install(bundle), 1);
        assert!(coordinator.is_loaded("mylib"));

        // The gated fetch completes later and is discarded as stale
        release.send(()).unwrap();
        thread::sleep(Duration::from_millis(50));
        coordinator.poll();
        assert!(coordinator.is_loaded("mylib"));
        assert_eq!(coordinator.states(), vec![("mylib".to_string(), LoadState::Loaded)]);
    }

    #[test]
    fn test_poll_does_not_wait_behind_wait_for() {
        let (release, gate) = mpsc::channel();
        let coordinator = LoaderCoordinator::new(GatedFetcher {
            gate: Mutex::new(gate),
        });
        coordinator.request_load("mylib");

        let waiter = {
            let c = coordinator.clone();
            thread::spawn(move || c.wait_for("mylib", Duration::from_secs(2)))
        };
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        for _ in 0..5 {
            coordinator.poll();
        }
        assert!(started.elapsed() < Duration::from_millis(500));

        release.send(()).unwrap();
        assert_eq!(waiter.join().unwrap(), LoadState::Loaded);
        assert!(coordinator.is_loaded("mylib"));
    }

    #[test]
    fn test_wait_for_sees_commit_made_by_poll() {
        let (release, gate) = mpsc::channel();
        let coordinator = LoaderCoordinator::new(GatedFetcher {
            gate: Mutex::new(gate),
        });
        coordinator.request_load("mylib");
        release.send(()).unwrap();

        // Whichever thread commits, the waiter observes Loaded
        let waiter = {
            let c = coordinator.clone();
            thread::spawn(move || c.wait_for("mylib", TIMEOUT))
        };
        while !coordinator.is_loaded("mylib") {
            coordinator.poll();
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(waiter.join().unwrap(), LoadState::Loaded);
    }

    #[test]
    fn test_loaded_generation_changes_on_reload() {
        let coordinator =
            LoaderCoordinator::new(StaticFetcher::new().with_manifest("mylib", MYLIB));
        assert_eq!(coordinator.loaded_generation("mylib"), None);

        coordinator.request_load("mylib");
        assert_eq!(coordinator.loaded_generation("mylib"), None);
        coordinator.settle(TIMEOUT);
        let first = coordinator.loaded_generation("mylib").unwrap();

        coordinator.reload("mylib");
        assert_eq!(coordinator.loaded_generation("mylib"), None);
        coordinator.settle(TIMEOUT);
        let second = coordinator.loaded_generation("mylib").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_recorded_diagnostics_are_capped() {
        let mut recorded = Vec::new();
        for i in 0..MAX_RECORDED_DIAGNOSTICS + 10 {
            record_diagnostic(&mut recorded, Diagnostic::load_failure(format!("lib{}", i), "down"));
        }
        assert_eq!(recorded.len(), MAX_RECORDED_DIAGNOSTICS);
        assert_eq!(recorded[0].namespace, "lib10");
        assert_eq!(
            recorded[MAX_RECORDED_DIAGNOSTICS - 1].namespace,
            format!("lib{}", MAX_RECORDED_DIAGNOSTICS + 9)
        );
    }
}
