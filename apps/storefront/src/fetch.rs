//! # Data-Fetch Wrapper
//!
//! Wraps any async retrieval function in `{ data, loading, error }` state
//! with a manual `refetch`.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fetcher Lifecycle                                │
//! │                                                                         │
//! │  mount(fetch, { params, skip })                                        │
//! │       │                                                                 │
//! │       ├── skip  ──► { data: None, loading: false, error: None }        │
//! │       └── !skip ──► refetch(None)                                      │
//! │                                                                         │
//! │  refetch(params?)                                                      │
//! │       │   generation = ++counter                                       │
//! │       │   loading = true, error = None                                 │
//! │       ▼                                                                 │
//! │  fetch(params).await                                                   │
//! │       │                                                                 │
//! │       ├── generation != counter ──► discarded (a newer call owns state)│
//! │       ├── Ok(data)  ──► data = Some(data), loading = false             │
//! │       └── Err(e)    ──► error = Some(e.to_string()), loading = false   │
//! │                         data untouched (stale-while-error)             │
//! │                                                                         │
//! │  invalidate()  ──► ++counter, loading = false (screen unmounted)       │
//! │  refetch dropped mid-call ──► loading = false if still the latest     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The last *call* wins regardless of completion order. Parameters are not
//! tracked; callers run `refetch` when theirs change.
//!
//! ## Usage
//! ```rust,ignore
//! let catalog = app.catalog().clone();
//! let menu = Fetcher::mount(
//!     move |query: MenuQuery| {
//!         let catalog = catalog.clone();
//!         async move { catalog.get_menu(&query).await }
//!     },
//!     FetchOptions::default(),
//! )
//! .await;
//!
//! menu.refetch(Some(MenuQuery::default().category("cat-burgers"))).await;
//! ```

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, warn};

type FetchFn<T, P> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

// =============================================================================
// Fetch State
// =============================================================================

/// Snapshot of one fetcher's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    /// Last successful result.
    pub data: Option<T>,

    /// True while the latest call is in flight.
    pub loading: bool,

    /// Message of the latest failure, cleared when a new call starts.
    pub error: Option<String>,
}

impl<T> FetchState<T> {
    fn initial(loading: bool) -> Self {
        FetchState {
            data: None,
            loading,
            error: None,
        }
    }
}

/// Mount options.
#[derive(Debug, Clone)]
pub struct FetchOptions<P> {
    /// Initial parameters; `P::default()` when `None`.
    pub params: Option<P>,

    /// Do not fetch on mount.
    pub skip: bool,
}

impl<P> Default for FetchOptions<P> {
    fn default() -> Self {
        FetchOptions {
            params: None,
            skip: false,
        }
    }
}

impl<P> FetchOptions<P> {
    pub fn with_params(params: P) -> Self {
        FetchOptions {
            params: Some(params),
            skip: false,
        }
    }

    pub fn skipped() -> Self {
        FetchOptions {
            params: None,
            skip: true,
        }
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Request/response state around an async retrieval function.
///
/// Cloning yields another handle to the same state.
pub struct Fetcher<T, P> {
    fetch: FetchFn<T, P>,
    params: Arc<Mutex<P>>,
    state: Arc<RwLock<FetchState<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T, P> Clone for Fetcher<T, P> {
    fn clone(&self) -> Self {
        Fetcher {
            fetch: Arc::clone(&self.fetch),
            params: Arc::clone(&self.params),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<T, P> Fetcher<T, P>
where
    T: Clone + Send + Sync + 'static,
    P: Clone + Default + Send + 'static,
{
    /// Creates the fetcher and, unless `options.skip`, runs the first call.
    pub async fn mount<F, Fut, E>(fetch: F, options: FetchOptions<P>) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + 'static,
    {
        let fetch: FetchFn<T, P> = Arc::new(move |params: P| {
            fetch(params)
                .map(|result| result.map_err(|e| e.to_string()))
                .boxed()
        });

        let fetcher = Fetcher {
            fetch,
            params: Arc::new(Mutex::new(options.params.unwrap_or_default())),
            state: Arc::new(RwLock::new(FetchState::initial(!options.skip))),
            generation: Arc::new(AtomicU64::new(0)),
        };

        if !options.skip {
            fetcher.refetch(None).await;
        }

        fetcher
    }

    /// Runs the retrieval function with `params`, or with the last params
    /// when `None`.
    pub async fn refetch(&self, params: Option<P>) {
        let params = {
            let mut current = self.params.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(params) = params {
                *current = params;
            }
            current.clone()
        };

        let generation = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.loading = true;
            state.error = None;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(generation, "Fetch started");

        let mut in_flight = InFlight {
            state: &self.state,
            generation: &self.generation,
            current: generation,
            armed: true,
        };
        let result = (self.fetch)(params).await;
        in_flight.armed = false;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale fetch response");
            return;
        }

        match result {
            Ok(data) => {
                state.data = Some(data);
            }
            Err(message) => {
                warn!(generation, error = %message, "Fetch failed");
                state.error = Some(message);
            }
        }
        state.loading = false;
    }

    /// Drops interest in any in-flight call (the owning screen unmounted).
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.loading = false;
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .error
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
    }

    /// Parameters the next `refetch(None)` will use.
    pub fn params(&self) -> P {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Clears `loading` when a `refetch` future is dropped before its call
/// resolves, unless a newer call has taken over.
struct InFlight<'a, T> {
    state: &'a RwLock<FetchState<T>>,
    generation: &'a AtomicU64,
    current: u64,
    armed: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) == self.current {
            debug!(generation = self.current, "Fetch cancelled");
            state.loading = false;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Echoes `"{name}!"` after `delay_ms`; fails when `name == "fail"`.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Params {
        name: String,
        delay_ms: u64,
    }

    fn params(name: &str, delay_ms: u64) -> Params {
        Params {
            name: name.to_string(),
            delay_ms,
        }
    }

    async fn mount_echo(options: FetchOptions<Params>) -> (Fetcher<String, Params>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher = Fetcher::mount(
            move |p: Params| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    tokio::time::sleep(Duration::from_millis(p.delay_ms)).await;
                    if p.name == "fail" {
                        Err("Request failed".to_string())
                    } else {
                        Ok(format!("{}!", p.name))
                    }
                }
            },
            options,
        )
        .await;
        (fetcher, calls)
    }

    #[tokio::test]
    async fn test_mount_fetches_with_default_params() {
        let (fetcher, calls) = mount_echo(FetchOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            fetcher.state(),
            FetchState {
                data: Some("!".to_string()),
                loading: false,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn test_skip_then_refetch() {
        let (fetcher, calls) = mount_echo(FetchOptions::skipped()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!fetcher.is_loading());
        assert_eq!(fetcher.data(), None);

        fetcher.refetch(Some(params("burgers", 0))).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.data(), Some("burgers!".to_string()));
        assert!(!fetcher.is_loading());
    }

    #[tokio::test]
    async fn test_refetch_reuses_last_params() {
        let (fetcher, calls) =
            mount_echo(FetchOptions::with_params(params("pizza", 0))).await;
        assert_eq!(fetcher.data(), Some("pizza!".to_string()));

        fetcher.refetch(None).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fetcher.params(), params("pizza", 0));
        assert_eq!(fetcher.data(), Some("pizza!".to_string()));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let (fetcher, _) = mount_echo(FetchOptions::with_params(params("pizza", 0))).await;

        fetcher.refetch(Some(params("fail", 0))).await;
        let state = fetcher.state();
        assert_eq!(state.data, Some("pizza!".to_string()));
        assert_eq!(state.error, Some("Request failed".to_string()));
        assert!(!state.loading);

        fetcher.refetch(Some(params("sushi", 0))).await;
        assert_eq!(fetcher.error(), None);
        assert_eq!(fetcher.data(), Some("sushi!".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_call_wins_when_it_resolves_first() {
        let (fetcher, _) = mount_echo(FetchOptions::skipped()).await;

        tokio::join!(
            fetcher.refetch(Some(params("slow", 100))),
            fetcher.refetch(Some(params("fast", 10))),
        );

        assert_eq!(fetcher.data(), Some("fast!".to_string()));
        assert!(!fetcher.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_does_not_clear_loading() {
        let (fetcher, _) = mount_echo(FetchOptions::skipped()).await;

        let (_, _, midway) = tokio::join!(
            fetcher.refetch(Some(params("first", 10))),
            fetcher.refetch(Some(params("second", 100))),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                fetcher.state()
            },
        );

        assert_eq!(midway.data, None);
        assert!(midway.loading);
        assert_eq!(fetcher.data(), Some("second!".to_string()));
        assert!(!fetcher.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_discards_in_flight_response() {
        let (fetcher, _) = mount_echo(FetchOptions::skipped()).await;

        tokio::join!(fetcher.refetch(Some(params("late", 100))), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fetcher.invalidate();
        });

        let state = fetcher.state();
        assert_eq!(state.data, None);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_refetch_clears_loading() {
        let (fetcher, _) = mount_echo(FetchOptions::skipped()).await;

        let result = tokio::time::timeout(
            Duration::from_millis(10),
            fetcher.refetch(Some(params("slow", 100))),
        )
        .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(
            fetcher.state(),
            FetchState {
                data: None,
                loading: false,
                error: None,
            }
        );

        fetcher.refetch(None).await;
        assert_eq!(fetcher.data(), Some("slow!".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_stale_call_leaves_latest_loading() {
        let (fetcher, _) = mount_echo(FetchOptions::skipped()).await;

        let (_, midway, _) = tokio::join!(
            tokio::time::timeout(
                Duration::from_millis(10),
                fetcher.refetch(Some(params("first", 100))),
            ),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                fetcher.state()
            },
            fetcher.refetch(Some(params("second", 50))),
        );

        assert!(midway.loading);
        assert_eq!(fetcher.data(), Some("second!".to_string()));
        assert!(!fetcher.is_loading());
    }
}
