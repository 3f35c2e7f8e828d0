//! Memoizing request cache for portal API calls
//!
//! Every dynamic JSON call goes through `RequestCache::request`, which
//! deduplicates identical queries inside a freshness window, races each
//! network attempt against a timeout, and retries transient failures with
//! linearly increasing backoff. Entries are replaced wholesale on refetch
//! and expire implicitly; nothing sweeps the map.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, timeout, Instant};

use super::loading::LoadingIndicator;
use super::transport::Transport;
use super::ApiError;

/// How long a cached response counts as fresh
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// How long a single network attempt may take before it is abandoned
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries after the initial attempt, so `MAX_RETRIES + 1` attempts total
pub const MAX_RETRIES: u32 = 3;

/// Backoff unit: the wait before retry `n` is `BASE_DELAY * n`
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Structured cache key: action plus canonically ordered parameters
///
/// Parameters are sorted at construction so `(a=1, b=2)` and `(b=2, a=1)`
/// address the same entry, without the collision risk of concatenating
/// values into one string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    action: String,
    params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(action: &str, params: &[(String, String)]) -> Self {
        let mut params = params.to_vec();
        params.sort();
        Self {
            action: action.to_string(),
            params,
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// A stored response; replaced on refetch, never merged
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
}

/// Per-call options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Whether to drive the shared loading indicator for this call
    pub show_loading: bool,
    /// Text shown while waiting
    pub loading_message: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            show_loading: true,
            loading_message: None,
        }
    }
}

impl RequestOptions {
    /// Options with a loading message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            show_loading: true,
            loading_message: Some(message.into()),
        }
    }

    /// Options that suppress the loading indicator
    #[allow(dead_code)]
    pub fn silent() -> Self {
        Self {
            show_loading: false,
            loading_message: None,
        }
    }
}

/// Memoizing, retrying front door to the portal
///
/// Concurrent calls for the same key are not coalesced: each proceeds
/// independently and the last writer wins. The map lock is only held for
/// lookups and inserts, never across an await.
pub struct RequestCache<T> {
    transport: T,
    loading: LoadingIndicator,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    freshness_window: Duration,
    request_timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl<T: Transport> RequestCache<T> {
    /// Creates a cache with the default policy (5 min freshness, 10 s
    /// timeout, 3 retries at 1 s/2 s/3 s)
    pub fn new(transport: T, loading: LoadingIndicator) -> Self {
        Self {
            transport,
            loading,
            entries: Mutex::new(HashMap::new()),
            freshness_window: FRESHNESS_WINDOW,
            request_timeout: REQUEST_TIMEOUT,
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
        }
    }

    /// Overrides the freshness window
    #[allow(dead_code)]
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Overrides the per-attempt timeout
    #[allow(dead_code)]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the retry count and backoff unit
    #[allow(dead_code)]
    pub fn with_retry_policy(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Access to the underlying transport, for calls that bypass caching
    /// (binary report downloads)
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `action` with `params`, serving a fresh cached response when
    /// one exists
    ///
    /// A cache hit returns immediately with no network access. On a miss the
    /// call is attempted up to `max_retries + 1` times; each attempt races
    /// the transport against the request timeout, and a timeout takes the
    /// same retry path as a network error. The wait before retry `n` is
    /// `base_delay * n`. The loading indicator is held for the whole call,
    /// across retries, and released on every exit path.
    pub async fn request(
        &self,
        action: &str,
        params: &[(String, String)],
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let key = CacheKey::new(action, params);

        if let Some(data) = self.lookup(&key) {
            return Ok(data);
        }

        let _guard = options
            .show_loading
            .then(|| self.loading.begin(options.loading_message.as_deref()));

        let mut attempt: u32 = 0;
        loop {
            let outcome = match timeout(
                self.request_timeout,
                self.transport.get_json(key.action(), key.params()),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout(self.request_timeout)),
            };

            match outcome {
                Ok(data) => {
                    self.store(key, data.clone());
                    return Ok(data);
                }
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    sleep(self.base_delay * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Returns the cached value for `key` if it is still inside the
    /// freshness window
    fn lookup(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.freshness_window)
            .map(|entry| entry.data.clone())
    }

    fn store(&self, key: CacheKey, data: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }
}
