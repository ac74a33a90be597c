//! Bounded, single-flight cache of opened distributions.
//!
//! Concurrent misses for one identity share a single fetch: the first caller
//! downloads and parses, the others wait on the same slot and receive the
//! same [`Arc`] (or the same error). Failures are handed to every waiter but
//! never stored, so the next request retries.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use lru::LruCache;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::Result;
use crate::archive::Distribution;
use crate::config::CacheConfig;
use crate::fetch::Fetch;
use crate::fetch::fetch_and_open;
use crate::formats::ArchiveSource;

type Outcome = Result<Option<Arc<Distribution>>>;
type Slot = Arc<OnceCell<Outcome>>;

struct State {
    entries: LruCache<String, Arc<Distribution>>,
    total_bytes: u64,
    inflight: HashMap<String, Slot>,
}

/// Process-wide store of opened distributions keyed by identity.
pub struct DistributionCache<F> {
    fetcher: F,
    max_bytes: u64,
    state: Mutex<State>,
}

impl<F: Fetch> DistributionCache<F> {
    /// Creates an empty cache that downloads through `fetcher`.
    pub fn new(fetcher: F, config: &CacheConfig) -> Self {
        Self {
            fetcher,
            max_bytes: config.max_bytes,
            state: Mutex::new(State {
                entries: LruCache::new(config.max_entries),
                total_bytes: 0,
                inflight: HashMap::new(),
            }),
        }
    }

    /// Returns the cached distribution for `identity`, fetching and opening
    /// it on a miss.
    ///
    /// `url` is only evaluated on a miss. Returns `Ok(None)` when `filename`
    /// maps to no supported format.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`](crate::InspectError::UpstreamUnavailable)
    /// if the download fails, or [`InspectError::BadFile`](crate::InspectError::BadFile)
    /// if the archive does not parse.
    pub async fn get_or_fetch<U>(&self, identity: &str, filename: &str, url: U) -> Outcome
    where
        U: FnOnce() -> String + Send,
    {
        let slot = match self.lookup_or_join(identity) {
            Ok(hit) => {
                debug!(identity, "distribution cache hit");
                return Ok(Some(hit));
            }
            Err(slot) => slot,
        };

        let outcome = slot
            .get_or_init(|| async move {
                debug!(identity, "distribution cache miss");
                let url = url();
                fetch_and_open(&self.fetcher, &url, filename)
                    .await
                    .map(|opened| opened.map(Arc::new))
            })
            .await
            .clone();

        self.settle(identity, &slot, &outcome);
        outcome
    }

    /// Returns the fetcher this cache downloads through.
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn lookup_or_join(&self, identity: &str) -> std::result::Result<Arc<Distribution>, Slot> {
        let mut state = self.lock();
        if let Some(hit) = state.entries.get(identity) {
            return Ok(Arc::clone(hit));
        }
        Err(Arc::clone(
            state.inflight.entry(identity.to_string()).or_default(),
        ))
    }

    /// Retires the in-flight slot and publishes a successful result.
    ///
    /// Only the caller holding the slot that is still registered does the
    /// work; later waiters on the same slot find it gone.
    fn settle(&self, identity: &str, slot: &Slot, outcome: &Outcome) {
        let mut state = self.lock();
        let registered = state
            .inflight
            .get(identity)
            .is_some_and(|current| Arc::ptr_eq(current, slot));
        if !registered {
            return;
        }
        state.inflight.remove(identity);

        if let Ok(Some(distribution)) = outcome {
            state.total_bytes += distribution.size();
            if let Some((_, old)) = state
                .entries
                .push(identity.to_string(), Arc::clone(distribution))
            {
                state.total_bytes -= old.size();
            }
            while state.total_bytes > self.max_bytes && state.entries.len() > 1 {
                if let Some((evicted, old)) = state.entries.pop_lru() {
                    debug!(identity = %evicted, bytes = old.size(), "evicting distribution");
                    state.total_bytes -= old.size();
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F> DistributionCache<F> {
    /// Number of cached distributions.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of the cached archives' backing bytes.
    pub fn total_bytes(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_bytes
    }

    /// Returns `true` if `identity` is cached, without touching recency.
    pub fn contains(&self, identity: &str) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .contains(identity)
    }
}

impl<F> std::fmt::Debug for DistributionCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionCache")
            .field("max_bytes", &self.max_bytes)
            .field("len", &self.len())
            .field("total_bytes", &self.total_bytes())
            .finish_non_exhaustive()
    }
}
