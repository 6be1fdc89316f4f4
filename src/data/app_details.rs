//! Cache-backed app details resolution
//!
//! `AppDetailsService` answers app details lookups cache-first: a stored entry
//! is returned as is, a miss goes to the storefront, and a successful upstream
//! body is written back to the cache. Upstream failures never surface as
//! errors; they resolve to a degraded placeholder that is not cached, so the
//! next request for the same id tries the network again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::{AppId, Resolution, StorefrontClient};
use crate::cache::{CacheError, CacheManager};

/// Result of the one upstream fetch shared by concurrent misses for an id
type InFlight = Arc<OnceCell<Resolution>>;

/// Resolves app ids to storefront payloads through the disk cache
#[derive(Debug)]
pub struct AppDetailsService {
    /// Disk cache of previous upstream responses
    cache: CacheManager,
    /// Upstream storefront client
    storefront: StorefrontClient,
    /// Fetches currently running, keyed by id
    in_flight: Mutex<HashMap<AppId, InFlight>>,
}

impl AppDetailsService {
    /// Creates a service over the given cache and upstream client
    pub fn new(cache: CacheManager, storefront: StorefrontClient) -> Self {
        Self {
            cache,
            storefront,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The cache this service reads from and writes to
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Resolves `id` to a payload
    ///
    /// # Behavior
    /// - Returns the cached entry if one exists and parses
    /// - Otherwise fetches from the storefront and caches the body on success
    /// - On upstream failure returns `Resolution::Degraded` without caching
    ///
    /// Concurrent misses for the same id join a single fetch and all receive
    /// its outcome, degraded or not. If the request driving the fetch is
    /// dropped, one of the waiters picks it up.
    pub async fn resolve(&self, id: &AppId) -> Resolution {
        if let Some(payload) = self.read_cached(id).await {
            return Resolution::Cached(payload);
        }

        let slot = self.join_in_flight(id);
        let resolution = slot
            .cell
            .get_or_init(|| async {
                match self.read_cached(id).await {
                    Some(payload) => Resolution::Cached(payload),
                    None => self.fetch_and_store(id).await,
                }
            })
            .await
            .clone();

        resolution
    }

    /// Reads the cache, treating missing and corrupt entries alike as a miss
    async fn read_cached(&self, id: &AppId) -> Option<serde_json::Value> {
        match self.cache.read(id).await {
            Ok(payload) => {
                debug!(appid = %id, "cache hit");
                Some(payload)
            }
            Err(CacheError::NotFound(_)) => {
                debug!(appid = %id, "cache miss");
                None
            }
            Err(e) => {
                warn!(appid = %id, error = %e, "unreadable cache entry, falling back to upstream");
                None
            }
        }
    }

    /// Fetches from upstream and writes successful bodies to the cache
    async fn fetch_and_store(&self, id: &AppId) -> Resolution {
        match self.storefront.fetch_app_details(id).await {
            Ok(body) => {
                if let Err(e) = self.cache.write(id, &body).await {
                    warn!(appid = %id, error = %e, "failed to write cache entry");
                }
                debug!(appid = %id, "fetched from upstream");
                Resolution::Fetched(body)
            }
            Err(e) => {
                warn!(
                    appid = %id,
                    error = %e,
                    timeout = e.is_timeout(),
                    "upstream fetch failed, returning degraded payload"
                );
                Resolution::Degraded(id.clone())
            }
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<AppId, InFlight>> {
        // The map holds no invariants a panicking holder could break
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Joins the fetch running for `id`, or registers a new one
    fn join_in_flight(&self, id: &AppId) -> InFlightSlot<'_> {
        let cell = Arc::clone(self.in_flight().entry(id.clone()).or_default());
        InFlightSlot {
            service: self,
            id: id.clone(),
            cell,
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight().len()
    }
}

/// A request's handle on an in-flight fetch
///
/// Dropping it, on completion or cancellation, removes the map entry once the
/// fetch has an outcome or nobody else is waiting on it.
struct InFlightSlot<'a> {
    service: &'a AppDetailsService,
    id: AppId,
    cell: InFlight,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        let mut map = self.service.in_flight();
        let Some(current) = map.get(&self.id) else {
            return;
        };
        // A later fetch may have replaced ours
        if !Arc::ptr_eq(current, &self.cell) {
            return;
        }
        // One reference lives in the map, one is ours
        if self.cell.initialized() || Arc::strong_count(&self.cell) <= 2 {
            map.remove(&self.id);
        }
    }
}
