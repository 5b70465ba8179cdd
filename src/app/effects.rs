//! Post-mutation effects: cache invalidation and navigation.

use lru::LruCache;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Listing pages whose cached views the mutations invalidate.
pub const CUSTOMERS_PATH: &str = "/dashboard/customers";
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Listings showing customer fields: the customer listing, and the invoice listing through
/// its joined customer name and email.
pub const CUSTOMER_VIEWS: &[&str] = &[CUSTOMERS_PATH, INVOICES_PATH];
/// Listings showing invoice data: the invoice listing, and the customer listing through its
/// per-customer invoice totals.
pub const INVOICE_VIEWS: &[&str] = &[INVOICES_PATH, CUSTOMERS_PATH];

/// Invalidates cached views under a logical path.
pub trait Revalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Terminal navigation: the response ends by sending the caller to `location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: &str) -> Self {
        Self {
            location: location.to_string(),
        }
    }
}

/// Views kept when no capacity is given.
pub const DEFAULT_VIEW_CAPACITY: usize = 256;

struct Views {
    entries: LruCache<String, JsonValue>,
    /// Revalidation count per invalidated path.
    generations: HashMap<String, u64>,
}

impl Views {
    /// Sum of the generations of every path `key` sits under. Grows whenever one of them is
    /// revalidated.
    fn generation(&self, key: &str) -> u64 {
        self.generations
            .iter()
            .filter(|(path, _)| is_under(key, path))
            .map(|(_, generation)| *generation)
            .sum()
    }
}

/// In-process cache of rendered listing views, keyed by path plus query string.
///
/// Bounded: the least recently used view is dropped once `capacity` views are held.
pub struct ViewCache {
    views: Mutex<Views>,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_VIEW_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

/// `true` if `key` is `path` itself, a query on it, or a nested path below it.
fn is_under(key: &str, path: &str) -> bool {
    match key.strip_prefix(path) {
        Some(rest) => rest.is_empty() || rest.starts_with('?') || rest.starts_with('/'),
        None => false,
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            views: Mutex::new(Views {
                entries: LruCache::new(capacity),
                generations: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Views> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached view, if any.
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.lock().entries.get(key).cloned()
    }

    pub fn put(&self, key: impl Into<String>, value: JsonValue) {
        self.lock().entries.put(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serves a cached view or recomputes it with `load` and caches the result.
    ///
    /// Load failures are not cached. Neither is a result whose path was revalidated while
    /// `load` ran: it may predate the mutation.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, load: F) -> Result<JsonValue, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<JsonValue, E>>,
    {
        let generation = {
            let mut views = self.lock();
            if let Some(hit) = views.entries.get(key) {
                debug!(%key, "view cache hit");
                return Ok(hit.clone());
            }
            views.generation(key)
        };

        let value = load().await?;

        let mut views = self.lock();
        if views.generation(key) == generation {
            views.entries.put(key.to_string(), value.clone());
        } else {
            debug!(%key, "view revalidated during load, not cached");
        }
        Ok(value)
    }
}

impl Revalidator for ViewCache {
    fn revalidate_path(&self, path: &str) {
        let mut views = self.lock();
        let keys: Vec<String> = views
            .entries
            .iter()
            .filter(|(key, _)| is_under(key, path))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            views.entries.pop(key);
        }
        *views.generations.entry(path.to_string()).or_default() += 1;
        debug!(%path, dropped = keys.len(), "revalidated cached views");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn revalidation_drops_the_path_and_its_queries() {
        let cache = ViewCache::new();
        cache.put("/dashboard/invoices", json!(1));
        cache.put("/dashboard/invoices?query=lee&page=2", json!(2));
        cache.put("/dashboard/invoices/abc", json!(3));
        cache.put("/dashboard/invoicesx", json!(4));
        cache.put("/dashboard/customers", json!(5));

        cache.revalidate_path(INVOICES_PATH);

        assert_eq!(cache.get("/dashboard/invoices"), None);
        assert_eq!(cache.get("/dashboard/invoices?query=lee&page=2"), None);
        assert_eq!(cache.get("/dashboard/invoices/abc"), None);
        assert_eq!(cache.get("/dashboard/invoicesx"), Some(json!(4)));
        assert_eq!(cache.get("/dashboard/customers"), Some(json!(5)));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn revalidated_views_are_recomputed() {
        let cache = ViewCache::new();
        let first: Result<_, ()> = cache.get_or_load("/dashboard/customers", || async { Ok(json!("v1")) }).await;
        assert_eq!(first, Ok(json!("v1")));

        let cached: Result<_, ()> = cache.get_or_load("/dashboard/customers", || async { Ok(json!("v2")) }).await;
        assert_eq!(cached, Ok(json!("v1")));

        cache.revalidate_path(CUSTOMERS_PATH);
        let reloaded: Result<_, ()> = cache.get_or_load("/dashboard/customers", || async { Ok(json!("v2")) }).await;
        assert_eq!(reloaded, Ok(json!("v2")));
        assert_eq!(cache.get("/dashboard/customers"), Some(json!("v2")));
    }

    #[tokio::test]
    async fn load_overtaken_by_revalidation_is_not_cached() {
        let cache = ViewCache::new();
        let key = "/dashboard/invoices?query=&page=1";

        let served: Result<_, ()> = cache
            .get_or_load(key, || async {
                // A mutation lands after the rows were read.
                cache.revalidate_path(INVOICES_PATH);
                Ok(json!("pre-mutation rows"))
            })
            .await;

        assert_eq!(served, Ok(json!("pre-mutation rows")));
        assert_eq!(cache.get(key), None);

        let next: Result<_, ()> = cache.get_or_load(key, || async { Ok(json!("fresh rows")) }).await;
        assert_eq!(next, Ok(json!("fresh rows")));
        assert_eq!(cache.get(key), Some(json!("fresh rows")));
    }

    #[tokio::test]
    async fn unrelated_revalidation_does_not_block_caching() {
        let cache = ViewCache::new();
        let key = "/dashboard/invoices?query=&page=1";
        let _: Result<_, ()> = cache
            .get_or_load(key, || async {
                cache.revalidate_path("/dashboard/other");
                Ok(json!("rows"))
            })
            .await;
        assert_eq!(cache.get(key), Some(json!("rows")));
    }

    #[test]
    fn distinct_queries_cannot_grow_the_cache_past_capacity() {
        let capacity = NonZeroUsize::new(8).unwrap();
        let cache = ViewCache::with_capacity(capacity);
        for i in 0..100 {
            cache.put(format!("/dashboard/customers?query=q{i}"), json!(i));
        }
        assert_eq!(cache.len(), 8);
        assert_eq!(cache.get("/dashboard/customers?query=q0"), None);
        assert_eq!(cache.get("/dashboard/customers?query=q99"), Some(json!(99)));
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let cache = ViewCache::new();
        let failed = cache.get_or_load("/k", || async { Err::<JsonValue, _>("boom") }).await;
        assert_eq!(failed, Err("boom"));
        assert_eq!(cache.get("/k"), None);
    }
}
