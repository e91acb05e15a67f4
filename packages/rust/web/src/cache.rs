//! Process-lifetime cache of fetched pages.
//!
//! Each URL owns a once-cell. The first caller to reach an empty cell runs
//! the fetch; concurrent callers for the same URL wait on that fetch rather
//! than issuing their own. A failed fetch stores nothing: its empty cell is
//! dropped once no other caller waits on it, and a later call tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use docdesk_shared::{CachedPage, Result};

type Slot = Arc<OnceCell<Arc<CachedPage>>>;

/// Append-only page cache keyed by the exact requested URL string.
#[derive(Debug, Default)]
pub struct PageCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached page for `url`, if one has been stored.
    pub fn get(&self, url: &str) -> Option<Arc<CachedPage>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(url).and_then(|slot| slot.get().cloned())
    }

    /// Return the cached page for `url`, running `fetch` to populate it when
    /// absent. `fetch` runs at most once per URL among concurrent callers.
    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> Result<Arc<CachedPage>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedPage>>,
    {
        let slot = self.slot(url);
        let result = slot
            .get_or_try_init(|| async { fetch().await.map(Arc::new) })
            .await
            .map(Arc::clone);
        if result.is_err() {
            self.discard_empty(url, &slot);
        }
        result
    }

    /// Number of URLs with a stored page.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map lock is never held across an await; only the slot is awaited.
    fn slot(&self, url: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(url.to_string()).or_default())
    }

    /// Remove `slot` if it is still empty and only the map and the caller
    /// hold it. Waiters clone the slot under the map lock, so the count
    /// cannot grow while it is checked.
    fn discard_empty(&self, url: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = slots.get(url).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if unused {
            slots.remove(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docdesk_shared::DocdeskError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(url: &str) -> CachedPage {
        CachedPage {
            url: url.to_string(),
            html: "<p>hi</p>".into(),
            text: "hi".into(),
            title: None,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn populates_once() {
        let cache = PageCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_fetch("https://a.test/", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(page("https://a.test/"))
                })
                .await
                .unwrap();
            assert_eq!(got.url, "https://a.test/");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("https://a.test/").is_some());
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = PageCache::new();

        let err = cache
            .get_or_fetch("https://a.test/", || async {
                Err(DocdeskError::FetchFailure("boom".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DocdeskError::FetchFailure(_)));
        assert!(cache.is_empty());
        assert!(cache.get("https://a.test/").is_none());

        cache
            .get_or_fetch("https://a.test/", || async { Ok(page("https://a.test/")) })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failed_urls_leave_no_slots_behind() {
        let cache = PageCache::new();
        for i in 0..5 {
            let url = format!("https://down{i}.test/");
            cache
                .get_or_fetch(&url, || async {
                    Err(DocdeskError::FetchFailure("unreachable".into()))
                })
                .await
                .unwrap_err();
        }
        assert!(cache.slots.lock().unwrap().is_empty());

        cache
            .get_or_fetch("https://up.test/", || async { Ok(page("https://up.test/")) })
            .await
            .unwrap();
        assert_eq!(cache.slots.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn keys_are_exact_strings() {
        let cache = PageCache::new();
        for url in ["https://a.test", "https://a.test/"] {
            cache
                .get_or_fetch(url, || async move { Ok(page(url)) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 2);
    }
}
