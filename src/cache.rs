use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

struct Snapshot<T> {
    items: Vec<T>,
    taken_at: Instant,
}

/// Time-bounded snapshot of one unfiltered entity list.
///
/// Sits in front of the two highest-traffic list reads (courses,
/// candidates). Only the "show me everything" read goes through here;
/// filtered reads must bypass the cache entirely and hit the store live.
///
/// The snapshot is per-process state: in a multi-instance deployment each
/// instance keeps its own staleness window and no cross-instance
/// invalidation happens. Populate and invalidate are last-write-wins: the
/// loader runs outside the lock, so a load that raced an invalidate may
/// re-store pre-mutation data for at most one TTL window.
#[derive(Clone)]
pub struct ListCache<T> {
    ttl: Duration,
    slot: Arc<RwLock<Option<Snapshot<T>>>>,
}

impl<T: Clone> ListCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the snapshot while it is younger than the TTL, otherwise
    /// runs `load` and stores its result with a fresh timestamp. A failed
    /// load stores nothing.
    pub async fn get_or_refresh<F, Fut>(&self, load: F) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        {
            let guard = self.slot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.taken_at.elapsed() < self.ttl {
                    return Ok(snapshot.items.clone());
                }
            }
        }
        self.refresh(load).await
    }

    /// Live read that always runs `load` and replaces the snapshot
    /// (`?refresh=true` handling).
    pub async fn refresh<F, Fut>(&self, load: F) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let items = load().await?;
        let mut guard = self.slot.write().await;
        *guard = Some(Snapshot {
            items: items.clone(),
            taken_at: Instant::now(),
        });
        Ok(items)
    }

    /// Drops the snapshot unconditionally. Mutating handlers call this
    /// after the database write and before answering; the two steps are
    /// not one transaction, so one unfiltered read racing the write can
    /// still repopulate pre-mutation data until the TTL expires.
    pub async fn invalidate(&self) {
        let mut guard = self.slot.write().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn loader(
        reads: &Arc<AtomicUsize>,
        items: Vec<i64>,
    ) -> impl FnOnce() -> std::future::Ready<Result<Vec<i64>>> {
        let reads = Arc::clone(reads);
        move || {
            reads.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(items))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_served_inside_the_ttl_window() {
        let cache: ListCache<i64> = ListCache::new(Duration::from_secs(30));
        let reads = Arc::new(AtomicUsize::new(0));

        let first = cache.get_or_refresh(loader(&reads, vec![1, 2, 3])).await.unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;
        let second = cache.get_or_refresh(loader(&reads, vec![9])).await.unwrap();

        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, first, "snapshot must be returned unchanged");
        assert_eq!(reads.load(Ordering::SeqCst), 1, "second read must not hit the store");
    }

    #[tokio::test(start_paused = true)]
    async fn expired_snapshot_triggers_a_live_read() {
        let cache: ListCache<i64> = ListCache::new(Duration::from_secs(30));
        let reads = Arc::new(AtomicUsize::new(0));

        cache.get_or_refresh(loader(&reads, vec![1])).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        let second = cache.get_or_refresh(loader(&reads, vec![2])).await.unwrap();

        assert_eq!(second, vec![2]);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_a_live_read_before_the_ttl_expires() {
        let cache: ListCache<i64> = ListCache::new(Duration::from_secs(60));
        let reads = Arc::new(AtomicUsize::new(0));

        cache.get_or_refresh(loader(&reads, vec![1])).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.invalidate().await;
        let after = cache.get_or_refresh(loader(&reads, vec![2])).await.unwrap();

        assert_eq!(after, vec![2], "post-mutation read must see fresh data");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_bypasses_and_replaces_the_snapshot() {
        let cache: ListCache<i64> = ListCache::new(Duration::from_secs(60));
        let reads = Arc::new(AtomicUsize::new(0));

        cache.get_or_refresh(loader(&reads, vec![1])).await.unwrap();
        let refreshed = cache.refresh(loader(&reads, vec![2])).await.unwrap();
        assert_eq!(refreshed, vec![2]);
        assert_eq!(reads.load(Ordering::SeqCst), 2);

        // The refreshed snapshot is what later reads are served from.
        let cached = cache.get_or_refresh(loader(&reads, vec![3])).await.unwrap();
        assert_eq!(cached, vec![2]);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_stores_nothing_and_the_next_read_retries() {
        let cache: ListCache<i64> = ListCache::new(Duration::from_secs(60));
        let reads = Arc::new(AtomicUsize::new(0));

        let failing = {
            let reads = Arc::clone(&reads);
            move || {
                reads.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Err(Error::Internal("store offline".into())))
            }
        };
        assert!(cache.get_or_refresh(failing).await.is_err());

        let recovered = cache.get_or_refresh(loader(&reads, vec![7])).await.unwrap();
        assert_eq!(recovered, vec![7]);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }
}
