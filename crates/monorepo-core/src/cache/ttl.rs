//! In-memory memoization with a fixed time-to-live.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// Lifecycle state of a cache key.
///
/// `Absent -> Fresh` on the first store, `Fresh -> Stale` once the TTL elapses, and
/// `Stale -> Fresh` on the next recomputation. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Nothing stored for the key
    Absent,
    /// Stored and younger than the TTL
    Fresh,
    /// Stored but expired; the next lookup is a miss and overwrites it
    Stale,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    recorded_at: Instant,
    value: V,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.recorded_at) < ttl
    }
}

/// Memoizes results by key, treating entries older than the TTL as misses.
///
/// The map is unbounded and never swept: expired entries stay in place until a lookup for the
/// same key overwrites them. A TTL of zero disables caching, since every lookup misses.
///
/// Failures are never cached. [`try_get_or_insert_with`](Self::try_get_or_insert_with) returns
/// the error unchanged and leaves any previous (stale) entry alone.
///
/// # Concurrency
///
/// There is no internal locking. Every mutating method takes `&mut self`, so sharing one cache
/// between threads or tasks requires an outer lock such as `Mutex<TtlCache<_, _>>`. Concurrent
/// misses for the same key are not merged: each caller that misses runs its own computation.
///
/// Timestamps come from `tokio::time::Instant`, which follows a paused test clock.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::cache::TtlCache;
/// use std::time::Duration;
///
/// let mut cache = TtlCache::new(Duration::from_secs(300));
/// let mut calls = 0;
///
/// let a = cache.get_or_insert_with(5, |x| { calls += 1; x * 2 });
/// let b = cache.get_or_insert_with(5, |x| { calls += 1; x * 2 });
/// assert_eq!((a, b), (10, 10));
/// assert_eq!(calls, 1);
/// ```
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> TtlCache<K, V> {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Create an empty cache with a TTL in seconds.
    ///
    /// Zero, negative, and NaN values all give a zero TTL (caching disabled).
    pub fn from_secs_f64(ttl_seconds: f64) -> Self {
        let ttl = Duration::try_from_secs_f64(ttl_seconds).unwrap_or(if ttl_seconds > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        });
        Self::new(ttl)
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Return the cached value for `key` if it is still fresh.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.fresh(key, Instant::now())
    }

    /// Where `key` is in its lifecycle.
    pub fn state<Q>(&self, key: &Q) -> EntryState
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            None => EntryState::Absent,
            Some(entry) if entry.is_fresh(Instant::now(), self.ttl) => EntryState::Fresh,
            Some(_) => EntryState::Stale,
        }
    }

    /// Store `value` for `key`, stamped with the current time.
    pub fn insert(&mut self, key: K, value: V) {
        self.store(key, value, Instant::now());
    }

    /// Return the fresh value for `key`, or compute, store, and return a new one.
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        match self.try_get_or_insert_with(key, |k| Ok::<_, Infallible>(compute(k))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), for computations that can fail.
    ///
    /// An error is returned as-is and nothing is stored.
    pub fn try_get_or_insert_with<F, E>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let now = Instant::now();
        if let Some(value) = self.fresh(&key, now) {
            tracing::trace!("ttl cache hit");
            return Ok(value);
        }

        tracing::trace!("ttl cache miss");
        let value = compute(&key)?;
        self.store(key, value.clone(), now);
        Ok(value)
    }

    /// Async form of [`get_or_insert_with`](Self::get_or_insert_with).
    pub async fn get_or_insert_with_async<F, Fut>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = V>,
    {
        let now = Instant::now();
        if let Some(value) = self.fresh(&key, now) {
            tracing::trace!("ttl cache hit");
            return value;
        }

        tracing::trace!("ttl cache miss");
        let value = compute(&key).await;
        self.store(key, value.clone(), now);
        value
    }

    /// Async form of [`try_get_or_insert_with`](Self::try_get_or_insert_with).
    pub async fn try_get_or_insert_with_async<F, Fut, E>(
        &mut self,
        key: K,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let now = Instant::now();
        if let Some(value) = self.fresh(&key, now) {
            tracing::trace!("ttl cache hit");
            return Ok(value);
        }

        tracing::trace!("ttl cache miss");
        let value = compute(&key).await?;
        self.store(key, value.clone(), now);
        Ok(value)
    }

    fn fresh<Q>(&self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    // The timestamp is the lookup time, taken before the computation ran.
    fn store(&mut self, key: K, value: V, recorded_at: Instant) {
        self.entries.insert(key, CacheEntry { recorded_at, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let mut cache = TtlCache::new(TTL);
        let calls = Cell::new(0);
        let compute = |x: &u32| {
            calls.set(calls.get() + 1);
            x * 10
        };

        assert_eq!(cache.get_or_insert_with(5, compute), 50);
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get_or_insert_with(5, compute), 50);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_after_ttl() {
        let mut cache = TtlCache::new(TTL);
        let calls = Cell::new(0);
        let compute = |x: &u32| {
            calls.set(calls.get() + 1);
            x * 10
        };

        cache.get_or_insert_with(5, compute);
        tokio::time::advance(TTL).await;
        assert_eq!(cache.state(&5), EntryState::Stale);

        cache.get_or_insert_with(5, compute);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.state(&5), EntryState::Fresh);
        // Stale entries are overwritten in place, never duplicated
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_keys_do_not_share_entries() {
        let mut cache = TtlCache::new(TTL);
        let calls = Cell::new(0);
        let compute = |x: &u32| {
            calls.set(calls.get() + 1);
            x * 10
        };

        assert_eq!(cache.get_or_insert_with(5, compute), 50);
        assert_eq!(cache.get_or_insert_with(6, compute), 60);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let mut cache = TtlCache::new(Duration::ZERO);
        let calls = Cell::new(0);

        for _ in 0..3 {
            cache.get_or_insert_with("k", |_| {
                calls.set(calls.get() + 1);
                calls.get()
            });
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_from_secs_f64_normalizes() {
        assert_eq!(TtlCache::<u8, u8>::from_secs_f64(-5.0).ttl(), Duration::ZERO);
        assert_eq!(TtlCache::<u8, u8>::from_secs_f64(f64::NAN).ttl(), Duration::ZERO);
        assert_eq!(
            TtlCache::<u8, u8>::from_secs_f64(1.5).ttl(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            TtlCache::<u8, u8>::from_secs_f64(f64::INFINITY).ttl(),
            Duration::MAX
        );
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache: TtlCache<&str, u32> = TtlCache::new(TTL);
        let calls = Cell::new(0);

        for _ in 0..2 {
            let result = cache.try_get_or_insert_with("k", |_| {
                calls.set(calls.get() + 1);
                Err::<u32, _>("boom")
            });
            assert_eq!(result, Err("boom"));
        }
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.state("k"), EntryState::Absent);

        assert_eq!(cache.try_get_or_insert_with("k", |_| Ok::<_, &str>(7)), Ok(7));
        assert_eq!(cache.try_get_or_insert_with("k", |_| Err("unused")), Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timestamp_taken_before_computation() {
        let mut cache = TtlCache::new(Duration::from_secs(10));

        cache
            .get_or_insert_with_async(1, |_| async {
                tokio::time::sleep(Duration::from_secs(4)).await;
                "slow"
            })
            .await;

        // 6s after the value was produced, 10s after the lookup that started it
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.state(&1), EntryState::Stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_failure_not_cached() {
        let mut cache: TtlCache<u32, String> = TtlCache::new(TTL);

        let result = cache
            .try_get_or_insert_with_async(1, |_| async { Err::<String, _>("down") })
            .await;
        assert_eq!(result, Err("down"));
        assert!(cache.is_empty());

        let result = cache
            .try_get_or_insert_with_async(1, |id| {
                let id = *id;
                async move { Ok::<_, &str>(format!("user-{id}")) }
            })
            .await;
        assert_eq!(result.as_deref(), Ok("user-1"));
        assert_eq!(cache.get(&1).as_deref(), Some("user-1"));
    }

    #[test]
    fn test_insert_and_state() {
        let mut cache = TtlCache::new(TTL);
        assert_eq!(cache.state("a"), EntryState::Absent);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.state("a"), EntryState::Fresh);
        assert_eq!(cache.get("a"), Some(1));
    }
}
