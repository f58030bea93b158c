//! A function bundled with its own TTL cache.

use super::ttl::{EntryState, TtlCache};
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

/// Wraps a function so repeated calls with the same key reuse a recent result.
///
/// Every wrapper owns an independent [`TtlCache`]; two wrappers around the same function never
/// share entries. Functions that take several arguments can use a tuple or a
/// [`CallKey`](super::CallKey) as `K`.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::cache::Cached;
/// use std::time::Duration;
///
/// let mut square = Cached::new(Duration::from_secs(60), |x: &u64| x * x);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.cache().len(), 1);
/// ```
#[derive(Debug)]
pub struct Cached<K, V, F> {
    cache: TtlCache<K, V>,
    func: F,
}

impl<K, V, F> Cached<K, V, F> {
    /// Wrap `func` with a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration, func: F) -> Self {
        Self {
            cache: TtlCache::new(ttl),
            func,
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &TtlCache<K, V> {
        &self.cache
    }

    /// Discard the cache and return the wrapped function.
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<K, V, F> Cached<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Where `key` is in its cache lifecycle.
    pub fn state(&self, key: &K) -> EntryState {
        self.cache.state(key)
    }

    /// Return the cached result for `key`, or call the function and cache what it returns.
    pub fn call(&mut self, key: K) -> V
    where
        F: FnMut(&K) -> V,
    {
        let func = &mut self.func;
        self.cache.get_or_insert_with(key, |k| func(k))
    }

    /// Like [`call`](Self::call) for fallible functions. Errors are passed through uncached.
    pub fn try_call<E>(&mut self, key: K) -> Result<V, E>
    where
        F: FnMut(&K) -> Result<V, E>,
    {
        let func = &mut self.func;
        self.cache.try_get_or_insert_with(key, |k| func(k))
    }

    /// Async form of [`call`](Self::call).
    pub async fn call_async<Fut>(&mut self, key: K) -> V
    where
        F: FnMut(&K) -> Fut,
        Fut: Future<Output = V>,
    {
        let func = &mut self.func;
        self.cache.get_or_insert_with_async(key, |k| func(k)).await
    }

    /// Async form of [`try_call`](Self::try_call).
    pub async fn try_call_async<Fut, E>(&mut self, key: K) -> Result<V, E>
    where
        F: FnMut(&K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let func = &mut self.func;
        self.cache
            .try_get_or_insert_with_async(key, |k| func(k))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CallKey;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_call_respects_ttl() {
        let calls = Cell::new(0);
        let mut doubled = Cached::new(Duration::from_secs(300), |x: &i32| {
            calls.set(calls.get() + 1);
            x * 2
        });

        assert_eq!(doubled.call(5), 10);
        assert_eq!(doubled.call(5), 10);
        assert_eq!(calls.get(), 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(doubled.state(&5), EntryState::Stale);
        assert_eq!(doubled.call(5), 10);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_wrappers_do_not_share_entries() {
        let calls = Cell::new(0);
        let square = |x: &u32| {
            calls.set(calls.get() + 1);
            x * x
        };
        let mut first = Cached::new(Duration::from_secs(60), square);
        let mut second = Cached::new(Duration::from_secs(60), square);

        first.call(3);
        second.call(3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_try_call_does_not_cache_errors() {
        let attempts = Cell::new(0);
        let mut lookup = Cached::new(Duration::from_secs(60), |id: &u32| {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(format!("lookup {id} failed"))
            } else {
                Ok(format!("user-{id}"))
            }
        });

        assert_eq!(lookup.try_call(1), Err("lookup 1 failed".to_string()));
        assert_eq!(lookup.try_call(1), Ok("user-1".to_string()));
        assert_eq!(lookup.try_call(1), Ok("user-1".to_string()));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_call_key_for_multiple_arguments() {
        let calls = Cell::new(0);
        let mut greet = Cached::new(Duration::from_secs(60), |key: &CallKey| {
            calls.set(calls.get() + 1);
            format!("hello {key}")
        });

        let key = |greeting: &str, name: &str| {
            CallKey::builder()
                .kwarg("name", name)
                .unwrap()
                .kwarg("greeting", greeting)
                .unwrap()
                .build()
        };

        greet.call(key("hi", "ada"));
        greet.call(key("hi", "ada"));
        greet.call(key("hey", "ada"));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_async() {
        let calls = Cell::new(0);
        let mut fetch = Cached::new(Duration::from_secs(10), |id: &u32| {
            calls.set(calls.get() + 1);
            let id = *id;
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                id + 100
            }
        });

        assert_eq!(fetch.call_async(1).await, 101);
        assert_eq!(fetch.call_async(1).await, 101);
        assert_eq!(calls.get(), 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(fetch.call_async(1).await, 101);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_call_async() {
        let calls = Cell::new(0);
        let mut fetch = Cached::new(Duration::from_secs(10), |id: &u32| {
            calls.set(calls.get() + 1);
            let outcome = if *id == 0 {
                Err("invalid id")
            } else {
                Ok(*id * 2)
            };
            async move { outcome }
        });

        assert_eq!(fetch.try_call_async(0).await, Err("invalid id"));
        assert_eq!(fetch.try_call_async(0).await, Err("invalid id"));
        assert_eq!(fetch.try_call_async(4).await, Ok(8));
        assert_eq!(fetch.try_call_async(4).await, Ok(8));
        assert_eq!(calls.get(), 3);
        assert_eq!(fetch.cache().len(), 1);
    }
}
