use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;

/// Advisory memoization used by the session to skip recomputation across
/// reactive re-renders. Purely an optimization: every call site must behave
/// identically with [`NoopMemo`] plugged in.
pub trait Memo<V> {
    fn get(&mut self, key: u64) -> Option<V>;
    fn put(&mut self, key: u64, value: V);
}

/// Bounded LRU-backed memo.
pub struct LruMemo<V> {
    inner: LruCache<u64, V>,
}

impl<V: Clone> LruMemo<V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        LruMemo {
            inner: LruCache::new(capacity),
        }
    }
}

impl<V: Clone> Memo<V> for LruMemo<V> {
    fn get(&mut self, key: u64) -> Option<V> {
        self.inner.get(&key).cloned()
    }

    fn put(&mut self, key: u64, value: V) {
        self.inner.put(key, value);
    }
}

/// A memo that never remembers anything; injected in tests to prove caching
/// is not load-bearing.
pub struct NoopMemo;

impl<V> Memo<V> for NoopMemo {
    fn get(&mut self, _key: u64) -> Option<V> {
        None
    }

    fn put(&mut self, _key: u64, _value: V) {}
}

/// Hash any input tuple into a memo key.
pub fn memo_key<T: Hash>(input: &T) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    input.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_memo_remembers_and_evicts() {
        let mut memo: LruMemo<String> = LruMemo::new(2);
        memo.put(1, "one".into());
        memo.put(2, "two".into());
        assert_eq!(memo.get(1).as_deref(), Some("one"));

        // key 2 is now least-recently used and gets evicted
        memo.put(3, "three".into());
        assert_eq!(memo.get(2), None);
        assert_eq!(memo.get(3).as_deref(), Some("three"));
    }

    #[test]
    fn noop_memo_never_hits() {
        let mut memo = NoopMemo;
        Memo::<u32>::put(&mut memo, 7, 42);
        assert_eq!(Memo::<u32>::get(&mut memo, 7), None);
    }

    #[test]
    fn memo_key_is_stable_for_equal_inputs() {
        assert_eq!(memo_key(&("a", 1)), memo_key(&("a", 1)));
        assert_ne!(memo_key(&("a", 1)), memo_key(&("a", 2)));
    }
}
