//! Bounded least-recently-used memo tables for derivative and integral results.
//!
//! Keys are the canonical rendering of the term plus the variable name, so two
//! structurally equal terms always share an entry. A lookup refreshes recency;
//! inserting into a full table evicts the entry whose last use is oldest.
use crate::symbolic::symbolic_engine::Expr;
use std::collections::{BTreeMap, HashMap};

/// canonical key of `(term, var)`
pub fn cache_key(expr: &Expr, var: &str) -> String {
    format!("{}|{}", var, expr)
}

#[derive(Debug, Clone)]
pub struct LruCache<V: Clone> {
    capacity: usize,
    // key -> (value, stamp of last use)
    entries: HashMap<String, (V, u64)>,
    // stamp -> key, oldest first
    recency: BTreeMap<u64, String>,
    clock: u64,
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        LruCache {
            capacity,
            entries: HashMap::with_capacity(capacity.min(4096)),
            recency: BTreeMap::new(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Returns a copy of the stored value and marks the key as most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let stamp = self.tick();
        let (value, last_used) = self.entries.get_mut(key)?;
        self.recency.remove(&*last_used);
        *last_used = stamp;
        self.recency.insert(stamp, key.to_string());
        Some(value.clone())
    }

    pub fn insert(&mut self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }
        let stamp = self.tick();
        if let Some((_, last_used)) = self.entries.remove(&key) {
            self.recency.remove(&last_used);
        }
        while self.entries.len() >= self.capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.recency.insert(stamp, key.clone());
        self.entries.insert(key, (value, stamp));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_insert() {
        let mut cache: LruCache<String> = LruCache::new(2);
        cache.insert("a".to_string(), "1".to_string());
        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert_eq!(cache.get("b"), None);
        cache.insert("a".to_string(), "2".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some("2".to_string()));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache: LruCache<i32> = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        // touching "a" leaves "b" as the oldest
        cache.get("a");
        cache.insert("c".to_string(), 3);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache: LruCache<i32> = LruCache::new(0);
        cache.insert("a".to_string(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key_uses_canonical_form() {
        let x = Expr::Var("x".to_string());
        let first = x.clone().pow(2.0) + Expr::Const(1.0);
        let second = Expr::Add(Box::new(Expr::Pow(Box::new(x), 2.0)), Box::new(Expr::Const(1.0)));
        assert_eq!(cache_key(&first, "x"), cache_key(&second, "x"));
        assert_ne!(cache_key(&first, "x"), cache_key(&first, "t"));
    }
}
