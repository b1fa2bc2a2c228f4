//! In-memory memoization of warehouse query results.
//!
//! Entries are keyed by [`SqlQuery`] (template text plus bound parameters)
//! and never expire: a result stays until [`QueryCache::invalidate_all`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fcdash_warehouse::{QueryResult, SqlQuery};
use tracing::debug;

use crate::diagnostic::Diagnostic;

/// A memoized lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// The query succeeded (possibly with zero rows).
    Ready(Arc<QueryResult>),
    /// The query failed; the diagnostic is replayed on every hit.
    Absent { diagnostic: Diagnostic },
}

impl CacheEntry {
    pub fn result(&self) -> Option<&Arc<QueryResult>> {
        match self {
            Self::Ready(result) => Some(result),
            Self::Absent { .. } => None,
        }
    }
}

/// Hit and miss counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<SqlQuery, CacheEntry>,
    stats: CacheStats,
}

/// Thread-safe query cache shared by every render of the process.
#[derive(Debug, Default)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `key`, computing and storing it on a miss.
    ///
    /// The lock is held while `compute` runs, so concurrent callers asking
    /// for the same key never execute it twice.
    pub fn get_or_insert_with<F>(&self, key: &SqlQuery, compute: F) -> CacheEntry
    where
        F: FnOnce() -> CacheEntry,
    {
        let mut inner = self.lock();
        if let Some(entry) = inner.map.get(key).cloned() {
            inner.stats.hits += 1;
            debug!(query = %key, "query cache hit");
            return entry;
        }

        inner.stats.misses += 1;
        debug!(query = %key, "query cache miss");
        let entry = compute();
        inner.map.insert(key.clone(), entry.clone());
        entry
    }

    /// Look up `key` without computing anything.
    #[cfg(test)]
    pub(crate) fn get(&self, key: &SqlQuery) -> Option<CacheEntry> {
        self.lock().map.get(key).cloned()
    }

    /// Drop every entry. Counters are kept.
    pub fn invalidate_all(&self) {
        let mut inner = self.lock();
        let dropped = inner.map.len();
        inner.map.clear();
        debug!(dropped, "query cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().map.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use serde_json::json;
    use std::cell::Cell;

    fn ready(value: i64) -> CacheEntry {
        CacheEntry::Ready(Arc::new(QueryResult::from_rows(
            &["value"],
            vec![vec![json!(value)]],
        )))
    }

    #[test]
    fn computes_once_per_key() {
        let cache = QueryCache::new();
        let key = SqlQuery::new("SELECT 1");
        let calls = Cell::new(0);

        let first = cache.get_or_insert_with(&key, || {
            calls.set(calls.get() + 1);
            ready(1)
        });
        let second = cache.get_or_insert_with(&key, || {
            calls.set(calls.get() + 1);
            ready(2)
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn invalidate_all_forces_recompute() {
        let cache = QueryCache::new();
        let key = SqlQuery::new("SELECT 1");

        cache.get_or_insert_with(&key, || ready(1));
        cache.invalidate_all();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key), None);

        let entry = cache.get_or_insert_with(&key, || ready(2));
        assert_eq!(entry, ready(2));
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn parameters_are_part_of_the_key() {
        let cache = QueryCache::new();
        let alice = SqlQuery::new("SELECT * FROM t WHERE name = ?").bind("Alice");
        let bob = SqlQuery::new("SELECT * FROM t WHERE name = ?").bind("Bob");

        cache.get_or_insert_with(&alice, || ready(1));
        let entry = cache.get_or_insert_with(&bob, || ready(2));

        assert_eq!(entry, ready(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_memoized_with_their_diagnostic() {
        let cache = QueryCache::new();
        let key = SqlQuery::new("SELECT broken");
        let absent = CacheEntry::Absent {
            diagnostic: Diagnostic {
                kind: DiagnosticKind::QueryFailure,
                message: String::from("쿼리 실행 오류: boom"),
            },
        };

        cache.get_or_insert_with(&key, || absent.clone());
        let replayed = cache.get_or_insert_with(&key, || ready(1));

        assert_eq!(replayed, absent);
        assert!(replayed.result().is_none());
    }
}
