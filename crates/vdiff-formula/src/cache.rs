//! Memoizing oracle decorator using moka
//!
//! Presence conditions of sibling artifacts are frequently identical, so the
//! same satisfiability question is asked many times per diff.
//! [`CachingOracle`] remembers answers in a bounded concurrent cache.

use crate::formula::Formula;
use crate::oracle::{FormulaOracle, OracleError};
use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from the cache
    pub hits: u64,
    /// Queries forwarded to the inner oracle
    pub misses: u64,
}

/// Oracle decorator caching satisfiability answers
///
/// Only successful answers are cached; errors always propagate and the next
/// identical query is retried against the inner oracle.
#[derive(Debug)]
pub struct CachingOracle<O> {
    inner: O,
    cache: Cache<Formula, bool>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<O: FormulaOracle> CachingOracle<O> {
    /// Wrap an oracle with a cache of at most `max_capacity` entries
    #[inline]
    #[must_use]
    pub fn new(inner: O, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped oracle
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Hit/miss counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached answer
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl<O: FormulaOracle> FormulaOracle for CachingOracle<O> {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError> {
        if let Some(answer) = self.cache.get(formula) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(answer);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let answer = self.inner.is_satisfiable(formula)?;
        self.cache.insert(formula.clone(), answer);
        Ok(answer)
    }
}
