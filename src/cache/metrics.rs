//! Resolver cache metrics.
//!
//! Counters for lookups and resolver constructions, reported on the health
//! endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by one resolver cache.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups answered by an already built resolver
    hits: AtomicUsize,

    /// Lookups that had to build a resolver
    misses: AtomicUsize,

    /// Resolvers successfully built
    constructions: AtomicUsize,

    /// Resolver constructions that failed
    construction_failures: AtomicUsize,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_construction(&self) {
        self.constructions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_construction_failure(&self) {
        self.construction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }

    pub fn construction_failures(&self) -> usize {
        self.construction_failures.load(Ordering::Relaxed)
    }

    /// Generate a report; `entries` is the number of resolvers currently held.
    pub fn report(&self, entries: usize) -> CacheReport {
        let hits = self.hits();
        let misses = self.misses();
        let lookups = hits + misses;
        let hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        CacheReport {
            entries,
            hits,
            misses,
            hit_rate,
            constructions: self.constructions(),
            construction_failures: self.construction_failures(),
        }
    }
}

/// Snapshot of a resolver cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    /// Number of resolvers held
    pub entries: usize,

    pub hits: usize,

    pub misses: usize,

    /// Hit rate as a percentage (0-100)
    pub hit_rate: f64,

    pub constructions: usize,

    pub construction_failures: usize,
}
