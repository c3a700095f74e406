//! Store statistics for monitoring
//!
//! Counters are updated with relaxed atomics outside the store locks, so a
//! reading taken under load is approximate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket catalog statistics
#[derive(Debug, Default)]
pub struct CatalogStats {
    /// Lookups that found a ticket
    pub hits: AtomicU64,
    /// Lookups for a route with no ticket
    pub misses: AtomicU64,
    /// Saves that created a new route
    pub inserts: AtomicU64,
    /// Saves that replaced the ticket of an existing route
    pub replacements: AtomicU64,
}

impl CatalogStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.replacements.store(0, Ordering::Relaxed);
    }
}

/// Remaining-seat service statistics
#[derive(Debug, Default)]
pub struct RemainingStats {
    /// Composed lookups that found a counter
    pub counted: AtomicU64,
    /// Composed lookups that defaulted to zero remaining
    pub defaulted: AtomicU64,
    /// Lookups answered "not found" without reading the counters
    pub short_circuited: AtomicU64,
    /// Counter writes
    pub writes: AtomicU64,
}

impl RemainingStats {
    /// Reset all statistics
    pub fn reset(&self) {
        self.counted.store(0, Ordering::Relaxed);
        self.defaulted.store(0, Ordering::Relaxed);
        self.short_circuited.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }
}

/// Prometheus text exposition of both stores
pub(crate) struct PrometheusText<'a> {
    pub catalog: &'a CatalogStats,
    pub catalog_len: usize,
    pub remaining: &'a RemainingStats,
    pub remaining_len: usize,
}

impl fmt::Display for PrometheusText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        writeln!(f, "# HELP railpool_catalog_lookups_total Ticket catalog lookups")?;
        writeln!(f, "# TYPE railpool_catalog_lookups_total counter")?;
        writeln!(
            f,
            "railpool_catalog_lookups_total{{result=\"hit\"}} {}",
            load(&self.catalog.hits)
        )?;
        writeln!(
            f,
            "railpool_catalog_lookups_total{{result=\"miss\"}} {}",
            load(&self.catalog.misses)
        )?;

        writeln!(f, "# HELP railpool_catalog_saves_total Ticket catalog saves")?;
        writeln!(f, "# TYPE railpool_catalog_saves_total counter")?;
        writeln!(
            f,
            "railpool_catalog_saves_total{{kind=\"insert\"}} {}",
            load(&self.catalog.inserts)
        )?;
        writeln!(
            f,
            "railpool_catalog_saves_total{{kind=\"replace\"}} {}",
            load(&self.catalog.replacements)
        )?;

        writeln!(f, "# HELP railpool_catalog_routes Routes held by the catalog")?;
        writeln!(f, "# TYPE railpool_catalog_routes gauge")?;
        writeln!(f, "railpool_catalog_routes {}", self.catalog_len)?;

        writeln!(
            f,
            "# HELP railpool_remaining_lookups_total Remaining-seat lookups by outcome"
        )?;
        writeln!(f, "# TYPE railpool_remaining_lookups_total counter")?;
        writeln!(
            f,
            "railpool_remaining_lookups_total{{result=\"counted\"}} {}",
            load(&self.remaining.counted)
        )?;
        writeln!(
            f,
            "railpool_remaining_lookups_total{{result=\"defaulted\"}} {}",
            load(&self.remaining.defaulted)
        )?;
        writeln!(
            f,
            "railpool_remaining_lookups_total{{result=\"not_found\"}} {}",
            load(&self.remaining.short_circuited)
        )?;

        writeln!(f, "# HELP railpool_remaining_writes_total Remaining-seat counter writes")?;
        writeln!(f, "# TYPE railpool_remaining_writes_total counter")?;
        writeln!(
            f,
            "railpool_remaining_writes_total {}",
            load(&self.remaining.writes)
        )?;

        writeln!(
            f,
            "# HELP railpool_remaining_counters Ticket IDs with a remaining-seat counter"
        )?;
        writeln!(f, "# TYPE railpool_remaining_counters gauge")?;
        writeln!(f, "railpool_remaining_counters {}", self.remaining_len)
    }
}
