//! Ticket services bundle
//!
//! `TicketServices` wires one catalog to one remaining-seat service. Build it
//! once at startup and pass it to whatever serves queries; `shared_services`
//! offers a lazily built process-wide instance for callers that cannot thread
//! one through.

use crate::catalog::TicketCatalog;
use crate::remaining::RemainingService;
use crate::stats::PrometheusText;
use railpool_common::CacheConfig;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Catalog and remaining-seat service sharing one catalog
pub struct TicketServices {
    catalog: Arc<TicketCatalog>,
    remaining: RemainingService<TicketCatalog>,
}

impl TicketServices {
    /// Create both stores sized according to `config`
    pub fn new(config: &CacheConfig) -> Self {
        let catalog = Arc::new(TicketCatalog::with_capacity(config.catalog_capacity));
        let remaining =
            RemainingService::with_capacity(Arc::clone(&catalog), config.remaining_capacity);
        info!(
            catalog_capacity = config.catalog_capacity,
            remaining_capacity = config.remaining_capacity,
            "Ticket services initialized"
        );
        Self { catalog, remaining }
    }

    /// Ticket catalog
    pub fn catalog(&self) -> &Arc<TicketCatalog> {
        &self.catalog
    }

    /// Remaining-seat service
    pub fn remaining(&self) -> &RemainingService<TicketCatalog> {
        &self.remaining
    }

    /// Render statistics of both stores in Prometheus text format
    pub fn render_prometheus(&self) -> String {
        PrometheusText {
            catalog: self.catalog.stats(),
            catalog_len: self.catalog.len(),
            remaining: self.remaining.stats(),
            remaining_len: self.remaining.len(),
        }
        .to_string()
    }
}

impl Default for TicketServices {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

/// Global ticket services instance
static SHARED_SERVICES: OnceLock<TicketServices> = OnceLock::new();

/// Get the global ticket services instance, built with defaults on first use
pub fn shared_services() -> &'static TicketServices {
    SHARED_SERVICES.get_or_init(TicketServices::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use railpool_common::{Ticket, TicketId};

    #[test]
    fn test_services_share_catalog() {
        let services = TicketServices::default();
        services.catalog().save(Ticket::new(1, "A", "B", 100.0));
        services.remaining().save(TicketId::new(1), 10);

        assert!(Arc::ptr_eq(services.catalog(), services.remaining().source()));
        let view = services.remaining().get("A", "B").unwrap();
        assert_eq!(view.remaining, 10);
        assert_eq!(view.price(), 100.0);
    }

    #[test]
    fn test_shared_services_initialized_once() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| shared_services() as *const TicketServices as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert!(std::ptr::eq(shared_services(), shared_services()));
    }

    #[test]
    fn test_render_prometheus() {
        let services = TicketServices::default();
        services.catalog().save(Ticket::new(1, "A", "B", 100.0));
        services.remaining().get("A", "B");
        services.remaining().get("X", "Y");

        let text = services.render_prometheus();
        assert!(text.contains("railpool_catalog_routes 1\n"));
        assert!(text.contains("railpool_catalog_saves_total{kind=\"insert\"} 1\n"));
        assert!(text.contains("railpool_remaining_lookups_total{result=\"defaulted\"} 1\n"));
        assert!(text.contains("railpool_remaining_lookups_total{result=\"not_found\"} 1\n"));
    }

    #[test]
    fn test_concurrent_catalog_and_remaining_writers() {
        let services = TicketServices::default();
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200u64 {
                    services
                        .catalog()
                        .save(Ticket::new(i, "A", format!("D{i}"), 10.0));
                }
            });
            s.spawn(|| {
                for i in 0..200u64 {
                    services.remaining().save(TicketId::new(i), 7);
                }
            });
            s.spawn(|| {
                for i in 0..200u64 {
                    // Either side may not be written yet
                    if let Some(view) = services.remaining().get("A", &format!("D{i}")) {
                        assert_eq!(view.id(), TicketId::new(i));
                        assert!(view.remaining == 0 || view.remaining == 7);
                    }
                }
            });
        });

        for i in 0..200u64 {
            assert_eq!(
                services.remaining().get("A", &format!("D{i}")).unwrap().remaining,
                7
            );
        }
    }
}
