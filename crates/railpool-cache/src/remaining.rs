//! Remaining-seat overlay
//!
//! Seat counts change far more often than the tickets they belong to, so
//! they live in their own map keyed by ticket ID and are joined with the
//! catalog record only when someone asks.

use crate::catalog::{TicketCatalog, TicketSource};
use crate::stats::RemainingStats;
use chrono::NaiveTime;
use parking_lot::RwLock;
use railpool_common::{Ticket, TicketId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{debug, trace};

/// A ticket together with its remaining seats, valid for one answer only
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketAvailability {
    /// Shared ticket record from the catalog
    #[serde(flatten)]
    pub ticket: Arc<Ticket>,
    /// Remaining seats, zero when no counter was recorded
    pub remaining: u32,
}

impl TicketAvailability {
    /// Ticket identifier
    pub fn id(&self) -> TicketId {
        self.ticket.id
    }

    /// Departure station
    pub fn origin(&self) -> &str {
        &self.ticket.origin
    }

    /// Arrival station
    pub fn destination(&self) -> &str {
        &self.ticket.destination
    }

    /// Scheduled departure time
    pub fn departure(&self) -> NaiveTime {
        self.ticket.departure
    }

    /// Scheduled arrival time
    pub fn arrival(&self) -> NaiveTime {
        self.ticket.arrival
    }

    /// Intermediate stops, in travel order
    pub fn stops(&self) -> &[String] {
        &self.ticket.stops
    }

    /// Fare
    pub fn price(&self) -> f64 {
        self.ticket.price
    }

    /// No seats left
    pub fn is_sold_out(&self) -> bool {
        self.remaining == 0
    }
}

/// Remaining-seat counters composed with tickets from a `TicketSource`
///
/// Counters are not checked against the source: a counter may be written
/// before its ticket exists, or outlive the ticket it was written for.
pub struct RemainingService<S: ?Sized = TicketCatalog> {
    /// Where ticket records come from
    source: Arc<S>,
    /// Remaining seats indexed by ticket ID
    remaining: RwLock<HashMap<TicketId, u32>>,
    /// Service statistics
    stats: RemainingStats,
}

impl<S: TicketSource + ?Sized> RemainingService<S> {
    /// Create a new service with no counters
    pub fn new(source: Arc<S>) -> Self {
        Self::with_capacity(source, 0)
    }

    /// Create a service sized for `capacity` counters
    pub fn with_capacity(source: Arc<S>, capacity: usize) -> Self {
        Self {
            source,
            remaining: RwLock::new(HashMap::with_capacity(capacity)),
            stats: RemainingStats::default(),
        }
    }

    /// Look up a route and its remaining seats
    ///
    /// Returns `None` when the source has no ticket for the route; the
    /// counters are not consulted in that case. The source lookup completes
    /// before the counter lock is taken.
    pub fn get(&self, origin: &str, destination: &str) -> Option<TicketAvailability> {
        let Some(ticket) = self.source.ticket(origin, destination) else {
            self.stats.short_circuited.fetch_add(1, Ordering::Relaxed);
            trace!(origin, destination, "No ticket for route");
            return None;
        };

        let counter = self.remaining.read().get(&ticket.id).copied();
        let remaining = match counter {
            Some(n) => {
                self.stats.counted.fetch_add(1, Ordering::Relaxed);
                n
            }
            None => {
                self.stats.defaulted.fetch_add(1, Ordering::Relaxed);
                0
            }
        };

        trace!(origin, destination, ticket_id = %ticket.id, remaining, "Remaining lookup");
        Some(TicketAvailability { ticket, remaining })
    }

    /// Set the remaining seats for a ticket ID, returning the previous count
    pub fn save(&self, id: TicketId, quantity: u32) -> Option<u32> {
        let previous = self.remaining.write().insert(id, quantity);
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        debug!(ticket_id = %id, quantity, ?previous, "Saved remaining seats");
        previous
    }

    /// Raw counter for a ticket ID, without consulting the source
    pub fn remaining(&self, id: TicketId) -> Option<u32> {
        self.remaining.read().get(&id).copied()
    }

    /// Get the current number of counters
    pub fn len(&self) -> usize {
        self.remaining.read().len()
    }

    /// Check if no counters are recorded
    pub fn is_empty(&self) -> bool {
        self.remaining.read().is_empty()
    }

    /// Ticket source this service composes with
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Get service statistics
    pub fn stats(&self) -> &RemainingStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn service() -> (Arc<TicketCatalog>, RemainingService) {
        let catalog = Arc::new(TicketCatalog::new());
        let service = RemainingService::new(Arc::clone(&catalog));
        (catalog, service)
    }

    /// Source that knows no routes and counts how often it was asked
    #[derive(Default)]
    struct EmptySource {
        calls: AtomicUsize,
    }

    impl TicketSource for EmptySource {
        fn ticket(&self, _origin: &str, _destination: &str) -> Option<Arc<Ticket>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    #[test]
    fn test_remaining_scenario() {
        let (catalog, service) = service();
        catalog.save(Ticket::new(1, "A", "B", 100.0));
        service.save(TicketId::new(1), 10);

        let view = service.get("A", "B").unwrap();
        assert_eq!(view.origin(), "A");
        assert_eq!(view.destination(), "B");
        assert_eq!(view.price(), 100.0);
        assert_eq!(view.remaining, 10);

        assert_eq!(service.save(TicketId::new(1), 0), Some(10));
        let after = service.get("A", "B").unwrap();
        assert_eq!(after.remaining, 0);
        assert!(after.is_sold_out());
        assert_eq!(after.ticket, view.ticket);
    }

    #[test]
    fn test_unknown_route_is_none() {
        let (_catalog, service) = service();
        assert!(service.get("X", "Y").is_none());
    }

    #[test]
    fn test_missing_counter_defaults_to_zero() {
        let (catalog, service) = service();
        catalog.save(Ticket::new(5, "A", "B", 80.0));

        let view = service.get("A", "B").unwrap();
        assert_eq!(view.id(), TicketId::new(5));
        assert_eq!(view.remaining, 0);
        assert_eq!(service.stats().defaulted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_counter_without_ticket_is_not_composed() {
        let source = Arc::new(EmptySource::default());
        let service = RemainingService::new(Arc::clone(&source));
        service.save(TicketId::new(1), 10);

        assert!(service.get("A", "B").is_none());
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
        assert_eq!(service.stats().short_circuited.load(Ordering::Relaxed), 1);
        assert_eq!(service.stats().counted.load(Ordering::Relaxed), 0);
        assert_eq!(service.stats().defaulted.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_dyn_source() {
        let catalog: Arc<dyn TicketSource> = {
            let catalog = TicketCatalog::new();
            catalog.save(Ticket::new(1, "A", "B", 100.0));
            Arc::new(catalog)
        };
        let service = RemainingService::new(catalog);
        service.save(TicketId::new(1), 3);
        assert_eq!(service.get("A", "B").unwrap().remaining, 3);
    }

    #[test]
    fn test_counters_outlive_replaced_tickets() {
        let (catalog, service) = service();
        catalog.save(Ticket::new(1, "A", "B", 100.0));
        service.save(TicketId::new(1), 5);

        catalog.save(Ticket::new(2, "A", "B", 110.0));
        let view = service.get("A", "B").unwrap();
        assert_eq!(view.id(), TicketId::new(2));
        assert_eq!(view.remaining, 0);

        assert_eq!(service.remaining(TicketId::new(1)), Some(5));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_counter_may_precede_ticket() {
        let (catalog, service) = service();
        service.save(TicketId::new(9), 42);
        assert!(service.get("A", "B").is_none());

        catalog.save(Ticket::new(9, "A", "B", 60.0));
        assert_eq!(service.get("A", "B").unwrap().remaining, 42);
    }

    #[test]
    fn test_view_serializes_flat() {
        let (catalog, service) = service();
        catalog.save(Ticket::new(1, "A", "B", 100.0).with_stops(["M"]));
        service.save(TicketId::new(1), 10);

        let json = serde_json::to_value(service.get("A", "B").unwrap()).unwrap();
        assert_eq!(json["origin"], "A");
        assert_eq!(json["destination"], "B");
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["remaining"], 10);
        assert_eq!(json["stops"][0], "M");
    }

    #[test]
    fn test_concurrent_composed_reads_and_disjoint_writes() {
        const ROUTES: u64 = 32;
        const WRITERS: u64 = 4;

        let (catalog, service) = service();
        for i in 0..ROUTES {
            catalog.save(Ticket::new(i, "hub", format!("R{i}"), 50.0));
        }

        std::thread::scope(|s| {
            // Each writer owns the IDs congruent to its index
            for w in 0..WRITERS {
                let service = &service;
                s.spawn(move || {
                    for round in 0..200u32 {
                        for id in (w..ROUTES).step_by(WRITERS as usize) {
                            service.save(TicketId::new(id), round);
                        }
                    }
                });
            }
            for _ in 0..8 {
                let service = &service;
                s.spawn(move || {
                    for i in 0..ROUTES {
                        let view = service.get("hub", &format!("R{i}")).unwrap();
                        assert_eq!(view.id(), TicketId::new(i));
                        assert!(view.remaining < 200);
                    }
                });
            }
        });

        assert_eq!(service.len() as u64, ROUTES);
        for i in 0..ROUTES {
            assert_eq!(service.remaining(TicketId::new(i)), Some(199));
            assert_eq!(service.get("hub", &format!("R{i}")).unwrap().remaining, 199);
        }
    }
}
