//! Pooled ticket catalog
//!
//! Ticket records carry the intrinsic data of a route (schedule, stops,
//! price) and are shared rather than copied: the catalog hands out
//! `Arc<Ticket>` handles, and a save replaces the handle stored for a route
//! without touching tickets already handed out.

use crate::stats::CatalogStats;
use parking_lot::RwLock;
use railpool_common::{RouteKey, Ticket};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{debug, trace};

/// Read side of a ticket store
///
/// `RemainingService` only needs to look tickets up, so it depends on this
/// trait rather than on the catalog itself.
pub trait TicketSource: Send + Sync {
    /// Look up the ticket for a route, `None` if the route is unknown
    fn ticket(&self, origin: &str, destination: &str) -> Option<Arc<Ticket>>;
}

/// Tickets for one origin, indexed by destination
type Destinations = HashMap<String, Arc<Ticket>>;

/// Deduplicating store of immutable tickets keyed by route
///
/// The map is nested by origin then destination so a lookup can probe with
/// borrowed `&str` endpoints instead of building a `RouteKey`.
pub struct TicketCatalog {
    /// Tickets indexed by origin, then destination
    tickets: RwLock<HashMap<String, Destinations>>,
    /// Catalog statistics
    stats: CatalogStats,
}

impl Default for TicketCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a catalog sized for `capacity` origins
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tickets: RwLock::new(HashMap::with_capacity(capacity)),
            stats: CatalogStats::default(),
        }
    }

    /// Look up the ticket for a route
    ///
    /// A missing route is a normal outcome and yields `None`.
    pub fn get(&self, origin: &str, destination: &str) -> Option<Arc<Ticket>> {
        let ticket = self
            .tickets
            .read()
            .get(origin)
            .and_then(|destinations| destinations.get(destination))
            .cloned();

        if ticket.is_some() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
        }
        trace!(origin, destination, found = ticket.is_some(), "Catalog lookup");
        ticket
    }

    /// Store a ticket under the route derived from its own origin and destination
    ///
    /// Overwrites whatever was stored for that route and returns it. When two
    /// saves race on one route, whichever takes the write lock last wins.
    pub fn save(&self, ticket: impl Into<Arc<Ticket>>) -> Option<Arc<Ticket>> {
        let ticket = ticket.into();
        let key = ticket.route_key();
        let id = ticket.id;

        let previous = {
            let mut tickets = self.tickets.write();
            tickets
                .entry(key.origin().to_string())
                .or_default()
                .insert(key.destination().to_string(), ticket)
        };

        match &previous {
            Some(old) => {
                self.stats.replacements.fetch_add(1, Ordering::Relaxed);
                debug!(route = %key, ticket_id = %id, replaced_id = %old.id, "Replaced ticket");
            }
            None => {
                self.stats.inserts.fetch_add(1, Ordering::Relaxed);
                debug!(route = %key, ticket_id = %id, "Saved ticket");
            }
        }
        previous
    }

    /// Check if a route has a ticket
    pub fn contains(&self, origin: &str, destination: &str) -> bool {
        self.tickets
            .read()
            .get(origin)
            .is_some_and(|destinations| destinations.contains_key(destination))
    }

    /// All routes currently held, in no particular order
    pub fn routes(&self) -> Vec<RouteKey> {
        self.tickets
            .read()
            .iter()
            .flat_map(|(origin, destinations)| {
                destinations
                    .keys()
                    .map(move |destination| RouteKey::new(origin.clone(), destination.clone()))
            })
            .collect()
    }

    /// Get the current number of routes in the catalog
    pub fn len(&self) -> usize {
        self.tickets.read().values().map(HashMap::len).sum()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tickets.read().values().all(HashMap::is_empty)
    }

    /// Get catalog statistics
    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }
}

impl TicketSource for TicketCatalog {
    fn ticket(&self, origin: &str, destination: &str) -> Option<Arc<Ticket>> {
        self.get(origin, destination)
    }
}
