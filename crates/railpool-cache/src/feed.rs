//! Ticket feed ingestion
//!
//! A feed is a JSON document carrying ticket records and remaining-seat
//! counts, as produced by a scheduling/inventory export:
//!
//! ```json
//! {
//!   "tickets": [
//!     {"id": 1, "origin": "A", "destination": "B",
//!      "departure": "09:00:00", "arrival": "11:30:00",
//!      "stops": ["M"], "price": 100.0}
//!   ],
//!   "remaining": [{"id": 1, "quantity": 10}]
//! }
//! ```
//!
//! The whole feed is validated before anything is written.

use crate::services::TicketServices;
use railpool_common::{Error, Result, Ticket, TicketId};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::info;

/// Remaining-seat count for one ticket ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingEntry {
    pub id: TicketId,
    pub quantity: u32,
}

/// Batch of tickets and remaining-seat counts
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TicketFeed {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub remaining: Vec<RemainingEntry>,
}

/// What applying a feed changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Tickets saved for routes that had none
    pub inserted: usize,
    /// Tickets that replaced an existing route's ticket
    pub replaced: usize,
    /// Remaining-seat counters written
    pub counters: usize,
}

impl TicketFeed {
    /// Parse a feed from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::deserialization(e.to_string()))
    }

    /// Parse a feed from a JSON reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::deserialization(e.to_string()))
    }

    /// Validate every ticket in the feed
    pub fn validate(&self) -> Result<()> {
        for ticket in &self.tickets {
            ticket
                .validate()
                .map_err(|source| Error::invalid_ticket(ticket.id, source))?;
        }
        Ok(())
    }

    /// Validate the feed, then save its tickets and counters
    ///
    /// Nothing is written if any ticket is invalid. Tickets go in first, in
    /// feed order, so a later ticket for the same route wins.
    pub fn apply(self, services: &TicketServices) -> Result<FeedReport> {
        self.validate()?;

        let mut report = FeedReport::default();
        for ticket in self.tickets {
            match services.catalog().save(ticket) {
                Some(_) => report.replaced += 1,
                None => report.inserted += 1,
            }
        }
        for entry in self.remaining {
            services.remaining().save(entry.id, entry.quantity);
            report.counters += 1;
        }

        info!(
            inserted = report.inserted,
            replaced = report.replaced,
            counters = report.counters,
            "Applied ticket feed"
        );
        Ok(report)
    }
}
