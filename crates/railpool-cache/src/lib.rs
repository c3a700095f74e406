//! Railpool Cache - In-memory ticket stores
//!
//! This crate implements the two cooperating stores:
//! - `TicketCatalog`: pooled, immutable ticket records keyed by route
//! - `RemainingService`: remaining-seat counters keyed by ticket ID, composed
//!   with catalog records on lookup
//!
//! Each store owns one reader/writer lock around one map. The stores are
//! never locked together, so a composed view may pair a ticket and a counter
//! that were each current when read but never current at the same instant.
//!
//! # Example
//! ```
//! use railpool_cache::TicketServices;
//! use railpool_common::{Ticket, TicketId};
//!
//! let services = TicketServices::default();
//! services.catalog().save(Ticket::new(1, "A", "B", 100.0));
//! services.remaining().save(TicketId::new(1), 10);
//!
//! let view = services.remaining().get("A", "B").unwrap();
//! assert_eq!(view.remaining, 10);
//! assert!(services.remaining().get("X", "Y").is_none());
//! ```

pub mod catalog;
pub mod feed;
pub mod remaining;
pub mod services;
pub mod stats;

// Re-exports
pub use catalog::{TicketCatalog, TicketSource};
pub use feed::{FeedReport, RemainingEntry, TicketFeed};
pub use remaining::{RemainingService, TicketAvailability};
pub use services::{TicketServices, shared_services};
pub use stats::{CatalogStats, RemainingStats};
