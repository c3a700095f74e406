//! Core type definitions for Railpool
//!
//! This module defines the ticket record, its identifier and the composite
//! route key under which ticket records are pooled.

use chrono::NaiveTime;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between origin and destination when a route key is rendered
pub const ROUTE_KEY_SEPARATOR: char = '-';

/// Unique identifier for a ticket record
///
/// Uniqueness across routes is the producer's responsibility; nothing in the
/// stores checks it.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct TicketId(u64);

impl TicketId {
    /// Create a ticket ID from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TicketId({})", self.0)
    }
}

/// Composite key identifying a route: origin plus destination
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    origin: String,
    destination: String,
}

impl RouteKey {
    /// Create a route key from its two endpoints
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Departure station
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Arrival station
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.origin, ROUTE_KEY_SEPARATOR, self.destination
        )
    }
}

impl fmt::Debug for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteKey({:?})", self.to_string())
    }
}

/// Intrinsic ticket data: route, schedule and price
///
/// Once handed to the catalog a ticket is shared behind an `Arc` and never
/// changed; an update is a new `Ticket` saved under the same route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier, also the key for remaining-seat counters
    pub id: TicketId,
    /// Departure station
    pub origin: String,
    /// Arrival station
    pub destination: String,
    /// Scheduled departure time
    pub departure: NaiveTime,
    /// Scheduled arrival time (may be earlier than departure for overnight trips)
    pub arrival: NaiveTime,
    /// Intermediate stops, in travel order
    #[serde(default)]
    pub stops: Vec<String>,
    /// Fare
    pub price: f64,
}

impl Ticket {
    /// Create a ticket with no intermediate stops and a midnight schedule
    #[must_use]
    pub fn new(
        id: u64,
        origin: impl Into<String>,
        destination: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: TicketId::new(id),
            origin: origin.into(),
            destination: destination.into(),
            departure: NaiveTime::MIN,
            arrival: NaiveTime::MIN,
            stops: Vec::new(),
            price,
        }
    }

    /// Set departure and arrival times
    #[must_use]
    pub fn with_schedule(mut self, departure: NaiveTime, arrival: NaiveTime) -> Self {
        self.departure = departure;
        self.arrival = arrival;
        self
    }

    /// Set the intermediate stops
    #[must_use]
    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }

    /// Route key this ticket is pooled under
    #[must_use]
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }

    /// Check that the ticket describes a usable route and fare
    pub fn validate(&self) -> Result<(), TicketError> {
        if self.origin.trim().is_empty() {
            return Err(TicketError::EmptyOrigin);
        }
        if self.destination.trim().is_empty() {
            return Err(TicketError::EmptyDestination);
        }
        if self.origin == self.destination {
            return Err(TicketError::SameEndpoints(self.origin.clone()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(TicketError::InvalidPrice(self.price));
        }
        if let Some(index) = self.stops.iter().position(|s| s.trim().is_empty()) {
            return Err(TicketError::EmptyStop(index));
        }
        Ok(())
    }
}

/// Errors that can occur when validating a ticket
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TicketError {
    #[error("origin must not be empty")]
    EmptyOrigin,
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("origin and destination are both {0:?}")]
    SameEndpoints(String),
    #[error("price must be a finite non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("stop #{0} has an empty name")]
    EmptyStop(usize),
}
