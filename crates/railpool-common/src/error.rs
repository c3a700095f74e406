//! Error types for Railpool
//!
//! Lookups in the stores never fail: a missing route is `None`. The errors
//! here cover the edges around the stores, namely feed ingestion and
//! configuration loading.

use crate::types::{TicketError, TicketId};
use thiserror::Error;

/// Common result type for Railpool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Railpool
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid ticket {id}: {source}")]
    InvalidTicket {
        id: TicketId,
        #[source]
        source: TicketError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Create an invalid ticket error
    pub fn invalid_ticket(id: TicketId, source: TicketError) -> Self {
        Self::InvalidTicket { id, source }
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a deserialization error
    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }

    /// Check if retrying the same call could succeed
    ///
    /// Only transient I/O failures qualify; bad input fails the same way
    /// every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            Self::InvalidTicket { .. } | Self::Configuration(_) | Self::Deserialization(_) => false,
        }
    }

    /// Check if the error was caused by bad input rather than the environment
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidTicket { .. } | Self::Configuration(_) | Self::Deserialization(_)
        )
    }
}
