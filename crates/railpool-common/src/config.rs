//! Configuration types for Railpool
//!
//! This module defines configuration structures used across components.
//! Every section falls back to its defaults when left out of a config file.

use serde::{Deserialize, Serialize};

/// Root configuration for Railpool
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store sizing
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Sizing hints for the in-memory stores
///
/// Neither store evicts; these only size the maps up front.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Initial capacity of the ticket catalog (routes)
    pub catalog_capacity: usize,
    /// Initial capacity of the remaining-seat counters (ticket IDs)
    pub remaining_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            catalog_capacity: 64,
            remaining_capacity: 16,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
