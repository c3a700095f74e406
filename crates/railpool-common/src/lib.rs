//! Railpool Common - Shared types and utilities
//!
//! This crate provides the ticket record types, error definitions and
//! configuration structures used across all Railpool components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CacheConfig, Config, LoggingConfig};
pub use error::{Error, Result};
pub use types::*;
