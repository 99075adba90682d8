//! services/store/src/error.rs
//!
//! Defines the primary error type for the store service's startup and
//! shutdown paths.

use crate::adapters::kv::KvError;
use crate::config::ConfigError;
use grepbook_core::ports::PortError;

/// The primary error type for the `store` service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying storage engine.
    #[error("Database Error: {0}")]
    Database(#[from] KvError),

    /// Represents a standard Input/Output error (e.g., creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
