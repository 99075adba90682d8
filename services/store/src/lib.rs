//! services/store/src/lib.rs
//!
//! Storage adapter for grepbook: book reviews, users and login sessions kept
//! in an embedded redb database, exposed through the `grepbook_core` ports.

pub mod adapters;
pub mod config;
pub mod error;
pub mod state;

pub use adapters::DbAdapter;
pub use config::{Config, HashingConfig};
pub use error::ServiceError;
pub use state::AppState;
