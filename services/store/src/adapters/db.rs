//! services/store/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the service ports from the `core` crate. The port implementations live in
//! `book_reviews.rs`, `users.rs` and `sessions.rs`; this file holds the shared
//! struct and its collaborators.

use std::sync::Arc;

use grepbook_core::ports::{Clock, SystemClock};

use crate::adapters::kv::KvStore;
use crate::adapters::password::PasswordHasher;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `BookReviewService`, `UserService`
/// and `SessionService` ports over one shared store handle.
#[derive(Clone)]
pub struct DbAdapter {
    pub(crate) kv: KvStore,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) hasher: PasswordHasher,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` using the wall clock.
    pub fn new(kv: KvStore, hasher: PasswordHasher) -> Self {
        Self {
            kv,
            clock: Arc::new(SystemClock),
            hasher,
        }
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying store handle.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }
}
