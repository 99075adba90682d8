//! services/store/src/state.rs
//!
//! Defines the application's shared state: the context object handed to every
//! caller of the persistence layer.

use std::fs;
use std::sync::Arc;

use grepbook_core::ports::{BookReviewService, SessionService, UserService};
use tracing::info;

use crate::adapters::{DbAdapter, KvStore, PasswordHasher};
use crate::config::Config;
use crate::error::ServiceError;

//=========================================================================================
// AppState (Shared Across All Callers)
//=========================================================================================

/// The shared application state, created once at startup and passed to all callers.
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<dyn BookReviewService>,
    pub users: Arc<dyn UserService>,
    pub sessions: Arc<dyn SessionService>,
    pub config: Arc<Config>,
    kv: KvStore,
}

impl AppState {
    /// Opens the store named by `config` and wires the services to it.
    pub fn open(config: Arc<Config>) -> Result<Self, ServiceError> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let kv = KvStore::open(&config.database_path)?;
        let hasher = PasswordHasher::new(&config.hashing).map_err(|e| {
            ServiceError::Internal(format!("invalid password hashing parameters: {}", e))
        })?;
        Ok(Self::from_adapter(DbAdapter::new(kv, hasher), config))
    }

    /// Wires the services to an already constructed adapter.
    pub fn from_adapter(adapter: DbAdapter, config: Arc<Config>) -> Self {
        let kv = adapter.kv().clone();
        let adapter = Arc::new(adapter);
        Self {
            reviews: adapter.clone(),
            users: adapter.clone(),
            sessions: adapter,
            config,
            kv,
        }
    }

    /// Releases the store. Other clones of this state keep it open.
    pub fn close(self) {
        info!("Closing store at {}", self.config.database_path.display());
        let Self {
            reviews,
            users,
            sessions,
            kv,
            ..
        } = self;
        drop((reviews, users, sessions));
        kv.close();
    }
}
