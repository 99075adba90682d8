//! services/store/src/adapters/sessions.rs
//!
//! `SessionService` over the `sessions` bucket. A session row only names the
//! user's email; the user itself is re-read on every lookup.

use grepbook_core::domain::{Session, User};
use grepbook_core::ids::new_session_key;
use grepbook_core::ports::{PortError, PortResult, SessionService, UserService};
use tracing::debug;

use crate::adapters::codec::{decode_session, encode_session};
use crate::adapters::db::DbAdapter;
use crate::adapters::kv::{Buckets, KvError};
use crate::adapters::validation::ensure_email;

impl SessionService for DbAdapter {
    fn create_session_for_user(&self, email: &str) -> PortResult<Session> {
        ensure_email(email)?;
        let session = Session {
            key: new_session_key(),
            email: email.to_string(),
        };

        let bytes = encode_session(&session).map_err(KvError::from)?;
        self.kv.put(Buckets::SESSIONS, &session.key, &bytes)?;
        debug!("Created session for {}", session.email);
        Ok(session)
    }

    fn get_user_by_session_key(&self, key: &str) -> PortResult<User> {
        let bytes = self
            .kv
            .get(Buckets::SESSIONS, key)?
            .ok_or_else(|| PortError::NotFound("Session not found".to_string()))?;
        let session = decode_session(&bytes).map_err(KvError::from)?;
        self.get_user(&session.email)
    }

    fn delete_session(&self, key: &str) -> PortResult<()> {
        self.kv.delete(Buckets::SESSIONS, key)?;
        debug!("Deleted session");
        Ok(())
    }
}
