//! services/store/src/adapters/users.rs
//!
//! `UserService` over the `users` bucket, keyed by email. Ids come from the
//! bucket's sequence counter. Password hashes never leave this module: every
//! returned value is a `User`, which has no hash field.

use grepbook_core::domain::{User, UserCredentials, UserDelta};
use grepbook_core::ports::{PortError, PortResult, UserService};
use redb::ReadableTable;
use tracing::{debug, error, info, warn};

use crate::adapters::codec::{decode_user, encode_user};
use crate::adapters::db::DbAdapter;
use crate::adapters::kv::{Buckets, KvError, KvStore};
use crate::adapters::validation::ensure_email;

impl DbAdapter {
    /// Reads the full record, hash included.
    fn get_full_user(&self, email: &str) -> PortResult<UserCredentials> {
        let bytes = self
            .kv
            .get(Buckets::USERS, email)?
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;
        Ok(decode_user(&bytes).map_err(KvError::from)?)
    }

    /// Writes `user` under a key that must not be taken yet. A zero id is
    /// replaced by the next sequence value; the check, the id and the write
    /// share one transaction.
    fn insert_user(&self, user: &mut UserCredentials) -> PortResult<()> {
        let id = self.kv.update(|txn| {
            let mut table = txn.open_table(Buckets::USERS)?;
            if table.get(user.email.as_str())?.is_some() {
                return Err(
                    PortError::DuplicateKey(format!("User {} already exists", user.email)).into(),
                );
            }

            let id = if user.id == 0 {
                KvStore::next_sequence(txn, Buckets::USERS)?
            } else {
                user.id
            };
            let bytes = encode_user(&UserCredentials { id, ..user.clone() })?;
            table.insert(user.email.as_str(), bytes.as_slice())?;
            Ok(id)
        })?;
        user.id = id;
        Ok(())
    }

    /// Overwrites the record stored under `user.email`.
    fn overwrite_user(&self, user: &UserCredentials) -> PortResult<()> {
        let bytes = encode_user(user).map_err(KvError::from)?;
        self.kv.put(Buckets::USERS, &user.email, &bytes)?;
        Ok(())
    }

    fn hash_password(&self, password: &str) -> PortResult<String> {
        self.hasher
            .hash(password)
            .map_err(|e| PortError::Storage(format!("error generating password hash: {}", e)))
    }
}

/// Trims `value` and drops it when nothing is left.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl UserService for DbAdapter {
    fn create_user(&self, email: &str, password: &str) -> PortResult<User> {
        let password = password.trim();
        if password.is_empty() {
            return Err(PortError::Validation("password cannot be empty".to_string()));
        }
        ensure_email(email)?;

        let mut user = UserCredentials {
            id: 0,
            name: String::new(),
            email: email.to_string(),
            password_hash: self.hash_password(password)?,
        };
        self.insert_user(&mut user)?;
        info!(id = user.id, "Created user {}", user.email);
        Ok(user.into_user())
    }

    fn get_user(&self, email: &str) -> PortResult<User> {
        self.get_full_user(email).map(UserCredentials::into_user)
    }

    fn update_user(&self, email: &str, delta: UserDelta) -> PortResult<User> {
        let new_email = present(&delta.email);
        if let Some(new_email) = new_email {
            ensure_email(new_email)?;
        }

        let mut user = self.get_full_user(email)?;
        // Passwords are taken as given; only name and email are trimmed.
        if let Some(password) = delta.password.as_deref().filter(|p| !p.is_empty()) {
            user.password_hash = self.hash_password(password)?;
        }
        if let Some(name) = present(&delta.name) {
            user.name = name.to_string();
        }

        match new_email {
            Some(new_email) if new_email != user.email => {
                // Two separate transactions: a crash in between leaves the
                // user under both keys. The moved record gets a fresh id.
                let mut moved = UserCredentials {
                    id: 0,
                    name: user.name.clone(),
                    email: new_email.to_string(),
                    password_hash: user.password_hash.clone(),
                };
                self.insert_user(&mut moved)?;
                if let Err(e) = self.delete_user(&user.email) {
                    warn!(
                        "User {} copied to {} but the old record was not removed: {}",
                        user.email, moved.email, e
                    );
                    return Err(e);
                }
                info!(id = moved.id, "Moved user {} to {}", user.email, moved.email);
                Ok(moved.into_user())
            }
            _ => {
                self.overwrite_user(&user)?;
                debug!(id = user.id, "Updated user {}", user.email);
                Ok(user.into_user())
            }
        }
    }

    fn is_password_correct(&self, email: &str, password: &str) -> bool {
        match self.get_full_user(email) {
            Ok(user) => self.hasher.verify(password, &user.password_hash),
            Err(PortError::NotFound(_)) => false,
            Err(e) => {
                error!("Failed to read user for password check: {:?}", e);
                false
            }
        }
    }

    fn delete_user(&self, email: &str) -> PortResult<()> {
        self.kv.delete(Buckets::USERS, email)?;
        debug!("Deleted user {}", email);
        Ok(())
    }

    fn does_any_user_exist(&self) -> bool {
        match self.kv.key_count(Buckets::USERS) {
            Ok(count) => count > 0,
            Err(e) => {
                error!("Failed to count users: {:?}", e);
                false
            }
        }
    }

    fn get_name(&self) -> PortResult<String> {
        let rows = self.kv.scan(Buckets::USERS)?;
        match rows.last() {
            Some((_, value)) => Ok(decode_user(value).map_err(KvError::from)?.name),
            None => Ok(String::new()),
        }
    }
}
