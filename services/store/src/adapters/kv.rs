//! services/store/src/adapters/kv.rs
//!
//! Thin wrapper around the embedded redb database.
//!
//! Each entity lives in its own bucket (a redb table keyed by string). A
//! separate `sequences` table holds one counter per bucket. Reads run in
//! snapshot transactions and writes in serializable write transactions; a
//! write closure that returns `Err` aborts its transaction.

use std::path::Path;
use std::sync::Arc;

use grepbook_core::ports::PortError;
use redb::backends::InMemoryBackend;
use redb::{
    Database, ReadTransaction, ReadableTable, ReadableTableMetadata, TableDefinition, TableError,
    TableHandle, WriteTransaction,
};
use tracing::{info, warn};

/// A bucket: string key to serialized document.
pub type Bucket = TableDefinition<'static, &'static str, &'static [u8]>;

/// Bucket definitions for grepbook storage.
pub struct Buckets;

impl Buckets {
    /// email → serialized user (including the password hash)
    pub const USERS: Bucket = TableDefinition::new("users");

    /// uid → serialized book review with its embedded chapters
    pub const BOOK_REVIEWS: Bucket = TableDefinition::new("book_reviews");

    /// session key → serialized session
    pub const SESSIONS: Bucket = TableDefinition::new("sessions");

    /// Sequence counters: bucket name → last issued value
    pub const SEQUENCES: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("sequences");

    pub const ALL: [Bucket; 3] = [Self::USERS, Self::BOOK_REVIEWS, Self::SESSIONS];
}

//=========================================================================================
// Errors
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("storage engine error: {0}")]
    Redb(#[from] redb::Error),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The store was not initialised with this bucket. A deployment error.
    #[error("no {0} bucket exists")]
    MissingBucket(String),

    /// A domain error raised inside a transaction body.
    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<redb::DatabaseError> for KvError {
    fn from(e: redb::DatabaseError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::StorageError> for KvError {
    fn from(e: redb::StorageError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<redb::CommitError> for KvError {
    fn from(e: redb::CommitError) -> Self {
        Self::Redb(e.into())
    }
}

impl From<TableError> for KvError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::TableDoesNotExist(name) => Self::MissingBucket(name),
            other => Self::Redb(other.into()),
        }
    }
}

impl From<KvError> for PortError {
    fn from(e: KvError) -> Self {
        match e {
            KvError::Port(inner) => inner,
            other => PortError::Storage(other.to_string()),
        }
    }
}

//=========================================================================================
// Store Handle
//=========================================================================================

/// Process-wide handle to the embedded database. Clones share one database;
/// the file is released when the last clone is dropped.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Database>,
}

impl KvStore {
    /// Opens (or creates) the database file and makes sure every bucket exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        let path = path.as_ref();
        let db = Database::create(path)?;
        info!("Opened store at {}", path.display());

        let store = Self { db: Arc::new(db) };
        store.create_all_buckets()?;
        Ok(store)
    }

    /// Opens a fresh database held entirely in memory.
    pub fn open_in_memory() -> Result<Self, KvError> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.create_all_buckets()?;
        Ok(store)
    }

    /// Creates any bucket that does not exist yet.
    pub fn create_all_buckets(&self) -> Result<(), KvError> {
        self.update(|txn| {
            for bucket in Buckets::ALL {
                txn.open_table(bucket)?;
            }
            txn.open_table(Buckets::SEQUENCES)?;
            Ok(())
        })
    }

    /// Runs `f` against a consistent snapshot.
    pub fn view<T>(
        &self,
        f: impl FnOnce(&ReadTransaction) -> Result<T, KvError>,
    ) -> Result<T, KvError> {
        let txn = self.db.begin_read()?;
        f(&txn)
    }

    /// Runs `f` in a write transaction, committing on `Ok` and aborting on `Err`.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&WriteTransaction) -> Result<T, KvError>,
    ) -> Result<T, KvError> {
        let txn = self.db.begin_write()?;
        match f(&txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!("Failed to abort transaction: {}", abort_err);
                }
                Err(e)
            }
        }
    }

    pub fn get(&self, bucket: Bucket, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        self.view(|txn| {
            let table = txn.open_table(bucket)?;
            let value = table.get(key)?.map(|v| v.value().to_vec());
            Ok(value)
        })
    }

    pub fn put(&self, bucket: Bucket, key: &str, value: &[u8]) -> Result<(), KvError> {
        self.update(|txn| {
            let mut table = txn.open_table(bucket)?;
            table.insert(key, value)?;
            Ok(())
        })
    }

    /// Removes `key`. Removing an absent key succeeds.
    pub fn delete(&self, bucket: Bucket, key: &str) -> Result<(), KvError> {
        self.update(|txn| {
            let mut table = txn.open_table(bucket)?;
            table.remove(key)?;
            Ok(())
        })
    }

    /// Every entry of `bucket`, in key order.
    pub fn scan(&self, bucket: Bucket) -> Result<Vec<(String, Vec<u8>)>, KvError> {
        self.view(|txn| {
            let table = txn.open_table(bucket)?;
            let mut rows = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                rows.push((key.value().to_string(), value.value().to_vec()));
            }
            Ok(rows)
        })
    }

    pub fn key_count(&self, bucket: Bucket) -> Result<u64, KvError> {
        self.view(|txn| {
            let table = txn.open_table(bucket)?;
            let count = table.len()?;
            Ok(count)
        })
    }

    /// Issues the next value of `bucket`'s counter inside `txn`. Values start
    /// at 1 and are never handed out twice.
    pub fn next_sequence(txn: &WriteTransaction, bucket: Bucket) -> Result<u64, KvError> {
        let mut sequences = txn.open_table(Buckets::SEQUENCES)?;
        let name = bucket.name();
        let current = sequences.get(name)?.map(|v| v.value()).unwrap_or(0);
        let next = current + 1;
        sequences.insert(name, next)?;
        Ok(next)
    }

    /// Releases this handle.
    pub fn close(self) {
        let others = Arc::strong_count(&self.db) - 1;
        drop(self.db);
        if others == 0 {
            info!("Store closed");
        } else {
            info!("Store handle released; {} other handle(s) still open", others);
        }
    }
}
