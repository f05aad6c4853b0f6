//! Persistent store
//!
//! redb-backed inflight message store. One database file, one table
//! ("bucket") per store, every operation in its own transaction.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use redb::{Database, DatabaseError, ReadableTable, TableDefinition, TableError};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::protocol::MessageCodec;

use super::record::{decode_record, encode_record};
use super::MessageStore;

/// Extension of generated database file names
pub const DB_EXTENSION: &str = "db";

/// Pause between attempts to take the database file lock
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Durable store for inflight messages
///
/// ## Concurrency Model
///
/// - **Writes** (open/close/reset/put/del): hold `inner` exclusively for the
///   whole operation, engine transaction included
/// - **Reads** (get/all): hold `inner` shared, so reads overlap each other
///   but never a store-level write
///
/// redb adds its own single-writer / multi-reader isolation underneath; the
/// store lock is what makes open/close safe against in-flight operations.
///
/// ## On-disk Format
///
/// Values are stored as `crc32 (4 bytes, big-endian) || codec bytes`, not as
/// the bare codec bytes. A bucket filled by another producer with unframed
/// values reads back as `StoreError::Corrupted`; only share a bucket with
/// writers that go through this store.
pub struct PersistentStore<C: MessageCodec> {
    /// Bucket name, open timeout, logging settings
    config: Config,

    /// Serializes/deserializes messages
    codec: C,

    /// Path and engine handle
    inner: RwLock<Inner>,
}

struct Inner {
    /// Database file; generated by open() when empty
    path: PathBuf,

    /// Some while opened
    db: Option<Database>,
}

impl<C: MessageCodec> PersistentStore<C> {
    /// Create an unopened store with the default config
    ///
    /// An empty `path` makes open() generate `<cwd>/<unix nanos>.db`.
    pub fn new(path: impl Into<PathBuf>, codec: C) -> Self {
        Self::with_config(path, codec, Config::default())
    }

    /// Create an unopened store with an explicit config
    pub fn with_config(path: impl Into<PathBuf>, codec: C, config: Config) -> Self {
        Self {
            config,
            codec,
            inner: RwLock::new(Inner {
                path: path.into(),
                db: None,
            }),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the database file, creating it if needed
    ///
    /// Waits up to the configured open timeout for another holder of the
    /// file to release it.
    pub fn open(&self) -> Result<()> {
        tracing::debug!("enter open");
        self.config.validate()?;

        let mut inner = self.inner.write();
        if inner.db.is_some() {
            tracing::warn!("Store at {} is already open", inner.path.display());
            return Ok(());
        }

        if inner.path.as_os_str().is_empty() {
            inner.path = generate_path()?;
        }

        let db = open_database(&inner.path, self.config.open_timeout())?;
        inner.db = Some(db);

        tracing::info!("Store opened at {}", inner.path.display());
        Ok(())
    }

    /// Close the database file
    ///
    /// Closing an unopened store is a no-op. Path and bucket are kept, so the
    /// store can be opened again.
    pub fn close(&self) -> Result<()> {
        tracing::debug!("enter close");
        let mut inner = self.inner.write();

        match inner.db.take() {
            Some(db) => {
                drop(db);
                tracing::info!("Store at {} closed", inner.path.display());
            }
            None => tracing::warn!("Close called on a store that is not open"),
        }
        Ok(())
    }

    /// Delete the whole bucket
    ///
    /// The store stays open; the next put recreates the bucket.
    pub fn reset(&self) -> Result<()> {
        tracing::debug!("enter reset");
        let inner = self.inner.write();
        let db = require_open(&inner)?;

        let txn = db.begin_write()?;
        let existed = txn.delete_table(self.bucket())?;
        txn.commit()?;

        if existed {
            tracing::info!("Store at {} wiped", inner.path.display());
        } else {
            tracing::warn!("Reset: bucket '{}' does not exist", self.config.bucket_name);
        }
        Ok(())
    }

    // =========================================================================
    // Data operations
    // =========================================================================

    /// Store a message under `key`, overwriting any previous value
    pub fn put(&self, key: &str, message: &C::Message) -> Result<()> {
        tracing::debug!(key, "enter put");
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let inner = self.inner.write();
        let db = require_open(&inner)?;

        let payload = self.codec.encode(message).map_err(|source| {
            tracing::error!(key, error = %source, "Failed to encode message");
            StoreError::Encode {
                key: key.to_string(),
                source,
            }
        })?;
        let record = encode_record(&payload);

        let txn = db.begin_write()?;
        {
            // Creates the bucket on first use
            let mut table = txn.open_table(self.bucket())?;
            table.insert(key, record.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    /// Fetch the message stored under `key`
    ///
    /// A missing bucket or key is `Ok(None)`. A damaged record or one the
    /// codec rejects is an error.
    pub fn get(&self, key: &str) -> Result<Option<C::Message>> {
        tracing::debug!(key, "enter get");
        let inner = self.inner.read();
        let db = require_open(&inner)?;

        let txn = db.begin_read()?;
        let table = match txn.open_table(self.bucket()) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => {
                tracing::warn!("Get: bucket '{}' does not exist", self.config.bucket_name);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(guard) = table.get(key)? else {
            tracing::debug!(key, "No value for key");
            return Ok(None);
        };

        let payload = decode_record(guard.value()).map_err(|e| {
            tracing::error!(key, error = %e, "Stored record is corrupted");
            StoreError::Corrupted {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;

        let message = self.codec.decode(payload).map_err(|source| {
            tracing::error!(key, error = %source, "Failed to decode message");
            StoreError::Decode {
                key: key.to_string(),
                source,
            }
        })?;

        Ok(Some(message))
    }

    /// Remove `key`; missing bucket or key is a no-op
    pub fn del(&self, key: &str) -> Result<()> {
        tracing::debug!(key, "enter del");
        let inner = self.inner.write();
        let db = require_open(&inner)?;

        // A write transaction would create the bucket, so look first.
        // Safe without a race: we hold the store's exclusive lock.
        if !self.bucket_exists(db)? {
            tracing::warn!("Del: bucket '{}' does not exist", self.config.bucket_name);
            return Ok(());
        }

        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(self.bucket())?;
            table.remove(key)?;
        }
        txn.commit()?;

        Ok(())
    }

    /// List every key in the bucket, in the engine's key order
    pub fn all(&self) -> Result<Vec<String>> {
        tracing::debug!("enter all");
        let inner = self.inner.read();
        let db = require_open(&inner)?;

        let txn = db.begin_read()?;
        let table = match txn.open_table(self.bucket()) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => {
                tracing::warn!("All: bucket '{}' does not exist", self.config.bucket_name);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Database file path (empty until the first open if none was given)
    pub fn path(&self) -> PathBuf {
        self.inner.read().path.clone()
    }

    /// Whether the store is currently open
    pub fn is_open(&self) -> bool {
        self.inner.read().db.is_some()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn bucket(&self) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(&self.config.bucket_name)
    }

    fn bucket_exists(&self, db: &Database) -> Result<bool> {
        let txn = db.begin_read()?;
        match txn.open_table(self.bucket()) {
            Ok(_) => Ok(true),
            Err(TableError::TableDoesNotExist(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl<C: MessageCodec> MessageStore for PersistentStore<C> {
    type Message = C::Message;

    fn open(&self) -> Result<()> {
        PersistentStore::open(self)
    }

    fn close(&self) -> Result<()> {
        PersistentStore::close(self)
    }

    fn reset(&self) -> Result<()> {
        PersistentStore::reset(self)
    }

    fn put(&self, key: &str, message: &C::Message) -> Result<()> {
        PersistentStore::put(self, key, message)
    }

    fn get(&self, key: &str) -> Result<Option<C::Message>> {
        PersistentStore::get(self, key)
    }

    fn del(&self, key: &str) -> Result<()> {
        PersistentStore::del(self, key)
    }

    fn all(&self) -> Result<Vec<String>> {
        PersistentStore::all(self)
    }
}

fn require_open(inner: &Inner) -> Result<&Database> {
    inner.db.as_ref().ok_or_else(|| {
        tracing::warn!("Store used before it was opened");
        StoreError::NotOpen
    })
}

/// `<cwd>/<unix nanos>.db`
fn generate_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    Ok(cwd.join(format!("{}.{}", nanos, DB_EXTENSION)))
}

/// Open or create the database, retrying while another handle holds the lock
///
/// A timeout too large to represent as an Instant waits without a deadline.
fn open_database(path: &Path, timeout: Duration) -> Result<Database> {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        match Database::create(path) {
            Ok(db) => return Ok(db),
            Err(DatabaseError::DatabaseAlreadyOpen) => {
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    tracing::error!("Timed out opening {}", path.display());
                    return Err(StoreError::OpenTimeout {
                        path: path.to_path_buf(),
                        timeout,
                    });
                }
                thread::sleep(OPEN_RETRY_INTERVAL);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to open {}", path.display());
                return Err(e.into());
            }
        }
    }
}
