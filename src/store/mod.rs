//! Store Module
//!
//! Persistence for inflight messages.
//!
//! ## Responsibilities
//! - Lifecycle: open / close / reset
//! - CRUD over a single bucket of serialized messages
//! - Thread-safe access from every part of the client
//!
//! ## Lifecycle
//! ```text
//!               open()
//!   ┌──────────┐ ──────▶ ┌──────────┐ ──┐
//!   │ Unopened │         │  Opened  │   │ reset()
//!   └──────────┘ ◀────── └──────────┘ ◀─┘
//!               close()
//! ```
//!
//! put/get/del/all/reset on an unopened store touch nothing and return
//! `StoreError::NotOpen`.

mod memory;
mod persistent;
mod record;

pub use memory::MemoryStore;
pub use persistent::{PersistentStore, DB_EXTENSION};
pub use record::{decode_record, encode_record, RecordError, CHECKSUM_SIZE};

use crate::error::Result;

/// Storage seam used by an MQTT client for its inflight messages
pub trait MessageStore: Send + Sync {
    /// The message type persisted by this store
    type Message;

    /// Make the store usable
    fn open(&self) -> Result<()>;

    /// Release resources; the store can be opened again afterwards
    fn close(&self) -> Result<()>;

    /// Drop every stored message
    fn reset(&self) -> Result<()>;

    /// Store a message under `key`, replacing any previous one
    fn put(&self, key: &str, message: &Self::Message) -> Result<()>;

    /// Look up a message; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<Self::Message>>;

    /// Remove a message; absent keys are not an error
    fn del(&self, key: &str) -> Result<()>;

    /// Every key currently stored
    fn all(&self) -> Result<Vec<String>>;
}
