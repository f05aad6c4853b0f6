//! Error types for mqttstore
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::CodecError;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for mqttstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Timed out after {timeout:?} waiting for the lock on {path:?}")]
    OpenTimeout { path: PathBuf, timeout: Duration },

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Store used before it was opened")]
    NotOpen,

    #[error("Key must not be empty")]
    EmptyKey,

    // -------------------------------------------------------------------------
    // Message Errors
    // -------------------------------------------------------------------------
    #[error("Failed to encode message for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to decode message for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Corrupted record for key '{key}': {reason}")]
    Corrupted { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl StoreError {
    /// True for use-before-open errors
    pub fn is_not_open(&self) -> bool {
        matches!(self, StoreError::NotOpen)
    }
}
