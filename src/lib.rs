//! # mqttstore
//!
//! Durable storage for MQTT inflight messages:
//! - Messages sent or received but not yet acknowledged survive restarts
//! - ACID transactions on a single embedded database file (redb)
//! - Single-writer/multi-reader concurrency model
//! - Injected codec, so the store never parses protocol packets
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     MQTT Client                              │
//! │          (inbound "i.<id>" / outbound "o.<id>")              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  MessageStore
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  PersistentStore                             │
//! │       open / close / reset / put / get / del / all           │
//! │                (RwLock: shared reads)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │    redb     │
//!   │ (injected)  │          │  (bucket)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, LoggerConfig};
pub use protocol::{BincodeCodec, MessageCodec, RawCodec};
pub use store::{MemoryStore, MessageStore, PersistentStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mqttstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
