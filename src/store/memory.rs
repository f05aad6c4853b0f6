//! In-memory store
//!
//! Same lifecycle contract as the persistent store, nothing survives the
//! process. Messages are kept in a BTreeMap so `all()` lists keys in the
//! same order the persistent store does.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::{Result, StoreError};

use super::MessageStore;

/// Non-durable message store
pub struct MemoryStore<M> {
    inner: RwLock<MemoryInner<M>>,
}

struct MemoryInner<M> {
    opened: bool,
    messages: BTreeMap<String, M>,
}

impl<M> MemoryStore<M> {
    /// Create an unopened, empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                opened: false,
                messages: BTreeMap::new(),
            }),
        }
    }

    /// Whether the store is currently open
    pub fn is_open(&self) -> bool {
        self.inner.read().opened
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.inner.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Default for MemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MemoryInner<M> {
    fn require_open(&self) -> Result<()> {
        if self.opened {
            Ok(())
        } else {
            tracing::warn!("Memory store used before it was opened");
            Err(StoreError::NotOpen)
        }
    }
}

impl<M> MessageStore for MemoryStore<M>
where
    M: Clone + Send + Sync,
{
    type Message = M;

    fn open(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.opened {
            tracing::warn!("Memory store is already open");
            return Ok(());
        }
        inner.opened = true;
        tracing::info!("Memory store opened");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.opened {
            tracing::warn!("Close called on a memory store that is not open");
            return Ok(());
        }
        inner.opened = false;
        tracing::info!("Memory store closed");
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_open()?;
        inner.messages.clear();
        tracing::info!("Memory store wiped");
        Ok(())
    }

    fn put(&self, key: &str, message: &M) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut inner = self.inner.write();
        inner.require_open()?;
        inner.messages.insert(key.to_string(), message.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<M>> {
        let inner = self.inner.read();
        inner.require_open()?;
        Ok(inner.messages.get(key).cloned())
    }

    fn del(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.require_open()?;
        inner.messages.remove(key);
        Ok(())
    }

    fn all(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        inner.require_open()?;
        Ok(inner.messages.keys().cloned().collect())
    }
}
