//! Message codecs
//!
//! The store persists whatever bytes a codec produces for a message and
//! hands the same bytes back to the codec on read.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Codec failure
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Converts a protocol message to and from its serialized form
pub trait MessageCodec: Send + Sync {
    /// The message type handled by this codec
    type Message;

    /// Serialize a message
    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>, CodecError>;

    /// Rebuild a message from bytes previously produced by `encode`
    fn decode(&self, bytes: &[u8]) -> Result<Self::Message, CodecError>;
}

// =============================================================================
// RawCodec
// =============================================================================

/// Identity codec: the message already is its serialized packet
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl MessageCodec for RawCodec {
    type Message = Bytes;

    fn encode(&self, message: &Bytes) -> Result<Vec<u8>, CodecError> {
        Ok(message.to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Bytes, CodecError> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

// =============================================================================
// BincodeCodec
// =============================================================================

/// Codec for any serde message type, using bincode's compact binary format
pub struct BincodeCodec<T> {
    _message: PhantomData<fn() -> T>,
}

impl<T> BincodeCodec<T> {
    pub fn new() -> Self {
        Self {
            _message: PhantomData,
        }
    }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BincodeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BincodeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BincodeCodec")
            .field("message", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> MessageCodec for BincodeCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Message = T;

    fn encode(&self, message: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(message).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
