//! Record framing
//!
//! Every value written to the bucket carries a checksum of the codec's bytes
//! so a damaged value is reported as corrupt instead of decoded.
//!
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ CRC (4)  │   Payload (codec bytes)     │
//! └──────────┴─────────────────────────────┘
//! ```

use thiserror::Error;

/// Size of the checksum prefix
pub const CHECKSUM_SIZE: usize = 4;

/// Why a stored record could not be unframed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record too short: {0} bytes")]
    Truncated(usize),

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

/// Frame a payload for storage
pub fn encode_record(payload: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(CHECKSUM_SIZE + payload.len());
    record.extend_from_slice(&crc32fast::hash(payload).to_be_bytes());
    record.extend_from_slice(payload);
    record
}

/// Verify a stored record and return its payload
pub fn decode_record(record: &[u8]) -> Result<&[u8], RecordError> {
    if record.len() < CHECKSUM_SIZE {
        return Err(RecordError::Truncated(record.len()));
    }

    let stored = u32::from_be_bytes([record[0], record[1], record[2], record[3]]);
    let payload = &record[CHECKSUM_SIZE..];
    let computed = crc32fast::hash(payload);

    if stored != computed {
        return Err(RecordError::ChecksumMismatch { stored, computed });
    }
    Ok(payload)
}
