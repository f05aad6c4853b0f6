//! Protocol Module
//!
//! The boundary between the store and the MQTT client that owns it.
//!
//! ## Responsibilities
//! - `MessageCodec`: injected capability turning a protocol message into
//!   bytes and back. The store never looks inside a message.
//! - Key convention shared by inbound and outbound flows:
//!
//! ```text
//! ┌────────┬──────────────┐
//! │ "i."   │ message id   │   inbound  (received, awaiting our ack)
//! ├────────┼──────────────┤
//! │ "o."   │ message id   │   outbound (sent, awaiting broker ack)
//! └────────┴──────────────┘
//! ```

mod codec;
mod key;

pub use codec::{BincodeCodec, CodecError, MessageCodec, RawCodec};
pub use key::{inbound_key, outbound_key, parse_key, Direction, INBOUND_PREFIX, OUTBOUND_PREFIX};
