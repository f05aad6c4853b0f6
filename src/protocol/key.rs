//! Inflight key convention
//!
//! Inbound and outbound flows share one bucket; the prefix keeps their
//! message ids from colliding. The store itself never validates keys.

/// Prefix for messages received from the broker
pub const INBOUND_PREFIX: &str = "i.";

/// Prefix for messages sent to the broker
pub const OUTBOUND_PREFIX: &str = "o.";

/// Flow a stored message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::Inbound => INBOUND_PREFIX,
            Direction::Outbound => OUTBOUND_PREFIX,
        }
    }
}

/// Key of the form `"i.<id>"`
pub fn inbound_key(message_id: u16) -> String {
    format!("{}{}", INBOUND_PREFIX, message_id)
}

/// Key of the form `"o.<id>"`
pub fn outbound_key(message_id: u16) -> String {
    format!("{}{}", OUTBOUND_PREFIX, message_id)
}

/// Split a key into its flow and message id
///
/// Returns None for keys that do not follow the convention.
pub fn parse_key(key: &str) -> Option<(Direction, u16)> {
    let (direction, id) = if let Some(id) = key.strip_prefix(INBOUND_PREFIX) {
        (Direction::Inbound, id)
    } else if let Some(id) = key.strip_prefix(OUTBOUND_PREFIX) {
        (Direction::Outbound, id)
    } else {
        return None;
    };

    // u16::from_str accepts a leading '+', which never appears in a generated key
    if id.starts_with('+') {
        return None;
    }
    id.parse::<u16>().ok().map(|id| (direction, id))
}
