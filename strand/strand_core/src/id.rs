//! Strongly-typed identifiers for the Strand runtime.
//!
//! Actor identities are thin wrappers around a UUID with a phantom type
//! parameter, so an actor id cannot be confused with any other UUID-based
//! identifier. Correlation ids (`MessageId`) are plain integers drawn from a
//! monotonically increasing sequence, with `0` reserved as the
//! "no correlation" sentinel.
//!
//! # Examples
//!
//! ```
//! use strand_core::id::{ActorId, MessageId};
//! use std::str::FromStr;
//!
//! let actor = ActorId::new();
//! assert!(!actor.is_nil());
//!
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let actor = ActorId::from_str(id_str).unwrap();
//! assert_eq!(actor.to_string(), id_str);
//!
//! let request = MessageId::request(1);
//! assert!(request.is_request());
//! assert!(request.response_id().is_response());
//! assert!(MessageId::NONE.is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: std::marker::PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier.
    pub fn nil() -> Self {
        Self {
            uuid: Uuid::nil(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Check if this is a nil identifier.
    pub fn is_nil(&self) -> bool {
        self.uuid.is_nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
            _marker: std::marker::PhantomData,
        })
    }
}

/// Marker type for actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActorMarker;
/// Identifier for an actor.
pub type ActorId = Id<ActorMarker>;

const RESPONSE_FLAG: u64 = 1 << 63;

/// Correlation id linking a response envelope to the request that caused it.
///
/// The high bit marks responses; the remaining bits carry the request
/// number. The value `0` is the sentinel for "no reply expected".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Sentinel for one-way messages.
    pub const NONE: MessageId = MessageId(0);

    /// Build a request id from a sequence number. `0` yields `NONE`.
    pub const fn request(sequence: u64) -> Self {
        Self(sequence & !RESPONSE_FLAG)
    }

    /// Whether this is the "no correlation" sentinel.
    pub const fn is_none(&self) -> bool {
        self.0 & !RESPONSE_FLAG == 0
    }

    /// Whether this id belongs to a request expecting a reply.
    pub const fn is_request(&self) -> bool {
        !self.is_none() && self.0 & RESPONSE_FLAG == 0
    }

    /// Whether this id belongs to a response.
    pub const fn is_response(&self) -> bool {
        !self.is_none() && self.0 & RESPONSE_FLAG != 0
    }

    /// The id a response to this request carries. `NONE` stays `NONE`.
    pub const fn response_id(&self) -> Self {
        if self.is_none() {
            Self::NONE
        } else {
            Self(self.0 | RESPONSE_FLAG)
        }
    }

    /// The id of the request this response answers.
    pub const fn request_id(&self) -> Self {
        Self(self.0 & !RESPONSE_FLAG)
    }

    /// The raw integer value.
    pub const fn integer_value(&self) -> u64 {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else if self.is_response() {
            write!(f, "response#{}", self.request_id().0)
        } else {
            write!(f, "request#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_new() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2, "Generated IDs should be unique");
    }

    #[test]
    fn test_id_nil() {
        let nil_id = ActorId::nil();
        assert_eq!(nil_id.to_string(), "00000000-0000-0000-0000-000000000000");
        assert!(nil_id.is_nil());
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ActorId::from_uuid(uuid);
        assert_eq!(id.uuid(), uuid);
    }

    #[test]
    fn test_message_id_sentinel() {
        assert!(MessageId::NONE.is_none());
        assert!(!MessageId::NONE.is_request());
        assert!(!MessageId::NONE.is_response());
        assert_eq!(MessageId::NONE.response_id(), MessageId::NONE);
        assert_eq!(MessageId::request(0), MessageId::NONE);
        assert_eq!(MessageId::default(), MessageId::NONE);
    }

    #[test]
    fn test_message_id_correlation() {
        let request = MessageId::request(17);
        let response = request.response_id();

        assert!(request.is_request());
        assert!(response.is_response());
        assert_ne!(request, response);
        assert_eq!(response.request_id(), request);
        assert_eq!(response.response_id(), response);
        assert_eq!(request.to_string(), "request#17");
        assert_eq!(response.to_string(), "response#17");
    }

    #[test]
    fn test_id_serde() {
        let id = ActorId::new();
        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: ActorId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
