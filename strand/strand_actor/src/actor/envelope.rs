//! The unit of message transfer between actors.

use std::any::{type_name, Any};
use std::fmt;

use strand_core::{ActorId, MessageId};

use super::handle::ActorRef;

/// Type-erased message content.
pub type Payload = Box<dyn Any + Send>;

/// Priority tag carried by every envelope.
///
/// Only prioritizing mailbox policies look at it; FIFO policies ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    /// Ordinary traffic
    #[default]
    Normal,
    /// Served ahead of `Normal` by prioritizing policies
    High,
}

/// One message in transit.
///
/// An envelope is immutable once enqueued. The mailbox owns it until a
/// behavior matches it, at which point its payload moves into the handler.
pub struct Envelope {
    sender: Option<ActorRef>,
    recipient: ActorId,
    id: MessageId,
    priority: Priority,
    payload: Payload,
    type_name: &'static str,
}

impl Envelope {
    /// Create an envelope around a typed payload.
    pub fn new<T: Any + Send>(
        sender: Option<ActorRef>,
        recipient: ActorId,
        id: MessageId,
        priority: Priority,
        payload: T,
    ) -> Self {
        Self {
            sender,
            recipient,
            id,
            priority,
            payload: Box::new(payload),
            type_name: type_name::<T>(),
        }
    }

    /// Create an envelope around an already type-erased payload.
    pub fn from_payload(
        sender: Option<ActorRef>,
        recipient: ActorId,
        id: MessageId,
        priority: Priority,
        payload: Payload,
    ) -> Self {
        Self {
            sender,
            recipient,
            id,
            priority,
            payload,
            type_name: "<erased>",
        }
    }

    /// The actor that sent this envelope, if any.
    pub fn sender(&self) -> Option<&ActorRef> {
        self.sender.as_ref()
    }

    /// Identity of the sender, if any.
    pub fn sender_id(&self) -> Option<ActorId> {
        self.sender.as_ref().map(ActorRef::id)
    }

    /// Identity of the receiving actor.
    pub fn recipient(&self) -> ActorId {
        self.recipient
    }

    /// Correlation id, `MessageId::NONE` for one-way messages.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Priority tag.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Borrow the payload.
    pub fn payload(&self) -> &(dyn Any + Send) {
        self.payload.as_ref()
    }

    /// Name of the payload type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Borrow the payload as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub(crate) fn into_parts(self) -> (MessageContext, Payload) {
        (
            MessageContext {
                sender: self.sender,
                id: self.id,
            },
            self.payload,
        )
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("sender", &self.sender_id())
            .field("recipient", &self.recipient)
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("type", &self.type_name)
            .finish()
    }
}

/// Routing information of the envelope a handler is currently processing.
#[derive(Debug, Clone)]
pub(crate) struct MessageContext {
    pub(crate) sender: Option<ActorRef>,
    pub(crate) id: MessageId,
}
