//! Addressable handles to actors.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use strand_core::{ActorId, MessageId, Result};

use super::envelope::{Envelope, Priority};
use crate::mailbox::Inbox;

/// A cloneable, thread-safe address of an actor.
///
/// Handles only ever touch the producer side of a mailbox, so any number
/// of threads may send through them concurrently.
#[derive(Clone)]
pub struct ActorRef {
    id: ActorId,
    inbox: Arc<Inbox>,
}

impl ActorRef {
    pub(crate) fn new(inbox: Arc<Inbox>) -> Self {
        Self {
            id: inbox.owner(),
            inbox,
        }
    }

    /// Identity of the addressed actor.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Send an anonymous one-way message.
    pub fn tell<T: Any + Send>(&self, payload: T) -> Result<()> {
        self.tell_with_priority(Priority::Normal, payload)
    }

    /// Send an anonymous one-way message with an explicit priority tag.
    pub fn tell_with_priority<T: Any + Send>(&self, priority: Priority, payload: T) -> Result<()> {
        self.enqueue(Envelope::new(
            None,
            self.id,
            MessageId::NONE,
            priority,
            payload,
        ))
    }

    /// Push a prepared envelope into the actor's mailbox.
    pub fn enqueue(&self, envelope: Envelope) -> Result<()> {
        self.inbox.push(envelope)
    }

    /// Whether the actor still accepts messages.
    pub fn is_alive(&self) -> bool {
        !self.inbox.is_closed()
    }

    /// Number of envelopes waiting in the actor's inbox.
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
