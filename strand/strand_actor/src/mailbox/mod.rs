//! Per-actor message storage.
//!
//! A mailbox is split in two halves:
//!
//! - the [`Inbox`], shared behind an `Arc` with every [`ActorRef`](crate::ActorRef),
//!   which producers push into from any thread
//! - the [`Mailbox`] itself, owned by the actor, which combines the inbox
//!   with a [`PriorityPolicy`] and the retry cache the policy manages
//!
//! Only the owning actor holds a `Mailbox`, and it needs `&mut` access to
//! pop or touch the cache, so the single-consumer rule is enforced by
//! ownership rather than by convention.

pub mod inbox;
pub mod priority;

pub use inbox::Inbox;
pub use priority::{NotPrioritizing, Prioritizing, PriorityPolicy};

use std::sync::Arc;

use strand_core::ActorId;

use crate::actor::Envelope;

/// Consumer half of an actor's mailbox.
pub struct Mailbox<P: PriorityPolicy> {
    inbox: Arc<Inbox>,
    policy: P,
}

impl<P: PriorityPolicy> Mailbox<P> {
    /// Create an empty mailbox for `owner`.
    pub fn new(owner: ActorId) -> Self {
        Self {
            inbox: Arc::new(Inbox::new(owner)),
            policy: P::default(),
        }
    }

    /// The shared producer side.
    pub fn inbox(&self) -> &Arc<Inbox> {
        &self.inbox
    }

    /// Next envelope in policy order, without blocking.
    pub fn next_message(&mut self) -> Option<Envelope> {
        self.policy.next_message(&self.inbox)
    }

    /// Whether an envelope is ready to be pulled.
    pub fn has_next_message(&self) -> bool {
        self.policy.has_next_message(&self.inbox)
    }

    /// Park an unmatched envelope in the retry cache.
    pub fn push_to_cache(&mut self, envelope: Envelope) {
        self.policy.push_to_cache(envelope);
    }

    /// Cached envelopes, oldest first.
    pub fn cache(&self) -> &[Envelope] {
        self.policy.cache()
    }

    /// Remove the cached envelope at `index`.
    pub fn cache_erase(&mut self, index: usize) -> Option<Envelope> {
        self.policy.cache_erase(index)
    }

    /// Number of cached envelopes.
    pub fn cache_len(&self) -> usize {
        self.policy.cache().len()
    }

    /// Close the inbox and drop everything still held. Returns the number
    /// of envelopes discarded.
    pub(crate) fn close(&mut self) -> usize {
        self.inbox.close().len() + self.policy.discard_all()
    }
}
