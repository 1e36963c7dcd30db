//! Handles for outstanding synchronous requests.

use log::trace;

use strand_core::MessageId;

use super::behavior::{Behavior, ReceiveResult};
use super::blocking::BlockingActor;
use crate::policy::ActorPolicies;

/// The pending reply to a [`BlockingActor::request`].
///
/// Either block for the reply right away with
/// [`await_response`](Self::await_response), or register a continuation
/// with [`then`](Self::then) that a later `receive` runs when the reply
/// shows up.
#[must_use = "a request's reply is only handled through its response handle"]
pub struct ResponseHandle<'s, P: ActorPolicies> {
    actor: &'s BlockingActor<P>,
    request_id: MessageId,
}

impl<'s, P: ActorPolicies> ResponseHandle<'s, P> {
    pub(crate) fn new(actor: &'s BlockingActor<P>, request_id: MessageId) -> Self {
        Self { actor, request_id }
    }

    /// Id of the request that was sent.
    pub fn request_id(&self) -> MessageId {
        self.request_id
    }

    /// Id the reply will carry.
    pub fn response_id(&self) -> MessageId {
        self.request_id.response_id()
    }

    /// Block until the reply arrives and handle it with `behavior`.
    ///
    /// Envelopes arriving in the meantime are cached for later receives. A
    /// reply that `behavior` does not match stays in the cache and the
    /// actor quits with `UnhandledSyncFailure`. A timeout on `behavior`
    /// fires as usual.
    pub fn await_response(self, behavior: &mut Behavior<'_>) -> ReceiveResult {
        trace!("Actor {} awaits {}", self.actor.id(), self.response_id());
        self.actor.dequeue_response(behavior, self.response_id())
    }

    /// Handle the reply with `behavior` whenever it arrives, overriding
    /// whatever behavior the receiving `receive` call was given.
    pub fn then(self, behavior: Behavior<'static>) {
        self.actor
            .register_sync_handler(self.response_id(), behavior);
    }
}
