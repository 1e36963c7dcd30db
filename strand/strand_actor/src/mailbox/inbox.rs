//! Producer side of an actor mailbox.
//!
//! Any number of threads push into an inbox; exactly one consumer (the
//! owning actor) pops from it. A push wakes a consumer blocked in
//! [`Inbox::wait_nonempty`] through a condition variable, so waiting never
//! degrades into polling.

use log::trace;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Instant;

use strand_core::{ActorId, Error, Result};

use crate::actor::Envelope;

#[derive(Default)]
struct InboxState {
    queue: VecDeque<Envelope>,
    closed: bool,
}

/// Arrival-ordered queue of pending envelopes.
pub struct Inbox {
    owner: ActorId,
    state: Mutex<InboxState>,
    available: Condvar,
}

impl Inbox {
    /// Create an empty inbox owned by `owner`.
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            state: Mutex::new(InboxState::default()),
            available: Condvar::new(),
        }
    }

    /// The actor this inbox belongs to.
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Append an envelope and wake the consumer.
    ///
    /// Fails once the inbox has been closed by cleanup.
    pub fn push(&self, envelope: Envelope) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::MailboxClosed(self.owner));
        }
        trace!(
            "Inbox {}: enqueue {} (id: {})",
            self.owner,
            envelope.type_name(),
            envelope.id()
        );
        state.queue.push_back(envelope);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Pop the oldest envelope without blocking.
    pub fn try_pop(&self) -> Option<Envelope> {
        self.state.lock().queue.pop_front()
    }

    /// Take every pending envelope at once, in arrival order.
    pub fn drain(&self) -> VecDeque<Envelope> {
        std::mem::take(&mut self.state.lock().queue)
    }

    /// Whether no envelope is pending.
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Number of pending envelopes.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Whether cleanup has closed this inbox.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Block until an envelope is pending or `deadline` passes.
    ///
    /// Returns `true` if an envelope is available. A closed inbox never
    /// blocks.
    pub fn wait_nonempty(&self, deadline: Option<Instant>) -> bool {
        let mut state = self.state.lock();
        loop {
            if !state.queue.is_empty() {
                return true;
            }
            if state.closed {
                return false;
            }
            match deadline {
                Some(deadline) => {
                    if self
                        .available
                        .wait_until(&mut state, deadline)
                        .timed_out()
                    {
                        return !state.queue.is_empty();
                    }
                }
                None => self.available.wait(&mut state),
            }
        }
    }

    /// Refuse further pushes and hand back whatever was still pending.
    pub(crate) fn close(&self) -> VecDeque<Envelope> {
        let mut state = self.state.lock();
        state.closed = true;
        let pending = std::mem::take(&mut state.queue);
        drop(state);
        self.available.notify_all();
        pending
    }
}
