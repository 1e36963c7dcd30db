//! Message selection strategies.
//!
//! A priority policy decides which pending envelope the dequeue engine sees
//! next and owns the retry cache of envelopes that an earlier behavior did
//! not match. All methods are consumer-only: they are called from the
//! owning actor's thread and never block.

use std::collections::VecDeque;

use crate::actor::{Envelope, Priority};

use super::inbox::Inbox;

/// Contract every mailbox ordering strategy satisfies.
///
/// The retry cache is exposed as a slice: iterating `cache()` from start to
/// end visits cached envelopes in the order they were cached, and
/// `cache_erase` removes one of them while keeping that order intact.
pub trait PriorityPolicy: Default + 'static {
    /// Pop the next envelope in policy order, or `None` if nothing is pending.
    fn next_message(&mut self, inbox: &Inbox) -> Option<Envelope>;

    /// Whether `next_message` would currently return an envelope.
    fn has_next_message(&self, inbox: &Inbox) -> bool;

    /// Park an envelope that the current behavior did not match.
    fn push_to_cache(&mut self, envelope: Envelope);

    /// Cached envelopes, oldest first.
    fn cache(&self) -> &[Envelope];

    /// Remove and return the cached envelope at `index`.
    fn cache_erase(&mut self, index: usize) -> Option<Envelope>;

    /// Drop the cache and any envelopes buffered by the policy itself.
    ///
    /// Returns how many envelopes were discarded.
    fn discard_all(&mut self) -> usize;
}

/// FIFO-by-arrival selection.
#[derive(Default)]
pub struct NotPrioritizing {
    cache: Vec<Envelope>,
}

impl PriorityPolicy for NotPrioritizing {
    fn next_message(&mut self, inbox: &Inbox) -> Option<Envelope> {
        inbox.try_pop()
    }

    fn has_next_message(&self, inbox: &Inbox) -> bool {
        !inbox.is_empty()
    }

    fn push_to_cache(&mut self, envelope: Envelope) {
        self.cache.push(envelope);
    }

    fn cache(&self) -> &[Envelope] {
        &self.cache
    }

    fn cache_erase(&mut self, index: usize) -> Option<Envelope> {
        (index < self.cache.len()).then(|| self.cache.remove(index))
    }

    fn discard_all(&mut self) -> usize {
        let discarded = self.cache.len();
        self.cache.clear();
        discarded
    }
}

/// Two-lane selection: `High` envelopes are always served before `Normal`
/// ones, FIFO within each lane.
///
/// Every call to `next_message` moves the whole inbox into the local lanes
/// first, so a high-priority envelope overtakes normal ones that arrived
/// before it but have not been handed out yet.
#[derive(Default)]
pub struct Prioritizing {
    high: VecDeque<Envelope>,
    normal: VecDeque<Envelope>,
    cache: Vec<Envelope>,
}

impl Prioritizing {
    fn fetch(&mut self, inbox: &Inbox) {
        for envelope in inbox.drain() {
            match envelope.priority() {
                Priority::High => self.high.push_back(envelope),
                Priority::Normal => self.normal.push_back(envelope),
            }
        }
    }
}

impl PriorityPolicy for Prioritizing {
    fn next_message(&mut self, inbox: &Inbox) -> Option<Envelope> {
        self.fetch(inbox);
        self.high.pop_front().or_else(|| self.normal.pop_front())
    }

    fn has_next_message(&self, inbox: &Inbox) -> bool {
        !self.high.is_empty() || !self.normal.is_empty() || !inbox.is_empty()
    }

    fn push_to_cache(&mut self, envelope: Envelope) {
        self.cache.push(envelope);
    }

    fn cache(&self) -> &[Envelope] {
        &self.cache
    }

    fn cache_erase(&mut self, index: usize) -> Option<Envelope> {
        (index < self.cache.len()).then(|| self.cache.remove(index))
    }

    fn discard_all(&mut self) -> usize {
        let discarded = self.cache.len() + self.high.len() + self.normal.len();
        self.cache.clear();
        self.high.clear();
        self.normal.clear();
        discarded
    }
}
