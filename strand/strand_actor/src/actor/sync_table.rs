//! Continuations for outstanding synchronous requests.

use log::{trace, warn};
use std::collections::HashMap;

use strand_core::MessageId;

use super::behavior::Behavior;

/// Maps the response id of an outstanding request to the behavior that
/// must handle its reply.
///
/// An entry is removed exactly once: when its response is matched, or when
/// the owning actor is cleaned up.
#[derive(Debug, Default)]
pub struct SyncRequestTable {
    handlers: HashMap<MessageId, Behavior<'static>>,
}

impl SyncRequestTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `behavior` for `response_id`, returning any handler it
    /// replaces.
    pub fn insert(
        &mut self,
        response_id: MessageId,
        behavior: Behavior<'static>,
    ) -> Option<Behavior<'static>> {
        trace!("Registering sync handler for {}", response_id);
        let replaced = self.handlers.insert(response_id, behavior);
        if replaced.is_some() {
            warn!("Sync handler for {} replaced before its reply arrived", response_id);
        }
        replaced
    }

    /// Handler registered for `response_id`. Always `None` for the invalid
    /// id.
    pub fn sync_handler(&mut self, response_id: MessageId) -> Option<&mut Behavior<'static>> {
        if response_id.is_none() {
            return None;
        }
        self.handlers.get_mut(&response_id)
    }

    /// Whether a handler is registered for `response_id`.
    pub fn contains(&self, response_id: MessageId) -> bool {
        !response_id.is_none() && self.handlers.contains_key(&response_id)
    }

    /// Remove and return the handler for `response_id`.
    pub fn remove(&mut self, response_id: MessageId) -> Option<Behavior<'static>> {
        self.handlers.remove(&response_id)
    }

    /// Drop every handler, returning how many were outstanding.
    pub fn clear(&mut self) -> usize {
        let outstanding = self.handlers.len();
        self.handlers.clear();
        outstanding
    }

    /// Number of outstanding requests.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no request is outstanding.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
