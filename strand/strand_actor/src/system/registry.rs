//! Process-scoped bookkeeping of live actors.
//!
//! The registry tracks two things:
//!
//! - a running counter of non-hidden actors, which blocking barriers such
//!   as [`Registry::block_until_zero`] wait on through a condition variable
//! - a map of live non-hidden actors to their addresses, for lookup and
//!   diagnostics
//!
//! The identity of the actor currently executing on a thread lives in a
//! thread-local slot, see [`current_actor`] and [`set_current_actor`].

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use std::cell::Cell;
use std::collections::HashMap;

use strand_core::ActorId;

use crate::actor::ActorRef;

thread_local! {
    static CURRENT_ACTOR: Cell<Option<ActorId>> = const { Cell::new(None) };
}

/// Identity of the actor executing on this thread, if any.
pub fn current_actor() -> Option<ActorId> {
    CURRENT_ACTOR.with(Cell::get)
}

/// Replace this thread's current actor identity, returning the previous
/// value so the caller can restore it.
pub fn set_current_actor(id: Option<ActorId>) -> Option<ActorId> {
    CURRENT_ACTOR.with(|slot| slot.replace(id))
}

/// Public view of one registered actor.
#[derive(Debug, Clone, Serialize)]
pub struct ActorInfo {
    /// Actor identity
    pub id: ActorId,
    /// Debug name given at construction
    pub name: String,
    /// When the actor was registered
    pub registered_at: DateTime<Utc>,
}

struct RegistryEntry {
    address: ActorRef,
    name: String,
    registered_at: DateTime<Utc>,
}

/// Live-actor counter plus address book.
pub struct Registry {
    running: Mutex<usize>,
    running_changed: Condvar,
    entries: RwLock<HashMap<ActorId, RegistryEntry>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            running: Mutex::new(0),
            running_changed: Condvar::new(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Count one more running actor.
    pub fn inc_running(&self) {
        let mut running = self.running.lock();
        *running += 1;
        debug!("Running actors: {}", *running);
    }

    /// Count one fewer running actor and wake every waiter.
    pub fn dec_running(&self) {
        let mut running = self.running.lock();
        match running.checked_sub(1) {
            Some(remaining) => *running = remaining,
            None => warn!("Running actor count decremented below zero"),
        }
        debug!("Running actors: {}", *running);
        drop(running);
        self.running_changed.notify_all();
    }

    /// Current number of running actors.
    pub fn running(&self) -> usize {
        *self.running.lock()
    }

    /// Block until the running count equals `expected`.
    ///
    /// The count is rechecked after every decrement; there is no polling.
    pub fn await_running_count_equal(&self, expected: usize) {
        let mut running = self.running.lock();
        while *running != expected {
            trace!("Waiting for running count {} (now {})", expected, *running);
            self.running_changed.wait(&mut running);
        }
    }

    /// Block until no actor is running.
    pub fn block_until_zero(&self) {
        self.await_running_count_equal(0);
    }

    /// Record a live actor.
    pub fn put(&self, address: ActorRef, name: impl Into<String>) {
        let id = address.id();
        let entry = RegistryEntry {
            address,
            name: name.into(),
            registered_at: Utc::now(),
        };
        debug!("Registering actor {} ({})", id, entry.name);
        self.entries.write().insert(id, entry);
    }

    /// Look up the address of a live actor.
    pub fn get(&self, id: ActorId) -> Option<ActorRef> {
        self.entries.read().get(&id).map(|entry| entry.address.clone())
    }

    /// Forget an actor. Returns whether it was registered.
    pub fn erase(&self, id: ActorId) -> bool {
        let removed = self.entries.write().remove(&id).is_some();
        if removed {
            debug!("Erased actor {} from registry", id);
        }
        removed
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no actor is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Point-in-time listing of registered actors, oldest first.
    pub fn snapshot(&self) -> Vec<ActorInfo> {
        let mut infos: Vec<ActorInfo> = self
            .entries
            .read()
            .iter()
            .map(|(id, entry)| ActorInfo {
                id: *id,
                name: entry.name.clone(),
                registered_at: entry.registered_at,
            })
            .collect();
        infos.sort_by_key(|info| info.registered_at);
        infos
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
