//! Actors bound to the lifetime of a stack scope.

use log::debug;
use std::fmt;
use std::ops::Deref;

use strand_core::ActorId;

use super::blocking::BlockingActor;
use crate::policy::ScopedPolicies;
use crate::system::{set_current_actor, ActorSystem};

/// A blocking actor driven directly by the thread that owns it.
///
/// It never runs a body of its own; the owner calls `receive` and friends
/// through `Deref`. Unless hidden, the actor counts as running while it
/// exists and is this thread's current actor.
///
/// Dropping it, whether by normal return, early return or unwinding, runs
/// cleanup with the planned exit reason (or `Normal`) and restores the
/// thread's previous current actor.
///
/// Visible scoped actors on one thread must be dropped in reverse creation
/// order. Each drop restores the value saved when it was created, so
/// dropping an outer actor before an inner one leaves the current-actor
/// slot naming the outer actor after it has been cleaned up.
pub struct ScopedActor {
    actor: BlockingActor<ScopedPolicies>,
    hidden: bool,
    previous: Option<ActorId>,
}

impl ScopedActor {
    /// Create a scoped actor that the registry counts.
    pub fn new(system: &ActorSystem) -> Self {
        Self::init(system, false)
    }

    /// Create a scoped actor that leaves the registry untouched.
    pub fn hidden(system: &ActorSystem) -> Self {
        Self::init(system, true)
    }

    fn init(system: &ActorSystem, hidden: bool) -> Self {
        let actor = BlockingActor::with_visibility(
            system,
            system.config().scoped_actor_name.clone(),
            hidden,
        );
        let mut previous = None;
        if !hidden {
            system.registry().inc_running();
            actor.mark_running_registered();
            previous = set_current_actor(Some(actor.id()));
        }
        debug!("Scoped actor {} entered scope", actor.id());
        Self {
            actor,
            hidden,
            previous,
        }
    }

    /// The underlying blocking actor.
    pub fn actor(&self) -> &BlockingActor<ScopedPolicies> {
        &self.actor
    }
}

impl Deref for ScopedActor {
    type Target = BlockingActor<ScopedPolicies>;

    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}

impl Drop for ScopedActor {
    fn drop(&mut self) {
        let reason = self.actor.planned_exit_reason().unwrap_or_default();
        self.actor.cleanup(reason);
        if !self.hidden {
            self.actor.system().registry().dec_running();
            set_current_actor(self.previous);
        }
        debug!("Scoped actor {} left scope ({})", self.actor.id(), reason);
    }
}

impl fmt::Debug for ScopedActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedActor")
            .field("actor", &self.actor)
            .field("hidden", &self.hidden)
            .finish()
    }
}
