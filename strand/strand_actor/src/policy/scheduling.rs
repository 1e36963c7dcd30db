//! Scheduling strategies.

use log::debug;
use std::thread;
use std::time::Instant;

use strand_core::{Error, Result};

use crate::mailbox::Inbox;

/// Decides whether an actor's body runs autonomously, and how its consumer
/// waits for data.
pub trait SchedulingPolicy: Default + 'static {
    /// Start `body` as the actor's thread of execution.
    fn launch(&self, name: String, body: Box<dyn FnOnce() + Send + 'static>) -> Result<()>;

    /// Block until the inbox has data or `deadline` passes.
    ///
    /// Returns `true` if data is available.
    fn await_data(&self, inbox: &Inbox, deadline: Option<Instant>) -> bool {
        inbox.wait_nonempty(deadline)
    }
}

/// No autonomous execution. The owning thread drives the actor directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScheduling;

impl SchedulingPolicy for NoScheduling {
    fn launch(&self, name: String, _body: Box<dyn FnOnce() + Send + 'static>) -> Result<()> {
        Err(Error::Spawn(format!(
            "{} uses a policy without scheduling and cannot run a body",
            name
        )))
    }
}

/// One dedicated, named OS thread per actor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadedScheduling;

impl SchedulingPolicy for ThreadedScheduling {
    fn launch(&self, name: String, body: Box<dyn FnOnce() + Send + 'static>) -> Result<()> {
        debug!("Launching actor thread {}", name);
        thread::Builder::new()
            .name(name)
            .spawn(body)
            .map(|_detached| ())
            .map_err(|e| Error::Spawn(e.to_string()))
    }
}
