//! The process-scoped context every actor belongs to.
//!
//! An [`ActorSystem`] bundles the [`Registry`], the configuration and the
//! request-id sequence. It is created once at startup and cloned into
//! every actor, so nothing in the runtime relies on hidden global state
//! apart from the per-thread current-actor slot.

pub mod config;
pub mod registry;

pub use config::ActorSystemConfig;
pub use registry::{current_actor, set_current_actor, ActorInfo, Registry};

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, info};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use strand_core::{Error, ExitReason, MessageId, Result};

use crate::actor::{ActorBody, ActorRef, BlockingActor, FunctorBody, HandlerOutput};
use crate::policy::{ActorPolicies, SchedulingPolicy, ThreadedPolicies};
use crate::sync::AtomicSequence;

struct SystemInner {
    config: ActorSystemConfig,
    registry: Registry,
    request_ids: AtomicSequence,
    spawned: AtomicSequence,
}

/// Shared runtime context. Cloning is cheap and every clone refers to the
/// same registry.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

impl ActorSystem {
    /// Create a system with default configuration.
    pub fn new() -> Self {
        Self::with_config(ActorSystemConfig::default())
    }

    /// Create a system with the given configuration.
    pub fn with_config(config: ActorSystemConfig) -> Self {
        info!("Starting actor system ({})", config.thread_name_prefix);
        Self {
            inner: Arc::new(SystemInner {
                config,
                registry: Registry::new(),
                request_ids: AtomicSequence::default(),
                spawned: AtomicSequence::default(),
            }),
        }
    }

    /// The configuration the system was built with.
    pub fn config(&self) -> &ActorSystemConfig {
        &self.inner.config
    }

    /// Live-actor bookkeeping.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Block until no actor is running.
    ///
    /// Meant for threads that are not actors themselves, such as `main`.
    pub fn await_all_actors_done(&self) {
        self.inner.registry.block_until_zero();
    }

    /// Spawn a closure as a blocking actor on its own thread.
    ///
    /// Returns once the actor exists and can receive messages.
    pub fn spawn<F, R>(&self, f: F) -> Result<ActorRef>
    where
        F: FnOnce(&BlockingActor<ThreadedPolicies>) -> R + Send + 'static,
        R: HandlerOutput,
    {
        self.spawn_with::<ThreadedPolicies, _>(FunctorBody::new(f))
    }

    /// Spawn `body` under the policy set `P`.
    pub fn spawn_with<P, B>(&self, body: B) -> Result<ActorRef>
    where
        P: ActorPolicies,
        B: ActorBody<P>,
    {
        let name = format!(
            "{}-{}",
            self.inner.config.thread_name_prefix,
            self.inner.spawned.next()
        );
        let (ready_tx, ready_rx) = bounded(1);
        let system = self.clone();
        let actor_name = name.clone();

        self.inner.registry.inc_running();
        let launched = P::Scheduling::default().launch(
            name.clone(),
            Box::new(move || run_actor::<P, B>(system, actor_name, body, ready_tx)),
        );
        if let Err(e) = launched {
            self.inner.registry.dec_running();
            return Err(e);
        }

        ready_rx
            .recv()
            .map_err(|_| Error::Spawn(format!("{} terminated before it was ready", name)))
    }

    pub(crate) fn next_request_id(&self) -> MessageId {
        self.inner.request_ids.next_request_id()
    }
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level execution boundary of a spawned actor.
fn run_actor<P, B>(system: ActorSystem, name: String, body: B, ready: Sender<ActorRef>)
where
    P: ActorPolicies,
    B: ActorBody<P>,
{
    let actor = BlockingActor::<P>::new(&system, name);
    actor.mark_running_registered();
    let previous = set_current_actor(Some(actor.id()));
    // the spawner may have stopped waiting; the actor runs regardless
    let _ = ready.send(actor.address().clone());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body.act(&actor)));
    let reason = match outcome {
        Ok(Ok(())) => actor.planned_exit_reason().unwrap_or_default(),
        Ok(Err(exited)) => exited.reason,
        Err(_) => {
            error!("Actor {} ({}) panicked", actor.id(), actor.name());
            ExitReason::UnhandledPanic
        }
    };
    debug!("Actor {} finished: {}", actor.id(), reason);

    actor.cleanup(reason);
    drop(actor);
    system.registry().dec_running();
    set_current_actor(previous);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Behavior;
    use crate::policy::ScopedPolicies;
    use std::sync::mpsc;
    use std::time::Duration;
    use strand_core::Exited;

    #[test]
    fn test_clones_share_registry() {
        let system = ActorSystem::new();
        let clone = system.clone();
        system.registry().inc_running();
        assert_eq!(clone.registry().running(), 1);
        clone.registry().dec_running();
    }

    #[test]
    fn test_request_ids_are_unique() {
        let system = ActorSystem::new();
        let first = system.next_request_id();
        let second = system.next_request_id();
        assert!(first.is_request());
        assert_ne!(first, second);
    }

    #[test]
    fn test_spawn_runs_body_and_exits() {
        let system = ActorSystem::new();
        let (tx, rx) = mpsc::channel();

        let address = system
            .spawn(move |actor| {
                actor.receive(&mut Behavior::new().on(|n: u32| tx.send(n * 2).unwrap()))
            })
            .unwrap();
        address.tell(21u32).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
        system.await_all_actors_done();
        assert!(!address.is_alive());
        assert!(system.registry().is_empty());
    }

    #[test]
    fn test_spawned_thread_is_named() {
        let config = ActorSystemConfig {
            thread_name_prefix: "unit".to_string(),
            ..ActorSystemConfig::default()
        };
        let system = ActorSystem::with_config(config);
        let (tx, rx) = mpsc::channel();

        system
            .spawn(move |_| {
                tx.send(std::thread::current().name().map(str::to_owned))
                    .unwrap();
            })
            .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert!(name.starts_with("unit-"));
        system.await_all_actors_done();
    }

    #[test]
    fn test_spawn_with_scoped_policies_fails() {
        let system = ActorSystem::new();
        let result =
            system.spawn_with::<ScopedPolicies, _>(FunctorBody::detached(|| ()));
        assert!(matches!(result, Err(Error::Spawn(_))));
        assert_eq!(system.registry().running(), 0);
    }

    #[test]
    fn test_exit_signal_caught_at_boundary() {
        let system = ActorSystem::new();
        system
            .spawn(|actor| -> std::result::Result<(), Exited> {
                actor.quit(ExitReason::User(3))?;
                unreachable!("quit always returns the exit signal")
            })
            .unwrap();
        system.await_all_actors_done();
    }
}
