//! Running plain closures as actor bodies.

use super::behavior::{HandlerOutput, ReceiveResult};
use super::blocking::BlockingActor;
use crate::policy::ActorPolicies;

/// The code a spawned actor runs.
///
/// The result is inspected at the actor's top-level boundary: `Ok` exits
/// with the planned reason (or `Normal`), `Err(Exited)` with the reason it
/// carries.
pub trait ActorBody<P: ActorPolicies>: Send + 'static {
    /// Run the body to completion on the actor's thread.
    fn act(self, actor: &BlockingActor<P>) -> ReceiveResult;
}

type BoxedBody<P> = Box<dyn FnOnce(&BlockingActor<P>) -> ReceiveResult + Send>;

/// A closure adapted into an [`ActorBody`].
///
/// The constructor decides whether the closure receives the actor and
/// which arguments are bound into it.
///
/// ```
/// use strand_actor::{FunctorBody, ThreadedPolicies};
///
/// let body: FunctorBody<ThreadedPolicies> =
///     FunctorBody::bind_detached(|limit: u32| assert!(limit > 0), 3);
/// # drop(body);
/// ```
pub struct FunctorBody<P: ActorPolicies> {
    body: BoxedBody<P>,
}

impl<P: ActorPolicies> FunctorBody<P> {
    /// `f` receives the actor.
    pub fn new<F, R>(f: F) -> Self
    where
        F: FnOnce(&BlockingActor<P>) -> R + Send + 'static,
        R: HandlerOutput,
    {
        Self {
            body: Box::new(move |actor: &BlockingActor<P>| f(actor).into_outcome()),
        }
    }

    /// `f` ignores the actor.
    pub fn detached<F, R>(f: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: HandlerOutput,
    {
        Self {
            body: Box::new(move |_: &BlockingActor<P>| f().into_outcome()),
        }
    }

    /// `f` receives the actor followed by `args`.
    pub fn bind<F, A, R>(f: F, args: A) -> Self
    where
        F: FnOnce(&BlockingActor<P>, A) -> R + Send + 'static,
        A: Send + 'static,
        R: HandlerOutput,
    {
        Self {
            body: Box::new(move |actor: &BlockingActor<P>| f(actor, args).into_outcome()),
        }
    }

    /// `f` receives only `args`.
    pub fn bind_detached<F, A, R>(f: F, args: A) -> Self
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
        R: HandlerOutput,
    {
        Self {
            body: Box::new(move |_: &BlockingActor<P>| f(args).into_outcome()),
        }
    }
}

impl<P: ActorPolicies> ActorBody<P> for FunctorBody<P> {
    fn act(self, actor: &BlockingActor<P>) -> ReceiveResult {
        (self.body)(actor)
    }
}
