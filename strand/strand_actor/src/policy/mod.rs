//! Policy composition.
//!
//! A concrete actor is assembled from four independently substitutable
//! strategies:
//!
//! - **scheduling**: whether and where the actor's own body runs, and how
//!   the consumer waits for data
//! - **priority**: mailbox ordering and retry-cache management
//!   (see [`crate::mailbox::PriorityPolicy`])
//! - **resume**: what happens after one envelope has been processed
//! - **invoke**: how a matched handler is dispatched
//!
//! The axes are combined at compile time through [`Policies`], so a
//! `BlockingActor<ScopedPolicies>` carries no dynamic dispatch for any of
//! them.

pub mod invoke;
pub mod resume;
pub mod scheduling;

pub use invoke::{InvokePolicy, NestableInvoke};
pub use resume::{NoResume, ResumePolicy, Resumption};
pub use scheduling::{NoScheduling, SchedulingPolicy, ThreadedScheduling};

use std::marker::PhantomData;

use crate::mailbox::{NotPrioritizing, Prioritizing, PriorityPolicy};

/// A bundle of the four strategies an actor is built from.
pub trait ActorPolicies: 'static {
    /// Scheduling strategy
    type Scheduling: SchedulingPolicy;
    /// Mailbox ordering strategy
    type Priority: PriorityPolicy;
    /// Post-envelope strategy
    type Resume: ResumePolicy;
    /// Handler dispatch strategy
    type Invoke: InvokePolicy;
}

/// Type-level composition of one strategy per axis.
pub struct Policies<S, P, R, I>(PhantomData<fn() -> (S, P, R, I)>);

impl<S, P, R, I> ActorPolicies for Policies<S, P, R, I>
where
    S: SchedulingPolicy,
    P: PriorityPolicy,
    R: ResumePolicy,
    I: InvokePolicy,
{
    type Scheduling = S;
    type Priority = P;
    type Resume = R;
    type Invoke = I;
}

/// The degenerate set used by scoped actors: the actor never runs a body
/// of its own and is drained directly by the thread that owns it.
pub type ScopedPolicies = Policies<NoScheduling, NotPrioritizing, NoResume, NestableInvoke>;

/// Blocking actors spawned onto a dedicated thread, FIFO mailbox.
pub type ThreadedPolicies = Policies<ThreadedScheduling, NotPrioritizing, NoResume, NestableInvoke>;

/// Blocking actors spawned onto a dedicated thread, two-lane mailbox.
pub type PrioritizedPolicies = Policies<ThreadedScheduling, Prioritizing, NoResume, NestableInvoke>;
