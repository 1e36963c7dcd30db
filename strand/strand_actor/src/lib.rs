#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Strand Actor
//!
//! Blocking actors for the Strand runtime.
//!
//! This crate provides the execution core of Strand, including:
//!
//! - A blocking receive loop with a retry cache for unmatched messages
//! - Pluggable mailbox ordering (FIFO or two-lane priority)
//! - Synchronous request/response correlation
//! - Scoped actors bound to a stack frame, and spawned actors on their own
//!   threads
//!
//! ## Example
//!
//! ```
//! use strand_actor::{ActorSystem, Behavior, ScopedActor};
//!
//! let system = ActorSystem::new();
//! let echo = system
//!     .spawn(|actor| {
//!         actor.receive(&mut Behavior::new().on(|text: String| {
//!             let _ = actor.reply(text.to_uppercase());
//!         }))
//!     })
//!     .unwrap();
//!
//! let scoped = ScopedActor::new(&system);
//! scoped.send(&echo, "hello".to_string()).unwrap();
//!
//! let mut answer = String::new();
//! scoped
//!     .receive(&mut Behavior::new().on(|text: String| answer = text))
//!     .unwrap();
//! assert_eq!(answer, "HELLO");
//! ```

/// Actors, behaviors and the dequeue engine
pub mod actor;

/// Per-actor message storage and ordering policies
pub mod mailbox;

/// Scheduling, priority, resume and invoke strategies
pub mod policy;

/// Synchronization primitives shared by the runtime
pub mod sync;

/// Actor system context, registry and configuration
pub mod system;

// Re-export key types for easier access
pub use actor::{
    ActorBody, ActorRef, Behavior, BlockingActor, Envelope, FunctorBody, HandlerOutput,
    LifecycleState, Payload, Priority, ReceiveResult, ResponseHandle, ScopedActor,
};
pub use policy::{ActorPolicies, PrioritizedPolicies, ScopedPolicies, ThreadedPolicies};
pub use system::{current_actor, ActorSystem, ActorSystemConfig, Registry};

pub use strand_core::{ActorId, Error, ExitReason, Exited, MessageId, Result};
