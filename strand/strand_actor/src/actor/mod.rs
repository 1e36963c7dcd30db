//! Blocking actors and everything they consume.
//!
//! This module provides:
//!
//! - Envelopes, addresses and behaviors
//! - The blocking dequeue engine and its loop shapes
//! - Synchronous request/response correlation
//! - Scoped actors and closure-based actor bodies

pub mod behavior;
pub mod blocking;
pub mod envelope;
pub mod functor;
pub mod handle;
pub mod receive;
pub mod response;
pub mod scoped;
pub mod sync_table;

// Re-export key types from the message layer
pub use behavior::{Behavior, HandlerOutput, ReceiveResult};
pub use envelope::{Envelope, Payload, Priority};
pub use handle::ActorRef;

// Re-export key types from the actor layer
pub use blocking::{BlockingActor, LifecycleState};
pub use functor::{ActorBody, FunctorBody};
pub use receive::{Advance, DoReceive, Dequeue, ReceiveFor, ReceiveWhile};
pub use response::ResponseHandle;
pub use scoped::ScopedActor;
pub use sync_table::SyncRequestTable;
