#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Strand Core
//!
//! `strand_core` provides the shared vocabulary of the Strand blocking actor
//! runtime: identifiers, exit reasons and error types.
//!
//! ## Crate Structure
//!
//! - **error**: the root error type and the `Exited` unwind signal
//! - **exit**: reasons an actor stops running
//! - **id**: strongly-typed actor identifiers and correlation ids

pub mod error;
pub mod exit;
pub mod id;

// Re-export key types for convenience
pub use error::{Error, Exited, Result};
pub use exit::ExitReason;
pub use id::{ActorId, Id, MessageId};
