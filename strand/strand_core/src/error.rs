//! Error types for the Strand runtime.
//!
//! Two kinds of failure exist. `Error` covers operations that can fail in
//! the ordinary sense (sending to a dead actor, loading configuration,
//! spawning a thread). `Exited` is not a failure at all: it is the signal
//! raised by `quit` that unwinds an actor's receive loops up to its
//! top-level execution boundary.

use crate::exit::ExitReason;
use crate::id::ActorId;
use thiserror::Error;

/// Root error type for the Strand runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// The recipient's mailbox was closed by cleanup
    #[error("Mailbox closed: actor {0} has exited")]
    MailboxClosed(ActorId),

    /// `reply` was called while no envelope with a sender was being handled
    #[error("No reply target: current message has no sender")]
    NoReplyTarget,

    /// An actor thread could not be launched
    #[error("Spawn error: {0}")]
    Spawn(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unwind signal raised by `quit`.
///
/// Every layer of the receive family returns `Result<_, Exited>` and passes
/// it upward with `?`. It is caught only where an actor's body is run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("actor exited: {reason}")]
pub struct Exited {
    /// Why the actor is leaving
    pub reason: ExitReason,
}

impl Exited {
    /// Create an exit signal carrying `reason`.
    pub fn new(reason: ExitReason) -> Self {
        Self { reason }
    }
}

/// Result type used throughout the Strand runtime.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let actor = ActorId::new();
        let error = Error::MailboxClosed(actor);
        let display = format!("{}", error);
        assert!(display.contains(&actor.to_string()));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_exited_display() {
        let exited = Exited::new(ExitReason::User(7));
        assert_eq!(exited.to_string(), "actor exited: user(7)");
    }
}
