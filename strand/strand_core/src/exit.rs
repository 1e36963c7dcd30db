//! Reasons an actor stops running.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an actor exited.
///
/// An actor that has not planned an exit carries no reason at all
/// (`Option<ExitReason>::None`), so there is no "not exited" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// The actor finished its work
    Normal,

    /// The actor's body panicked
    UnhandledPanic,

    /// A correlated response arrived that its awaiting behavior did not match
    UnhandledSyncFailure,

    /// The user asked the actor to shut down
    UserShutdown,

    /// The actor was forcibly terminated
    Kill,

    /// Application-defined reason code
    User(u32),
}

impl ExitReason {
    /// Whether this reason counts as a clean exit.
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl Default for ExitReason {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::UnhandledPanic => write!(f, "unhandled_panic"),
            Self::UnhandledSyncFailure => write!(f, "unhandled_sync_failure"),
            Self::UserShutdown => write!(f, "user_shutdown"),
            Self::Kill => write!(f, "kill"),
            Self::User(code) => write!(f, "user({})", code),
        }
    }
}
