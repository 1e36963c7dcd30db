//! Handler dispatch strategies.

use log::trace;

use crate::actor::ReceiveResult;

/// Decides how a matched handler is actually called.
///
/// `depth` is the number of handler invocations already on the actor's
/// stack; it is non-zero when a handler re-enters the receive family.
pub trait InvokePolicy: Default + 'static {
    /// Run `handler` and hand back its outcome.
    fn invoke<F>(&self, depth: usize, handler: F) -> ReceiveResult
    where
        F: FnOnce() -> ReceiveResult;
}

/// Allows handlers to call `receive` re-entrantly, for example while
/// awaiting a synchronous reply. The actor saves and restores its
/// current-message context around every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NestableInvoke;

impl InvokePolicy for NestableInvoke {
    fn invoke<F>(&self, depth: usize, handler: F) -> ReceiveResult
    where
        F: FnOnce() -> ReceiveResult,
    {
        trace!("Invoking handler at depth {}", depth);
        handler()
    }
}
