//! Pattern/handler sets consumed by the receive family.
//!
//! A [`Behavior`] is an ordered list of cases. Each case pairs a pattern
//! (a payload type plus an optional guard) with a handler. The first case
//! whose pattern matches wins. An envelope no case matches is neither
//! consumed nor dropped: the dequeue engine parks it in the retry cache.
//!
//! # Examples
//!
//! ```
//! use std::cell::Cell;
//! use std::time::Duration;
//! use strand_actor::Behavior;
//!
//! let total = Cell::new(0);
//! let timed_out = Cell::new(false);
//! let behavior = Behavior::new()
//!     .on(|n: i32| total.set(total.get() + n))
//!     .on_if(|s: &String| s.is_empty(), |_: String| total.set(0))
//!     .after(Duration::from_millis(10), || timed_out.set(true));
//!
//! assert_eq!(behavior.len(), 2);
//! assert_eq!(behavior.timeout(), Some(Duration::from_millis(10)));
//! ```

use log::error;
use std::any::{type_name, Any};
use std::convert::Infallible;
use std::fmt;
use std::time::Duration;

use strand_core::Exited;

use super::envelope::{Envelope, Payload};

/// Outcome of one trip through the receive family.
pub type ReceiveResult = Result<(), Exited>;

/// Values a handler may return.
///
/// Handlers that never quit can return `()`. Handlers that may quit return
/// `Result<(), Exited>`, usually the result of `actor.quit(..)`.
pub trait HandlerOutput {
    /// Convert into the engine's outcome type.
    fn into_outcome(self) -> ReceiveResult;
}

impl HandlerOutput for () {
    fn into_outcome(self) -> ReceiveResult {
        Ok(())
    }
}

impl HandlerOutput for Result<(), Exited> {
    fn into_outcome(self) -> ReceiveResult {
        self
    }
}

impl HandlerOutput for Result<Infallible, Exited> {
    fn into_outcome(self) -> ReceiveResult {
        self.map(|never| match never {})
    }
}

type Matcher<'a> = Box<dyn Fn(&(dyn Any + Send)) -> bool + 'a>;
type Handler<'a> = Box<dyn FnMut(Payload) -> ReceiveResult + 'a>;

struct Case<'a> {
    label: &'static str,
    matcher: Matcher<'a>,
    handler: Handler<'a>,
}

struct TimeoutCase<'a> {
    after: Duration,
    handler: Box<dyn FnMut() -> ReceiveResult + 'a>,
}

/// What an actor is currently willing to consume.
///
/// Guards run while the mailbox is being scanned and must not call back
/// into the actor's receive family.
#[derive(Default)]
pub struct Behavior<'a> {
    cases: Vec<Case<'a>>,
    timeout: Option<TimeoutCase<'a>>,
}

impl<'a> Behavior<'a> {
    /// Create a behavior with no cases.
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            timeout: None,
        }
    }

    /// Handle payloads of type `T`.
    pub fn on<T, F, R>(self, handler: F) -> Self
    where
        T: Any + Send,
        F: FnMut(T) -> R + 'a,
        R: HandlerOutput,
    {
        self.push_case::<T, F, R>(Box::new(|payload: &(dyn Any + Send)| payload.is::<T>()), handler)
    }

    /// Handle payloads of type `T` for which `guard` holds.
    pub fn on_if<T, G, F, R>(self, guard: G, handler: F) -> Self
    where
        T: Any + Send,
        G: Fn(&T) -> bool + 'a,
        F: FnMut(T) -> R + 'a,
        R: HandlerOutput,
    {
        self.push_case::<T, F, R>(
            Box::new(move |payload: &(dyn Any + Send)| {
                payload.downcast_ref::<T>().is_some_and(|value| guard(value))
            }),
            handler,
        )
    }

    /// Handle any payload. Cases added after this one are unreachable.
    pub fn others<F, R>(mut self, mut handler: F) -> Self
    where
        F: FnMut(Payload) -> R + 'a,
        R: HandlerOutput,
    {
        self.cases.push(Case {
            label: "<any>",
            matcher: Box::new(|_: &(dyn Any + Send)| true),
            handler: Box::new(move |payload: Payload| handler(payload).into_outcome()),
        });
        self
    }

    /// Fire `handler` if no envelope matches within `timeout`.
    ///
    /// A later call replaces an earlier one.
    pub fn after<F, R>(mut self, timeout: Duration, mut handler: F) -> Self
    where
        F: FnMut() -> R + 'a,
        R: HandlerOutput,
    {
        self.timeout = Some(TimeoutCase {
            after: timeout,
            handler: Box::new(move || handler().into_outcome()),
        });
        self
    }

    /// The timeout bound, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.as_ref().map(|timeout| timeout.after)
    }

    /// Number of pattern cases (the timeout entry is not counted).
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the behavior has no pattern cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Index of the first case matching `envelope`.
    pub fn find_match(&self, envelope: &Envelope) -> Option<usize> {
        self.cases
            .iter()
            .position(|case| (case.matcher)(envelope.payload()))
    }

    pub(crate) fn invoke(&mut self, index: usize, payload: Payload) -> ReceiveResult {
        match self.cases.get_mut(index) {
            Some(case) => (case.handler)(payload),
            None => Ok(()),
        }
    }

    pub(crate) fn handle_timeout(&mut self) -> ReceiveResult {
        match self.timeout.as_mut() {
            Some(timeout) => (timeout.handler)(),
            None => Ok(()),
        }
    }

    fn push_case<T, F, R>(mut self, matcher: Matcher<'a>, mut handler: F) -> Self
    where
        T: Any + Send,
        F: FnMut(T) -> R + 'a,
        R: HandlerOutput,
    {
        self.cases.push(Case {
            label: type_name::<T>(),
            matcher,
            handler: Box::new(move |payload: Payload| match payload.downcast::<T>() {
                Ok(value) => handler(*value).into_outcome(),
                Err(_) => {
                    // matchers are checked before dispatch; reaching this is an engine bug
                    error!("Handler for {} invoked with a foreign payload", type_name::<T>());
                    Ok(())
                }
            }),
        });
        self
    }
}

impl fmt::Debug for Behavior<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field(
                "cases",
                &self.cases.iter().map(|case| case.label).collect::<Vec<_>>(),
            )
            .field("timeout", &self.timeout())
            .finish()
    }
}
