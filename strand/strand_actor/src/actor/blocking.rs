//! Actors that consume their mailbox by blocking the calling thread.
//!
//! A [`BlockingActor`] is driven by exactly one thread: either a thread it
//! was spawned onto, or (for a [`ScopedActor`](crate::ScopedActor)) the
//! thread that owns it. All methods take `&self` and the actor is neither
//! `Send` nor `Sync`, so handlers can freely capture a reference to the
//! actor while the single-consumer rule still holds.
//!
//! # Dequeue order
//!
//! `receive` first scans the retry cache, oldest first, and only then
//! pulls new envelopes through the priority policy. Every pulled envelope
//! that the behavior does not match is appended to the cache, so nothing is
//! ever dropped while the actor is alive.
//!
//! # Leaving a loop
//!
//! [`BlockingActor::quit`] plans an exit and returns [`Exited`]. Every
//! member of the receive family passes that error upward with `?`, and every
//! later `receive` fails immediately with it again, so the signal cannot be
//! swallowed by an intermediate loop.

use log::{debug, trace, warn};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use strand_core::{ActorId, Error, ExitReason, Exited, MessageId, Result};

use super::behavior::{Behavior, ReceiveResult};
use super::envelope::{Envelope, MessageContext, Priority};
use super::handle::ActorRef;
use super::receive::{Advance, DoReceive, Dequeue, ReceiveFor, ReceiveWhile};
use super::response::ResponseHandle;
use super::sync_table::SyncRequestTable;
use crate::mailbox::Mailbox;
use crate::policy::{
    ActorPolicies, InvokePolicy, ResumePolicy, Resumption, SchedulingPolicy, ScopedPolicies,
};
use crate::system::ActorSystem;

/// Where an actor is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Accepting and processing messages
    Running,
    /// `quit` was called; the exit signal is unwinding
    ExitPending,
    /// Cleanup has run
    Exited,
}

/// How the engine treats one envelope under the active behavior.
enum Selection {
    /// Leave it (in the cache, or put it there)
    Skip,
    /// Run case `n` of the caller's behavior
    Behavior(usize),
    /// Run case `n` of the sync handler registered for the envelope's id
    SyncHandler(usize),
    /// A correlated response nobody can handle
    SyncFailure,
}

/// An actor that processes messages by blocking its thread.
pub struct BlockingActor<P: ActorPolicies = ScopedPolicies> {
    id: ActorId,
    name: String,
    hidden: bool,
    address: ActorRef,
    system: ActorSystem,
    mailbox: RefCell<Mailbox<P::Priority>>,
    sync_handlers: RefCell<SyncRequestTable>,
    state: Cell<LifecycleState>,
    planned_exit: Cell<Option<ExitReason>>,
    exit_reason: Cell<Option<ExitReason>>,
    current: RefCell<Option<MessageContext>>,
    invoke_depth: Cell<usize>,
    running_registered: Cell<bool>,
    scheduling: P::Scheduling,
    resume: RefCell<P::Resume>,
    invoke: P::Invoke,
}

impl<P: ActorPolicies> BlockingActor<P> {
    /// Create an actor that is listed in the system registry.
    pub fn new(system: &ActorSystem, name: impl Into<String>) -> Self {
        Self::with_visibility(system, name, false)
    }

    /// Create an actor that the registry never sees.
    pub fn hidden(system: &ActorSystem, name: impl Into<String>) -> Self {
        Self::with_visibility(system, name, true)
    }

    pub(crate) fn with_visibility(system: &ActorSystem, name: impl Into<String>, hidden: bool) -> Self {
        let id = ActorId::new();
        let name = name.into();
        let mailbox = Mailbox::new(id);
        let address = ActorRef::new(Arc::clone(mailbox.inbox()));

        if !hidden {
            system.registry().put(address.clone(), name.clone());
        }
        debug!("Created actor {} ({}, hidden: {})", id, name, hidden);

        Self {
            id,
            name,
            hidden,
            address,
            system: system.clone(),
            mailbox: RefCell::new(mailbox),
            sync_handlers: RefCell::new(SyncRequestTable::new()),
            state: Cell::new(LifecycleState::Running),
            planned_exit: Cell::new(None),
            exit_reason: Cell::new(None),
            current: RefCell::new(None),
            invoke_depth: Cell::new(0),
            running_registered: Cell::new(false),
            scheduling: P::Scheduling::default(),
            resume: RefCell::new(P::Resume::default()),
            invoke: P::Invoke::default(),
        }
    }

    /// Actor identity.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the actor bypasses the registry.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Address other actors send to.
    pub fn address(&self) -> &ActorRef {
        &self.address
    }

    /// The system this actor belongs to.
    pub fn system(&self) -> &ActorSystem {
        &self.system
    }

    /// Lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Reason recorded by the last `quit`, if any.
    pub fn planned_exit_reason(&self) -> Option<ExitReason> {
        self.planned_exit.get()
    }

    /// Reason cleanup ran with, once the actor has exited.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason.get()
    }

    /// Number of envelopes parked in the retry cache.
    pub fn cache_len(&self) -> usize {
        self.mailbox.borrow().cache_len()
    }

    /// Number of envelopes not yet pulled from the mailbox.
    pub fn pending(&self) -> usize {
        self.address.pending()
    }

    /// Block until one envelope matched by `behavior` has been handled, or
    /// until its timeout fires.
    pub fn receive(&self, behavior: &mut Behavior<'_>) -> ReceiveResult {
        self.dequeue_response(behavior, MessageId::NONE)
    }

    /// Receive with `behavior` forever. Only an exit ends the loop.
    pub fn receive_loop(&self, behavior: &mut Behavior<'_>) -> std::result::Result<Infallible, Exited> {
        loop {
            self.receive(behavior)?;
        }
    }

    /// Receive while `*begin != end`, advancing `begin` after every
    /// iteration.
    pub fn receive_for<'s, T>(&'s self, begin: &'s mut T, end: T) -> ReceiveFor<'s, Self, T>
    where
        T: PartialEq + Advance,
    {
        ReceiveFor::new(self, begin, end)
    }

    /// Receive while `stmt` holds, checking it before every iteration.
    pub fn receive_while<F>(&self, stmt: F) -> ReceiveWhile<'_, Self, F>
    where
        F: FnMut() -> bool,
    {
        ReceiveWhile::new(self, stmt)
    }

    /// Receive with `behavior` at least once, see [`DoReceive::until`].
    pub fn do_receive<'b>(&self, behavior: Behavior<'b>) -> DoReceive<'_, 'b, Self> {
        DoReceive::new(self, behavior)
    }

    /// Plan an exit with `reason` and return the signal that unwinds the
    /// receive family.
    ///
    /// The result is always `Err`. A later `quit` overwrites the reason.
    pub fn quit(&self, reason: ExitReason) -> ReceiveResult {
        debug!("Actor {} quits: {}", self.id, reason);
        self.planned_exit.set(Some(reason));
        if self.state.get() == LifecycleState::Running {
            self.state.set(LifecycleState::ExitPending);
        }
        Err(Exited::new(reason))
    }

    /// Send a one-way message with this actor as sender.
    pub fn send<T: Any + Send>(&self, target: &ActorRef, payload: T) -> Result<()> {
        self.send_with_priority(target, Priority::Normal, payload)
    }

    /// Send a one-way message with an explicit priority tag.
    pub fn send_with_priority<T: Any + Send>(
        &self,
        target: &ActorRef,
        priority: Priority,
        payload: T,
    ) -> Result<()> {
        target.enqueue(Envelope::new(
            Some(self.address.clone()),
            target.id(),
            MessageId::NONE,
            priority,
            payload,
        ))
    }

    /// Send `payload` as a request expecting a reply.
    pub fn request<T: Any + Send>(&self, target: &ActorRef, payload: T) -> Result<ResponseHandle<'_, P>> {
        let id = self.system.next_request_id();
        trace!("Actor {} sends {} to {}", self.id, id, target.id());
        target.enqueue(Envelope::new(
            Some(self.address.clone()),
            target.id(),
            id,
            Priority::Normal,
            payload,
        ))?;
        Ok(ResponseHandle::new(self, id))
    }

    /// Answer the envelope currently being handled.
    ///
    /// A request is answered with its correlated response id, anything else
    /// with a plain one-way message.
    pub fn reply<T: Any + Send>(&self, payload: T) -> Result<()> {
        let (sender, id) = match self.current.borrow().as_ref() {
            Some(MessageContext {
                sender: Some(sender),
                id,
            }) => (sender.clone(), *id),
            _ => return Err(Error::NoReplyTarget),
        };
        let reply_id = if id.is_request() {
            id.response_id()
        } else {
            MessageId::NONE
        };
        sender.enqueue(Envelope::new(
            Some(self.address.clone()),
            sender.id(),
            reply_id,
            Priority::Normal,
            payload,
        ))
    }

    /// Sender of the envelope currently being handled.
    pub fn current_sender(&self) -> Option<ActorRef> {
        self.current
            .borrow()
            .as_ref()
            .and_then(|context| context.sender.clone())
    }

    /// Correlation id of the envelope currently being handled.
    pub fn current_message_id(&self) -> MessageId {
        self.current
            .borrow()
            .as_ref()
            .map_or(MessageId::NONE, |context| context.id)
    }

    /// Block until every running actor except this one has finished.
    ///
    /// An actor that does not count itself as running (hidden, or created
    /// directly) waits for the counter to reach zero.
    pub fn await_all_other_actors_done(&self) {
        let own = usize::from(self.running_registered.get());
        debug!("Actor {} awaits running count {}", self.id, own);
        self.system.registry().await_running_count_equal(own);
    }

    /// Release the actor's resources.
    ///
    /// Closes the mailbox, discarding anything still pending or cached,
    /// drops outstanding sync handlers and erases the registry entry. Runs
    /// at most once; returns whether this call did the work.
    pub fn cleanup(&self, reason: ExitReason) -> bool {
        if self.state.get() == LifecycleState::Exited {
            return false;
        }
        self.state.set(LifecycleState::Exited);
        self.exit_reason.set(Some(reason));

        let discarded = self.mailbox.borrow_mut().close();
        let outstanding = self.sync_handlers.borrow_mut().clear();
        if !self.hidden {
            self.system.registry().erase(self.id);
        }
        debug!(
            "Actor {} cleaned up ({}): {} envelopes discarded, {} requests outstanding",
            self.id, reason, discarded, outstanding
        );
        true
    }

    pub(crate) fn mark_running_registered(&self) {
        self.running_registered.set(true);
    }

    pub(crate) fn register_sync_handler(&self, response_id: MessageId, behavior: Behavior<'static>) {
        self.sync_handlers.borrow_mut().insert(response_id, behavior);
    }

    fn check_exit(&self) -> ReceiveResult {
        match self.state.get() {
            LifecycleState::Running => Ok(()),
            LifecycleState::ExitPending | LifecycleState::Exited => {
                let reason = self
                    .planned_exit
                    .get()
                    .or(self.exit_reason.get())
                    .unwrap_or_default();
                Err(Exited::new(reason))
            }
        }
    }

    /// The dequeue engine.
    ///
    /// With `awaited == MessageId::NONE` this is an ordinary `receive`.
    /// Otherwise only the response carrying `awaited` is considered and
    /// everything else goes to the cache.
    pub(crate) fn dequeue_response(&self, behavior: &mut Behavior<'_>, awaited: MessageId) -> ReceiveResult {
        self.check_exit()?;
        // a timeout past the clock's range waits without a deadline
        let deadline = behavior
            .timeout()
            .and_then(|timeout| Instant::now().checked_add(timeout));

        let mut index = 0;
        loop {
            let selection = {
                let mailbox = self.mailbox.borrow();
                match mailbox.cache().get(index) {
                    Some(envelope) => self.select(behavior, envelope, awaited),
                    None => break,
                }
            };
            match selection {
                Selection::Skip => index += 1,
                Selection::SyncFailure => return self.sync_failure(awaited),
                selection => {
                    let erased = self.mailbox.borrow_mut().cache_erase(index);
                    if let Some(envelope) = erased {
                        trace!("Actor {} matched cached {:?}", self.id, envelope);
                        return self.consume(envelope, selection, behavior);
                    }
                    break;
                }
            }
        }

        loop {
            loop {
                let next = self.mailbox.borrow_mut().next_message();
                let Some(envelope) = next else {
                    break;
                };
                match self.select(behavior, &envelope, awaited) {
                    Selection::Skip => self.stash(envelope),
                    Selection::SyncFailure => {
                        self.stash(envelope);
                        return self.sync_failure(awaited);
                    }
                    selection => return self.consume(envelope, selection, behavior),
                }
            }

            let inbox = Arc::clone(self.mailbox.borrow().inbox());
            if self.scheduling.await_data(&inbox, deadline) {
                continue;
            }
            if inbox.is_closed() {
                self.check_exit()?;
                return Err(Exited::new(self.exit_reason.get().unwrap_or_default()));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                trace!("Actor {} timed out waiting", self.id);
                let result = self.run_handler(None, || behavior.handle_timeout());
                return result.and_then(|()| self.check_exit());
            }
        }
    }

    fn select(&self, behavior: &Behavior<'_>, envelope: &Envelope, awaited: MessageId) -> Selection {
        let id = envelope.id();
        if !awaited.is_none() {
            if id != awaited {
                return Selection::Skip;
            }
            return match behavior.find_match(envelope) {
                Some(index) => Selection::Behavior(index),
                None => Selection::SyncFailure,
            };
        }
        if id.is_response() {
            if let Some(handler) = self.sync_handlers.borrow_mut().sync_handler(id) {
                return match handler.find_match(envelope) {
                    Some(index) => Selection::SyncHandler(index),
                    None => Selection::SyncFailure,
                };
            }
        }
        match behavior.find_match(envelope) {
            Some(index) => Selection::Behavior(index),
            None => Selection::Skip,
        }
    }

    fn consume(&self, envelope: Envelope, selection: Selection, behavior: &mut Behavior<'_>) -> ReceiveResult {
        let result = match selection {
            Selection::Behavior(index) => {
                let (context, payload) = envelope.into_parts();
                self.run_handler(Some(context), || behavior.invoke(index, payload))
            }
            Selection::SyncHandler(index) => {
                let id = envelope.id();
                let handler = self.sync_handlers.borrow_mut().remove(id);
                match handler {
                    Some(mut handler) => {
                        let (context, payload) = envelope.into_parts();
                        self.run_handler(Some(context), || handler.invoke(index, payload))
                    }
                    None => {
                        warn!("Sync handler for {} vanished before dispatch", id);
                        self.stash(envelope);
                        Ok(())
                    }
                }
            }
            Selection::Skip | Selection::SyncFailure => {
                self.stash(envelope);
                Ok(())
            }
        };
        result.and_then(|()| self.check_exit())
    }

    fn run_handler<F>(&self, context: Option<MessageContext>, handler: F) -> ReceiveResult
    where
        F: FnOnce() -> ReceiveResult,
    {
        let previous = self.current.replace(context);
        let depth = self.invoke_depth.get();
        self.invoke_depth.set(depth + 1);

        let result = self.invoke.invoke(depth, handler);

        self.invoke_depth.set(depth);
        self.current.replace(previous);
        if self.resume.borrow_mut().after_envelope() == Resumption::Yield {
            thread::yield_now();
        }
        result
    }

    fn stash(&self, envelope: Envelope) {
        trace!("Actor {} caches {:?}", self.id, envelope);
        let mut mailbox = self.mailbox.borrow_mut();
        mailbox.push_to_cache(envelope);
        let threshold = self.system.config().cache_warning_threshold;
        if mailbox.cache_len() == threshold.saturating_add(1) {
            warn!(
                "Actor {} holds more than {} unmatched envelopes",
                self.id, threshold
            );
        }
    }

    fn sync_failure(&self, awaited: MessageId) -> ReceiveResult {
        warn!(
            "Actor {} received a response it cannot handle (awaiting {})",
            self.id, awaited
        );
        self.quit(ExitReason::UnhandledSyncFailure)
    }
}

impl<P: ActorPolicies> Dequeue for BlockingActor<P> {
    fn dequeue(&self, behavior: &mut Behavior<'_>) -> ReceiveResult {
        self.receive(behavior)
    }
}

impl<P: ActorPolicies> Drop for BlockingActor<P> {
    fn drop(&mut self) {
        self.cleanup(self.planned_exit.get().unwrap_or_default());
    }
}

impl<P: ActorPolicies> fmt::Debug for BlockingActor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingActor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("state", &self.state.get())
            .field("planned_exit", &self.planned_exit.get())
            .finish()
    }
}
