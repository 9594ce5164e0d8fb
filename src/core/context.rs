//! Side-effect channel handed to state handlers.
//!
//! Handlers never return a next state; they record one here and the driver
//! (usually the actor worker) applies it once dispatch completes.

use super::state::State;
use crate::bus::EventBus;
use crate::queue::Mailbox;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Per-actor context passed to every [`StateHandler`](super::StateHandler) call.
pub struct Context<S: State, E> {
    actor: Arc<str>,
    next_state: Option<S>,
    bus: EventBus<E>,
    mailbox: Mailbox<E>,
}

impl<S: State, E> Context<S, E> {
    pub fn new(actor: impl Into<Arc<str>>, bus: EventBus<E>, mailbox: Mailbox<E>) -> Self {
        Self {
            actor: actor.into(),
            next_state: None,
            bus,
            mailbox,
        }
    }

    /// Context with its own private bus and mailbox, for driving a
    /// [`StateManager`](super::StateManager) without an actor.
    pub fn detached(actor: impl Into<Arc<str>>) -> Self {
        Self::new(actor, EventBus::new(), Mailbox::new())
    }

    pub fn actor_name(&self) -> &str {
        &self.actor
    }

    /// Request a transition once the current dispatch finishes.
    ///
    /// The last request made during one dispatch wins.
    pub fn transition_to(&mut self, target: S) {
        if let Some(previous) = self.next_state.replace(target) {
            debug!(
                actor = %self.actor,
                previous = previous.name(),
                target = target.name(),
                "pending transition overridden"
            );
        }
    }

    pub fn pending_state(&self) -> Option<S> {
        self.next_state
    }

    /// Take the pending transition request, clearing the slot.
    pub fn take_pending(&mut self) -> Option<S> {
        self.next_state.take()
    }

    /// Publish an event to the actor's bus subscribers, synchronously.
    pub fn emit(&self, event: E) {
        self.bus.emit(&event);
    }

    /// Enqueue an event for this same actor, behind everything already queued.
    pub fn post(&self, event: E) {
        self.mailbox.send(event);
    }

    pub fn bus(&self) -> &EventBus<E> {
        &self.bus
    }

    pub fn mailbox(&self) -> &Mailbox<E> {
        &self.mailbox
    }
}

impl<S: State, E> fmt::Debug for Context<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("actor", &self.actor)
            .field("next_state", &self.next_state)
            .finish()
    }
}
