//! State behavior: entry, exit and event handling.
//!
//! A node in the state tree holds one boxed [`StateHandler`]. Handlers that
//! return [`Handled::No`] let the event bubble to the parent state, which is
//! how a superstate provides default behavior for its substates.

use super::context::Context;
use super::state::State;
use std::fmt;

/// Whether a state consumed an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    /// The event was consumed; bubbling stops here.
    Yes,
    /// The event should be offered to the parent state.
    No,
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Behavior attached to one state of the hierarchy.
///
/// All methods have defaults: entry and exit do nothing, and events are not
/// handled, so a state only overrides what it cares about.
///
/// # Example
///
/// ```rust
/// use strata::core::{Context, Handled, State, StateHandler};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door { Root, Open, Closed }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Root => "Root",
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// #[derive(Debug)]
/// enum DoorEvent { Close }
///
/// struct OpenState;
///
/// impl StateHandler<Door, DoorEvent> for OpenState {
///     fn process_event(&mut self, event: &DoorEvent, ctx: &mut Context<Door, DoorEvent>) -> Handled {
///         match event {
///             DoorEvent::Close => {
///                 ctx.transition_to(Door::Closed);
///                 Handled::Yes
///             }
///         }
///     }
/// }
/// ```
pub trait StateHandler<S: State, E>: Send {
    fn on_entry(&mut self, _ctx: &mut Context<S, E>) {}

    fn on_exit(&mut self, _ctx: &mut Context<S, E>) {}

    fn process_event(&mut self, _event: &E, _ctx: &mut Context<S, E>) -> Handled {
        Handled::No
    }
}

/// Handler that ignores every event; useful as a passive root.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passive;

impl<S: State, E> StateHandler<S, E> for Passive {}

type HookFn<S, E> = Box<dyn FnMut(&mut Context<S, E>) + Send>;
type EventFn<S, E> = Box<dyn FnMut(&E, &mut Context<S, E>) -> Handled + Send>;

/// Closure bundle implementing [`StateHandler`].
///
/// # Example
///
/// ```rust
/// use strata::core::{Handled, Handlers};
/// use strata::states;
///
/// states! {
///     enum Lamp { Root, Off, On }
/// }
///
/// let off = Handlers::<Lamp, bool>::new()
///     .on_entry(|_ctx| println!("lamp off"))
///     .on_event(|switched_on, ctx| {
///         if *switched_on {
///             ctx.transition_to(Lamp::On);
///         }
///         Handled::from(*switched_on)
///     });
/// ```
pub struct Handlers<S: State, E> {
    entry: Option<HookFn<S, E>>,
    exit: Option<HookFn<S, E>>,
    event: Option<EventFn<S, E>>,
}

impl<S: State, E> Handlers<S, E> {
    pub fn new() -> Self {
        Self {
            entry: None,
            exit: None,
            event: None,
        }
    }

    pub fn on_entry<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Context<S, E>) + Send + 'static,
    {
        self.entry = Some(Box::new(f));
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Context<S, E>) + Send + 'static,
    {
        self.exit = Some(Box::new(f));
        self
    }

    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: FnMut(&E, &mut Context<S, E>) -> Handled + Send + 'static,
    {
        self.event = Some(Box::new(f));
        self
    }
}

impl<S: State, E> Default for Handlers<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E> fmt::Debug for Handlers<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("entry", &self.entry.is_some())
            .field("exit", &self.exit.is_some())
            .field("event", &self.event.is_some())
            .finish()
    }
}

impl<S: State, E> StateHandler<S, E> for Handlers<S, E> {
    fn on_entry(&mut self, ctx: &mut Context<S, E>) {
        if let Some(entry) = self.entry.as_mut() {
            entry(ctx);
        }
    }

    fn on_exit(&mut self, ctx: &mut Context<S, E>) {
        if let Some(exit) = self.exit.as_mut() {
            exit(ctx);
        }
    }

    fn process_event(&mut self, event: &E, ctx: &mut Context<S, E>) -> Handled {
        match self.event.as_mut() {
            Some(handle) => handle(event, ctx),
            None => Handled::No,
        }
    }
}
