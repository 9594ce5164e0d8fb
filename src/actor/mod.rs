//! Thread-per-actor runtime around a [`StateManager`].
//!
//! An [`Actor`] owns a state machine, a mailbox and an event bus. While it is
//! running, the machine lives on a dedicated worker thread that processes one
//! event at a time; producers on any thread only ever touch the mailbox.
//!
//! # Lifecycle
//!
//! - [`Actor::start`] runs the machine's `init` (first start only) and spawns
//!   the worker. Starting a running actor is a no-op.
//! - [`Actor::stop`] drops queued events, wakes the worker with a shutdown
//!   sentinel, joins it and takes the machine back. Stopping a stopped actor
//!   is a no-op.
//! - Dropping a running actor stops it.

mod config;
mod error;
mod worker;

pub use config::{ActorConfig, ConfigError, DEFAULT_MAX_CHAINED_TRANSITIONS};
pub use error::ActorError;
pub use worker::Step;

use crate::bus::{EventBus, Subscription};
use crate::core::{Context, State, StateManager};
use crate::queue::{Envelope, Mailbox};
use parking_lot::Mutex;
use std::fmt::{self, Debug};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

type Handoff<S, E> = Arc<Mutex<Option<(StateManager<S, E>, Context<S, E>)>>>;

enum Slot<S: State, E> {
    Idle(StateManager<S, E>),
    Running(JoinHandle<Option<StateManager<S, E>>>),
    Poisoned,
}

/// A state machine driven by its own worker thread.
///
/// # Example
///
/// ```rust
/// use strata::actor::Actor;
/// use strata::builder::StateMachineBuilder;
/// use strata::core::{Handled, Handlers, Passive};
/// use strata::states;
///
/// states! {
///     enum Switch { Root, Off, On }
/// }
///
/// #[derive(Debug)]
/// struct Toggle;
///
/// let machine = StateMachineBuilder::new(Switch::Root, Passive)
///     .state(Switch::Root, Switch::Off, Handlers::new().on_event(|_: &Toggle, ctx| {
///         ctx.transition_to(Switch::On);
///         Handled::Yes
///     }))
///     .state(Switch::Root, Switch::On, Passive)
///     .initial(Switch::Off)
///     .build()
///     .unwrap();
///
/// let mut actor = Actor::new("switch", machine);
/// actor.start().unwrap();
/// actor.send(Toggle);
/// actor.stop().unwrap();
/// ```
pub struct Actor<S: State, E: Debug + Send + 'static> {
    name: Arc<str>,
    config: ActorConfig,
    mailbox: Mailbox<E>,
    bus: EventBus<E>,
    running: Arc<AtomicBool>,
    slot: Slot<S, E>,
}

impl<S: State, E: Debug + Send + 'static> Actor<S, E> {
    /// Wrap `machine` with the default configuration.
    ///
    /// The machine keeps the history limit it was built with.
    pub fn new(name: impl Into<Arc<str>>, machine: StateManager<S, E>) -> Self {
        Self {
            name: name.into(),
            config: ActorConfig::default(),
            mailbox: Mailbox::new(),
            bus: EventBus::new(),
            running: Arc::new(AtomicBool::new(false)),
            slot: Slot::Idle(machine),
        }
    }

    /// Wrap `machine`, applying `config` including its history limit.
    pub fn with_config(
        name: impl Into<Arc<str>>,
        machine: StateManager<S, E>,
        config: ActorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            mailbox: Mailbox::new(),
            bus: EventBus::new(),
            running: Arc::new(AtomicBool::new(false)),
            slot: Slot::Idle(machine.with_history_limit(config.history_limit)),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Initialize the machine if needed and launch the worker thread.
    pub fn start(&mut self) -> Result<(), ActorError> {
        let mut machine = match mem::replace(&mut self.slot, Slot::Poisoned) {
            Slot::Idle(machine) => machine,
            running @ Slot::Running(_) => {
                self.slot = running;
                warn!(actor = %self.name, "start called on a running actor");
                return Ok(());
            }
            Slot::Poisoned => return Err(ActorError::Poisoned(self.name.to_string())),
        };

        let mut ctx = self.context();
        let max_chained = self.config.max_chained_transitions;
        if !machine.is_initialized() {
            machine.init(&mut ctx);
            worker::settle(&mut machine, &mut ctx, max_chained);
        }

        let mut builder = thread::Builder::new().name(self.config.thread_name(&self.name));
        if let Some(size) = self.config.stack_size {
            builder = builder.stack_size(size);
        }

        // The worker takes the machine out of the handoff; if the spawn fails
        // it is still there to be put back.
        let handoff: Handoff<S, E> = Arc::new(Mutex::new(Some((machine, ctx))));
        let theirs = Arc::clone(&handoff);
        let mailbox = self.mailbox.clone();
        let running = Arc::clone(&self.running);

        self.running.store(true, Ordering::Release);
        let spawned = builder.spawn(move || {
            let taken = theirs.lock().take();
            taken.map(|(machine, ctx)| worker::run(machine, ctx, mailbox, running, max_chained))
        });

        match spawned {
            Ok(handle) => {
                self.slot = Slot::Running(handle);
                info!(actor = %self.name, "actor started");
                Ok(())
            }
            Err(source) => {
                self.running.store(false, Ordering::Release);
                if let Some((machine, _)) = handoff.lock().take() {
                    self.slot = Slot::Idle(machine);
                }
                Err(ActorError::Spawn {
                    actor: self.name.to_string(),
                    source,
                })
            }
        }
    }

    /// Stop the worker and take the machine back.
    ///
    /// Events still queued are dropped. The event being processed when
    /// `stop` is called finishes first.
    pub fn stop(&mut self) -> Result<(), ActorError> {
        let handle = match mem::replace(&mut self.slot, Slot::Poisoned) {
            Slot::Running(handle) => handle,
            other => {
                self.slot = other;
                return Ok(());
            }
        };

        self.running.store(false, Ordering::Release);
        self.mailbox.shutdown();
        let joined = handle.join();
        // The worker may have left on the flag alone, leaving the sentinel queued.
        self.mailbox.discard_pending();

        match joined {
            Ok(Some(machine)) => {
                info!(actor = %self.name, state = machine.current_state().name(), "actor stopped");
                self.slot = Slot::Idle(machine);
                Ok(())
            }
            Ok(None) | Err(_) => {
                error!(actor = %self.name, "worker thread panicked, state machine lost");
                Err(ActorError::WorkerPanicked(self.name.to_string()))
            }
        }
    }

    /// Synchronously process at most one queued event on the calling thread.
    ///
    /// Only valid while the actor is stopped. Initializes the machine on
    /// first use. Returns `Ok(None)` if nothing was queued.
    pub fn run_once(&mut self) -> Result<Option<Step<S>>, ActorError> {
        let mut ctx = self.context();
        let max_chained = self.config.max_chained_transitions;
        let machine = match &mut self.slot {
            Slot::Idle(machine) => machine,
            Slot::Running(_) => return Err(ActorError::Running(self.name.to_string())),
            Slot::Poisoned => return Err(ActorError::Poisoned(self.name.to_string())),
        };

        if !machine.is_initialized() {
            machine.init(&mut ctx);
            worker::settle(machine, &mut ctx, max_chained);
        }

        match self.mailbox.try_recv() {
            Some(Envelope::Event(event)) => {
                Ok(Some(worker::cycle(machine, &event, &mut ctx, max_chained)))
            }
            Some(Envelope::Shutdown) | None => Ok(None),
        }
    }

    /// Enqueue an event for the worker. Safe from any thread, never blocks.
    pub fn send(&self, event: E) {
        self.mailbox.send(event);
    }

    /// Enqueue an event ahead of everything already queued.
    pub fn send_prioritized(&self, event: E) {
        self.mailbox.send_prioritized(event);
    }

    /// Cloneable handle for producers on other threads.
    pub fn mailbox(&self) -> Mailbox<E> {
        self.mailbox.clone()
    }

    pub fn bus(&self) -> &EventBus<E> {
        &self.bus
    }

    /// Subscribe to events this actor's handlers emit.
    ///
    /// The handler runs synchronously on the emitting thread.
    pub fn connect<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.bus.connect(handler)
    }

    /// Forward every event this actor emits into `target`.
    pub fn connect_mailbox(&self, target: Mailbox<E>) -> Subscription
    where
        E: Clone,
    {
        self.bus.connect(move |event: &E| target.send(event.clone()))
    }

    pub fn is_running(&self) -> bool {
        matches!(self.slot, Slot::Running(_))
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self.slot, Slot::Poisoned)
    }

    /// Current state, or `None` while the worker owns the machine.
    pub fn current_state(&self) -> Option<S> {
        self.with_machine(StateManager::current_state)
    }

    /// Inspect the machine while the actor is stopped.
    pub fn with_machine<R>(&self, f: impl FnOnce(&StateManager<S, E>) -> R) -> Option<R> {
        match &self.slot {
            Slot::Idle(machine) => Some(f(machine)),
            Slot::Running(_) | Slot::Poisoned => None,
        }
    }

    fn context(&self) -> Context<S, E> {
        Context::new(Arc::clone(&self.name), self.bus.clone(), self.mailbox.clone())
    }
}

impl<S: State, E: Debug + Send + 'static> Drop for Actor<S, E> {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(err) = self.stop() {
                warn!(actor = %self.name, error = %err, "actor stopped with error on drop");
            }
        }
    }
}

impl<S: State, E: Debug + Send + 'static> fmt::Debug for Actor<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .field("state", &self.current_state())
            .field("mailbox", &self.mailbox)
            .finish()
    }
}
