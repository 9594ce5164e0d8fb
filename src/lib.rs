//! Strata: hierarchical state machines driven by thread-per-actor event queues
//!
//! Each actor owns a tree of nested states and processes events serially on a
//! dedicated worker thread. Events a state does not handle bubble up to its
//! superstates, and transitions run exit and entry handlers for every state
//! crossed between the current state and the target.
//!
//! # Core Concepts
//!
//! - **State**: Identifier enum for the states of one hierarchy (`states!`)
//! - **StateHandler**: Entry, exit and event behavior attached to a state
//! - **StateManager**: Transition (least common ancestor) and bubbling algorithms
//! - **EventQueue**: Blocking thread-safe queue with priority insertion
//! - **Actor**: Worker thread, mailbox and event bus around a state manager
//!
//! # Example
//!
//! ```rust
//! use strata::builder::StateMachineBuilder;
//! use strata::core::{Context, Handled, Handlers, Passive};
//! use strata::states;
//!
//! states! {
//!     pub enum Toaster { Root, Heating, Toasting, DoorOpen }
//! }
//!
//! #[derive(Debug)]
//! enum Command { OpenDoor, Toast }
//!
//! let mut machine = StateMachineBuilder::new(Toaster::Root, Passive)
//!     .state(Toaster::Root, Toaster::Heating, Handlers::new().on_event(|cmd: &Command, ctx| {
//!         match cmd {
//!             Command::OpenDoor => ctx.transition_to(Toaster::DoorOpen),
//!             Command::Toast => ctx.transition_to(Toaster::Toasting),
//!         }
//!         Handled::Yes
//!     }))
//!     .state(Toaster::Heating, Toaster::Toasting, Passive)
//!     .state(Toaster::Root, Toaster::DoorOpen, Passive)
//!     .initial(Toaster::Heating)
//!     .build()
//!     .unwrap();
//!
//! let mut ctx = Context::detached("toaster");
//! machine.init(&mut ctx);
//! machine.process_event(&Command::Toast, &mut ctx);
//! if let Some(next) = ctx.take_pending() {
//!     machine.transition_to(next, &mut ctx);
//! }
//! assert_eq!(machine.current_state(), Toaster::Toasting);
//! ```

pub mod actor;
pub mod builder;
pub mod bus;
pub mod core;
pub mod queue;

// Re-export commonly used types
pub use actor::{Actor, ActorConfig, ActorError};
pub use builder::{BuildError, StateMachineBuilder};
pub use bus::{EventBus, Subscription};
pub use crate::core::{Context, Dispatch, Handled, Handlers, State, StateHandler, StateManager, StateTree};
pub use queue::{EventQueue, Mailbox, PopResult};
