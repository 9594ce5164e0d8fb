//! Hierarchical state machine core.
//!
//! This module contains the single-threaded engine driven by an actor worker:
//! - State identifiers via the `State` trait
//! - State behavior via the `StateHandler` trait
//! - The arena-backed `StateTree`
//! - The `StateManager` implementing transitions and event bubbling
//! - Bounded transition history
//!
//! Nothing in this module locks; a manager is owned by exactly one thread
//! at a time.

mod context;
mod handler;
mod history;
mod manager;
mod state;
mod tree;

pub use context::Context;
pub use handler::{Handled, Handlers, Passive, StateHandler};
pub use history::{StateHistory, StateTransition, TransitionKind, DEFAULT_HISTORY_LIMIT};
pub use manager::{Dispatch, DispatchStats, StateManager};
pub use state::State;
pub use tree::{NodeIndex, StateTree};
