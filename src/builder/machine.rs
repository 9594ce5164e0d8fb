//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, StateHandler, StateManager, StateTree, DEFAULT_HISTORY_LIMIT};
use std::fmt::Debug;

/// Builder for constructing a [`StateManager`] with a fluent API.
///
/// Errors from adding states are deferred: the first one is reported by
/// [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use strata::builder::StateMachineBuilder;
/// use strata::core::Passive;
/// use strata::states;
///
/// states! {
///     enum Toaster { Root, Heating, Toasting, DoorOpen }
/// }
///
/// let machine = StateMachineBuilder::<Toaster, ()>::new(Toaster::Root, Passive)
///     .state(Toaster::Root, Toaster::Heating, Passive)
///     .state(Toaster::Heating, Toaster::Toasting, Passive)
///     .state(Toaster::Root, Toaster::DoorOpen, Passive)
///     .initial(Toaster::Heating)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), Toaster::Heating);
/// ```
pub struct StateMachineBuilder<S: State, E> {
    tree: StateTree<S, E>,
    initial: Option<S>,
    history_limit: usize,
    error: Option<BuildError>,
}

impl<S: State, E: Debug> StateMachineBuilder<S, E> {
    /// Start a tree rooted at `root`.
    pub fn new(root: S, handler: impl StateHandler<S, E> + 'static) -> Self {
        Self {
            tree: StateTree::new(root, handler),
            initial: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            error: None,
        }
    }

    /// Add `id` as a substate of `parent`.
    pub fn state(mut self, parent: S, id: S, handler: impl StateHandler<S, E> + 'static) -> Self {
        if self.error.is_none() {
            if let Err(error) = self.tree.append_boxed(parent, id, Box::new(handler)) {
                self.error = Some(error);
            }
        }
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Number of transitions the machine keeps in its history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the state machine.
    /// Returns the first error encountered while adding states, or an error
    /// if the initial state is missing or invalid.
    pub fn build(self) -> Result<StateManager<S, E>, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        Ok(StateManager::new(self.tree, initial)?.with_history_limit(self.history_limit))
    }
}
