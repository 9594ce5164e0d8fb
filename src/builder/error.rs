//! Build errors for state trees and state machines.

use thiserror::Error;

/// Errors that can occur when building a state tree or machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Parent state {parent} of {child} is not in the tree. Add the parent first")]
    UnknownParent { parent: String, child: String },

    #[error("State {0} was added to the tree more than once")]
    DuplicateState(String),

    #[error("State {0} is not in the tree")]
    UnknownState(String),

    #[error("The root state {0} cannot be the initial state")]
    InitialIsRoot(String),
}
