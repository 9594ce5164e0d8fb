//! State transition history tracking.
//!
//! Every transition applied by a [`StateManager`](super::StateManager) is
//! recorded with the states it exited and entered. The history is bounded so
//! that long-running actors do not grow without limit; the oldest records are
//! evicted first.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions kept by a [`StateHistory`].
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// How a transition moved through the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Target equal to the current state: exit then re-enter it.
    SelfTransition,
    /// Any other move, exiting up to and entering down from the common ancestor.
    External,
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use strata::core::{StateTransition, TransitionKind};
/// use strata::states;
/// use chrono::Utc;
///
/// states! {
///     enum Phase { Root, Idle, Running }
/// }
///
/// let transition = StateTransition {
///     from: Phase::Idle,
///     to: Phase::Running,
///     kind: TransitionKind::External,
///     exited: vec![Phase::Idle],
///     entered: vec![Phase::Running],
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.exited.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    pub kind: TransitionKind,
    /// States whose `on_exit` ran, in call order (child to parent)
    pub exited: Vec<S>,
    /// States whose `on_entry` ran, in call order (parent to child)
    pub entered: Vec<S>,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of state transitions.
///
/// # Example
///
/// ```rust
/// use strata::core::{StateHistory, StateTransition, TransitionKind};
/// use strata::states;
/// use chrono::Utc;
///
/// states! {
///     enum Step { Root, Start, Middle, End }
/// }
///
/// let mut history = StateHistory::with_limit(8);
/// for (from, to) in [(Step::Start, Step::Middle), (Step::Middle, Step::End)] {
///     history.record(StateTransition {
///         from,
///         to,
///         kind: TransitionKind::External,
///         exited: vec![from],
///         entered: vec![to],
///         timestamp: Utc::now(),
///     });
/// }
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Step::Start, &Step::Middle, &Step::End]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history keeping [`DEFAULT_HISTORY_LIMIT`] records.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history keeping at most `limit` records.
    ///
    /// A limit of zero disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.limit == 0 {
            return;
        }
        while self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained record, then the `to`
    /// state of each record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the oldest and newest retained records.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S>> + '_ {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
