//! Transition and dispatch algorithms over a [`StateTree`].

use super::context::Context;
use super::handler::Handled;
use super::history::{StateHistory, StateTransition, TransitionKind};
use super::state::State;
use super::tree::{NodeIndex, StateTree};
use crate::builder::BuildError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use tracing::debug;

/// Outcome of offering one event to the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch<S: State> {
    /// A state consumed the event. `depth` counts how many levels it bubbled.
    Handled { by: S, depth: usize },
    /// No state, including the root, handled the event.
    Dropped,
}

impl<S: State> Dispatch<S> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }
}

/// Counters describing what the manager has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Events offered through `process_event`
    pub events: u64,
    /// Events handled by an ancestor rather than the current state
    pub bubbled: u64,
    /// Events nobody handled
    pub dropped: u64,
    /// Transitions applied, self-transitions included
    pub transitions: u64,
}

/// Owns a [`StateTree`] and the cursor to the current state.
///
/// The manager is single-writer: it is driven by exactly one thread (the
/// actor worker) and needs no internal locking.
pub struct StateManager<S: State, E> {
    tree: StateTree<S, E>,
    current: NodeIndex,
    initialized: bool,
    history: StateHistory<S>,
    stats: DispatchStats,
}

impl<S: State, E: Debug> StateManager<S, E> {
    /// Wrap a finished tree, placing the cursor on `initial`.
    ///
    /// Fails if `initial` is not in the tree or is the root.
    pub fn new(tree: StateTree<S, E>, initial: S) -> Result<Self, BuildError> {
        let current = tree
            .index_of(initial)
            .ok_or_else(|| BuildError::UnknownState(format!("{initial:?}")))?;
        if current == tree.root() {
            return Err(BuildError::InitialIsRoot(format!("{initial:?}")));
        }
        Ok(Self {
            tree,
            current,
            initialized: false,
            history: StateHistory::new(),
            stats: DispatchStats::default(),
        })
    }

    /// Replace the history buffer with one keeping at most `limit` records.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = StateHistory::with_limit(limit);
        self
    }

    /// Run `on_entry` of the initial state.
    ///
    /// Ancestors of the initial state are not entered.
    pub fn init(&mut self, ctx: &mut Context<S, E>) {
        debug!(actor = ctx.actor_name(), state = self.current_state().name(), "init");
        self.tree.handler_mut(self.current).on_entry(ctx);
        self.initialized = true;
    }

    /// Move the cursor to `target`, running exit and entry handlers.
    ///
    /// Exits run child to parent up to, not including, the least common
    /// ancestor; entries run parent to child from below it down to `target`.
    /// A transition to the current state exits and re-enters it.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not part of the tree or is the root state. Both
    /// indicate a construction bug rather than a runtime condition.
    pub fn transition_to(&mut self, target: S, ctx: &mut Context<S, E>) {
        let target_node = match self.tree.index_of(target) {
            Some(node) if node != self.tree.root() => node,
            Some(_) => panic!("cannot transition to the root state {target:?}"),
            None => panic!("transition target {target:?} is not part of the state tree"),
        };
        let from = self.current_state();

        if target_node == self.current {
            self.tree.handler_mut(self.current).on_exit(ctx);
            self.tree.handler_mut(self.current).on_entry(ctx);
            self.finish_transition(
                from,
                target,
                TransitionKind::SelfTransition,
                vec![from],
                vec![target],
                ctx,
            );
            return;
        }

        let source_chain = self.tree.path_to_root(self.current);
        let mut target_chain = self.tree.path_to_root(target_node);
        target_chain.reverse();

        let mut exited = Vec::new();
        let mut lca_position = None;
        for node in source_chain {
            if let Some(position) = target_chain.iter().position(|n| *n == node) {
                lca_position = Some(position);
                break;
            }
            self.tree.handler_mut(node).on_exit(ctx);
            exited.push(self.tree.state(node));
        }

        let first_entry = lca_position.map_or(0, |position| position + 1);
        let mut entered = Vec::with_capacity(target_chain.len() - first_entry);
        for &node in &target_chain[first_entry..] {
            self.tree.handler_mut(node).on_entry(ctx);
            entered.push(self.tree.state(node));
        }

        self.current = target_node;
        self.finish_transition(from, target, TransitionKind::External, exited, entered, ctx);
    }

    fn finish_transition(
        &mut self,
        from: S,
        to: S,
        kind: TransitionKind,
        exited: Vec<S>,
        entered: Vec<S>,
        ctx: &Context<S, E>,
    ) {
        debug!(
            actor = ctx.actor_name(),
            from = from.name(),
            to = to.name(),
            ?kind,
            "transition"
        );
        self.stats.transitions += 1;
        self.history.record(StateTransition {
            from,
            to,
            kind,
            exited,
            entered,
            timestamp: Utc::now(),
        });
    }

    /// Offer `event` to the current state, then to each ancestor in turn.
    ///
    /// Bubbling stops at the first state returning [`Handled::Yes`]; the
    /// root is offered the event last. An event the root does not handle is
    /// dropped and counted.
    pub fn process_event(&mut self, event: &E, ctx: &mut Context<S, E>) -> Dispatch<S> {
        self.stats.events += 1;

        let mut node = self.current;
        let mut depth = 0;
        loop {
            if self.tree.handler_mut(node).process_event(event, ctx) == Handled::Yes {
                if depth > 0 {
                    self.stats.bubbled += 1;
                }
                let by = self.tree.state(node);
                debug!(actor = ctx.actor_name(), ?event, by = by.name(), depth, "event handled");
                return Dispatch::Handled { by, depth };
            }
            match self.tree.parent(node) {
                Some(parent) => {
                    node = parent;
                    depth += 1;
                }
                None => break,
            }
        }

        self.stats.dropped += 1;
        debug!(
            actor = ctx.actor_name(),
            ?event,
            state = self.current_state().name(),
            "event unhandled, dropped"
        );
        Dispatch::Dropped
    }
}

impl<S: State, E> StateManager<S, E> {
    pub fn current_state(&self) -> S {
        self.tree.state(self.current)
    }

    /// Returns `true` if `state` is the current state or one of its ancestors.
    pub fn is_in(&self, state: S) -> bool {
        match self.tree.index_of(state) {
            Some(node) if node == self.tree.root() => true,
            Some(node) => self.tree.path_to_root(self.current).contains(&node),
            None => false,
        }
    }

    /// Current state followed by its ancestors, excluding the root.
    pub fn active_path(&self) -> Vec<S> {
        self.tree
            .path_to_root(self.current)
            .into_iter()
            .map(|node| self.tree.state(node))
            .collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn tree(&self) -> &StateTree<S, E> {
        &self.tree
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

impl<S: State, E> fmt::Debug for StateManager<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("current", &self.current_state())
            .field("initialized", &self.initialized)
            .field("stats", &self.stats)
            .finish()
    }
}
