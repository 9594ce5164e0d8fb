//! Property-based tests for the transition, bubbling and queue algorithms.
//!
//! These tests use proptest to check the engine against small reference
//! models over randomly generated state trees and operation sequences.

use parking_lot::Mutex;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use strata::core::{
    Context, Dispatch, Handled, State, StateHandler, StateHistory, StateManager, StateTransition,
    StateTree, TransitionKind,
};
use strata::queue::EventQueue;

const MAX_STATES: usize = 12;
const NAMES: [&str; MAX_STATES] = [
    "S0", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8", "S9", "S10", "S11",
];

/// State number `n`; `Id(0)` is always the root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
struct Id(u8);

impl State for Id {
    fn name(&self) -> &str {
        NAMES[self.0 as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Entry(Id),
    Exit(Id),
    Event(Id),
}

type Log = Arc<Mutex<Vec<Call>>>;

struct Recorder {
    id: Id,
    handles: bool,
    log: Log,
}

impl StateHandler<Id, ()> for Recorder {
    fn on_entry(&mut self, _ctx: &mut Context<Id, ()>) {
        self.log.lock().push(Call::Entry(self.id));
    }

    fn on_exit(&mut self, _ctx: &mut Context<Id, ()>) {
        self.log.lock().push(Call::Exit(self.id));
    }

    fn process_event(&mut self, _event: &(), _ctx: &mut Context<Id, ()>) -> Handled {
        self.log.lock().push(Call::Event(self.id));
        Handled::from(self.handles)
    }
}

/// `parents[i]` is the parent of state `i + 1`, always a lower-numbered state.
fn arbitrary_parents() -> impl Strategy<Value = Vec<u8>> {
    (2..MAX_STATES).prop_flat_map(|len| {
        (1..len)
            .map(|child| (0..child as u8).boxed())
            .collect::<Vec<_>>()
    })
}

fn build(parents: &[u8], initial: Id, handling: &[bool]) -> (StateManager<Id, ()>, Log) {
    let log: Log = Arc::default();
    let recorder = |id: Id| Recorder {
        id,
        handles: handling.get(id.0 as usize).copied().unwrap_or(false),
        log: Arc::clone(&log),
    };

    let mut tree = StateTree::new(Id(0), recorder(Id(0)));
    for (offset, parent) in parents.iter().enumerate() {
        let child = Id(offset as u8 + 1);
        tree.append_child(Id(*parent), child, recorder(child)).unwrap();
    }
    (StateManager::new(tree, initial).unwrap(), log)
}

/// Reference model: `state` and its ancestors, leaf first, root excluded.
fn chain(parents: &[u8], state: Id) -> Vec<Id> {
    let mut path = Vec::new();
    let mut cursor = state.0;
    while cursor != 0 {
        path.push(Id(cursor));
        cursor = parents[cursor as usize - 1];
    }
    path
}

fn expected_calls(parents: &[u8], from: Id, to: Id) -> Vec<Call> {
    if from == to {
        return vec![Call::Exit(from), Call::Entry(from)];
    }
    let target_chain = chain(parents, to);
    let mut calls = Vec::new();
    let mut lca = None;
    for node in chain(parents, from) {
        if target_chain.contains(&node) {
            lca = Some(node);
            break;
        }
        calls.push(Call::Exit(node));
    }
    let entries = target_chain
        .iter()
        .take_while(|node| Some(**node) != lca)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|node| Call::Entry(*node));
    calls.extend(entries);
    calls
}

fn tree_with_pair() -> impl Strategy<Value = (Vec<u8>, Id, Id)> {
    arbitrary_parents().prop_flat_map(|parents| {
        let states = parents.len() as u8 + 1;
        (Just(parents), 1..states, 1..states)
            .prop_map(|(parents, from, to)| (parents, Id(from), Id(to)))
    })
}

#[derive(Clone, Debug)]
enum QueueOp {
    Put(u16),
    PutPrioritized(u16),
    Pop,
    Clear,
}

fn arbitrary_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        4 => any::<u16>().prop_map(QueueOp::Put),
        2 => any::<u16>().prop_map(QueueOp::PutPrioritized),
        3 => Just(QueueOp::Pop),
        1 => Just(QueueOp::Clear),
    ]
}

proptest! {
    #[test]
    fn transition_exits_and_enters_around_common_ancestor((parents, from, to) in tree_with_pair()) {
        let (mut machine, log) = build(&parents, from, &[]);
        let mut ctx = Context::detached("prop");

        machine.transition_to(to, &mut ctx);

        prop_assert_eq!(log.lock().clone(), expected_calls(&parents, from, to));
        prop_assert_eq!(machine.current_state(), to);
    }

    #[test]
    fn transition_history_matches_handler_calls((parents, from, to) in tree_with_pair()) {
        let (mut machine, log) = build(&parents, from, &[]);
        let mut ctx = Context::detached("prop");

        machine.transition_to(to, &mut ctx);

        let record = machine.history().last().cloned().unwrap();
        let exits: Vec<_> = log.lock().iter().filter_map(|c| match c {
            Call::Exit(id) => Some(*id),
            _ => None,
        }).collect();
        let entries: Vec<_> = log.lock().iter().filter_map(|c| match c {
            Call::Entry(id) => Some(*id),
            _ => None,
        }).collect();
        prop_assert_eq!(record.exited, exits);
        prop_assert_eq!(record.entered, entries);
        let expected_kind = if from == to {
            TransitionKind::SelfTransition
        } else {
            TransitionKind::External
        };
        prop_assert_eq!(record.kind, expected_kind);
    }

    #[test]
    fn event_is_handled_by_nearest_willing_state(
        (parents, current, _) in tree_with_pair(),
        handling in prop::collection::vec(any::<bool>(), MAX_STATES),
    ) {
        let (mut machine, log) = build(&parents, current, &handling);
        let mut ctx = Context::detached("prop");

        let outcome = machine.process_event(&(), &mut ctx);

        let mut offered = chain(&parents, current);
        offered.push(Id(0));
        let handler = offered.iter().position(|id| handling[id.0 as usize]);
        match handler {
            Some(depth) => {
                prop_assert_eq!(outcome, Dispatch::Handled { by: offered[depth], depth });
                offered.truncate(depth + 1);
            }
            None => prop_assert_eq!(outcome, Dispatch::Dropped),
        }
        let expected: Vec<_> = offered.into_iter().map(Call::Event).collect();
        prop_assert_eq!(log.lock().clone(), expected);
    }

    #[test]
    fn queue_matches_deque_model(ops in prop::collection::vec(arbitrary_op(), 0..64)) {
        let queue = EventQueue::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Put(v) => {
                    queue.put(v);
                    model.push_back(v);
                }
                QueueOp::PutPrioritized(v) => {
                    queue.put_prioritized(v);
                    model.push_front(v);
                }
                QueueOp::Pop => prop_assert_eq!(queue.try_pop(), model.pop_front()),
                QueueOp::Clear => {
                    queue.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(queue.len(), model.len());
        }
    }

    #[test]
    fn history_keeps_newest_records_within_limit(
        limit in 0usize..6,
        targets in prop::collection::vec(1u8..4, 0..12),
    ) {
        let mut history = StateHistory::with_limit(limit);
        let mut from = Id(1);
        for target in &targets {
            history.record(StateTransition {
                from,
                to: Id(*target),
                kind: TransitionKind::External,
                exited: vec![from],
                entered: vec![Id(*target)],
                timestamp: chrono::Utc::now(),
            });
            from = Id(*target);
        }

        prop_assert_eq!(history.len(), targets.len().min(limit));
        let kept: Vec<_> = history.transitions().map(|t| t.to).collect();
        let expected: Vec<_> = targets[targets.len() - history.len()..]
            .iter()
            .map(|t| Id(*t))
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn state_roundtrip_serialization(n in 0u8..MAX_STATES as u8) {
        let json = serde_json::to_string(&Id(n)).unwrap();
        let deserialized: Id = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(Id(n), deserialized);
    }
}
