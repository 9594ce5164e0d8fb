//! The serial processing loop run on each actor's worker thread.

use crate::core::{Context, Dispatch, State, StateManager};
use crate::queue::{Envelope, Mailbox};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info_span, warn};

/// What one processing cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step<S: State> {
    pub dispatch: Dispatch<S>,
    /// Transitions applied after dispatch, chained ones included
    pub transitions: usize,
}

/// Apply pending transition requests until none is left.
///
/// Entry and exit handlers may request a further transition; those are
/// applied back to back, at most `max_chained` of them after the first.
pub(crate) fn settle<S, E>(
    machine: &mut StateManager<S, E>,
    ctx: &mut Context<S, E>,
    max_chained: usize,
) -> usize
where
    S: State,
    E: Debug,
{
    let mut applied = 0;
    while let Some(target) = ctx.take_pending() {
        if applied > max_chained {
            warn!(
                actor = ctx.actor_name(),
                target = target.name(),
                max_chained,
                "chained transition limit reached, request dropped"
            );
            break;
        }
        machine.transition_to(target, ctx);
        applied += 1;
    }
    applied
}

/// Dispatch one event and apply whatever transition it requested.
pub(crate) fn cycle<S, E>(
    machine: &mut StateManager<S, E>,
    event: &E,
    ctx: &mut Context<S, E>,
    max_chained: usize,
) -> Step<S>
where
    S: State,
    E: Debug,
{
    let dispatch = machine.process_event(event, ctx);
    let transitions = settle(machine, ctx, max_chained);
    Step {
        dispatch,
        transitions,
    }
}

/// Worker body: process events until the running flag drops or the
/// shutdown sentinel arrives, then hand the machine back.
pub(crate) fn run<S, E>(
    mut machine: StateManager<S, E>,
    mut ctx: Context<S, E>,
    mailbox: Mailbox<E>,
    running: Arc<AtomicBool>,
    max_chained: usize,
) -> StateManager<S, E>
where
    S: State,
    E: Debug,
{
    let span = info_span!("actor", name = ctx.actor_name());
    let _entered = span.enter();
    debug!(state = machine.current_state().name(), "worker started");

    while running.load(Ordering::Acquire) {
        match mailbox.recv() {
            Envelope::Event(event) => {
                cycle(&mut machine, &event, &mut ctx, max_chained);
            }
            Envelope::Shutdown => break,
        }
    }

    debug!(state = machine.current_state().name(), "worker stopped");
    machine
}
