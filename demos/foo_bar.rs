//! Two actors feeding each other through their event buses.
//!
//! `Foo` walks A -> G -> E -> A on `Green` events and announces every stop
//! with a `Blue` event. `Bar` cycles One -> Two -> Three on `Blue` events and
//! answers with `Green` payloads. Each actor's bus is wired into the other's
//! mailbox, so the pair keeps itself busy until stopped.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example foo_bar            # runs for 15 seconds
//! cargo run --example foo_bar -- 3       # runs for 3 seconds
//! RUST_LOG=debug cargo run --example foo_bar
//! ```

use std::thread;
use std::time::Duration;
use strata::actor::Actor;
use strata::builder::{BuildError, StateMachineBuilder};
use strata::core::{Handled, Handlers, State, StateManager};
use strata::states;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
enum Evt {
    Blue { timeout: u32 },
    Green(Vec<i32>),
}

states! {
    enum Foo { Root, A, B, C, D, E, F, G }
}

states! {
    enum Bar { Root, One, Two, Three }
}

/// Logs entry and exit, handles nothing.
fn quiet<S: State>(state: S) -> Handlers<S, Evt> {
    Handlers::new()
        .on_entry(move |ctx| info!(actor = ctx.actor_name(), state = state.name(), "entry"))
        .on_exit(move |ctx| info!(actor = ctx.actor_name(), state = state.name(), "exit"))
}

/// A state that announces itself with `Blue { timeout }` and moves to
/// `next` when a `Green` payload arrives.
fn announcing(state: Foo, timeout: u32, next: Foo) -> Handlers<Foo, Evt> {
    quiet(state)
        .on_entry(move |ctx| {
            info!(state = state.name(), "entry");
            thread::sleep(DELAY);
            ctx.emit(Evt::Blue { timeout });
        })
        .on_event(move |event, ctx| match event {
            Evt::Green(data) => {
                thread::sleep(DELAY);
                info!(state = state.name(), ?data, "green payload");
                ctx.transition_to(next);
                Handled::Yes
            }
            Evt::Blue { .. } => Handled::from(state == Foo::A),
        })
}

fn foo_machine() -> Result<StateManager<Foo, Evt>, BuildError> {
    StateMachineBuilder::new(Foo::Root, quiet(Foo::Root))
        .state(Foo::Root, Foo::A, announcing(Foo::A, 11, Foo::G))
        .state(Foo::A, Foo::C, quiet(Foo::C))
        .state(Foo::A, Foo::D, quiet(Foo::D))
        .state(Foo::D, Foo::F, quiet(Foo::F))
        .state(Foo::F, Foo::G, announcing(Foo::G, 22, Foo::E))
        .state(Foo::Root, Foo::B, quiet(Foo::B))
        .state(Foo::B, Foo::E, announcing(Foo::E, 33, Foo::A))
        .initial(Foo::A)
        .build()
}

/// A state that moves to `next` on any `Blue` event.
fn relay(state: Bar, next: Bar) -> Handlers<Bar, Evt> {
    quiet(state).on_event(move |event, ctx| match event {
        Evt::Blue { timeout } => {
            thread::sleep(DELAY);
            info!(state = state.name(), timeout, "blue payload");
            ctx.transition_to(next);
            Handled::Yes
        }
        Evt::Green(_) => Handled::No,
    })
}

fn bar_machine() -> Result<StateManager<Bar, Evt>, BuildError> {
    let two = relay(Bar::Two, Bar::Three).on_entry(|ctx| {
        thread::sleep(DELAY);
        ctx.emit(Evt::Green(vec![1, 2, 3]));
    });
    let three = relay(Bar::Three, Bar::One)
        .on_entry(|ctx| {
            thread::sleep(DELAY);
            ctx.emit(Evt::Green(vec![4, 5, 6]));
        })
        .on_exit(|ctx| {
            thread::sleep(DELAY);
            ctx.emit(Evt::Green(vec![7, 8, 9]));
        });

    StateMachineBuilder::new(Bar::Root, quiet(Bar::Root))
        .state(Bar::Root, Bar::One, relay(Bar::One, Bar::Two))
        .state(Bar::Root, Bar::Two, two)
        .state(Bar::One, Bar::Three, three)
        .initial(Bar::One)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 15,
    };

    let mut foo = Actor::new("foo", foo_machine()?);
    let mut bar = Actor::new("bar", bar_machine()?);
    let _foo_to_bar = foo.connect_mailbox(bar.mailbox());
    let _bar_to_foo = bar.connect_mailbox(foo.mailbox());

    foo.start()?;
    thread::sleep(DELAY);
    bar.start()?;

    thread::sleep(Duration::from_secs(seconds));

    foo.stop()?;
    thread::sleep(DELAY);
    bar.stop()?;

    info!(
        foo = ?foo.current_state(),
        bar = ?bar.current_state(),
        "demo finished"
    );
    Ok(())
}
