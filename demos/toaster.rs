//! Interactive toaster oven driven one event at a time.
//!
//! The actor is never started: each event number typed on stdin is queued
//! and processed on the main thread with [`Actor::run_once`].
//!
//! ```text
//! 0 DoorOpen   1 DoorClose   2 DoToasting   3 DoBaking   4 Timeout   5 Shutdown
//! -1 quits
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --example toaster
//! ```

use std::io::{self, BufRead, Write};
use strata::actor::Actor;
use strata::builder::{BuildError, StateMachineBuilder};
use strata::core::{Context, Dispatch, Handled, State, StateHandler, StateManager};
use strata::states;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Debug)]
enum Command {
    DoorOpen,
    DoorClose,
    DoToasting { timeout_ms: u64 },
    DoBaking { temperature: f32 },
    Timeout,
    Shutdown,
}

states! {
    enum Oven { Root, Heating, DoorOpen, Toasting, Baking }
}

type Ctx = Context<Oven, Command>;

struct Root;

impl StateHandler<Oven, Command> for Root {
    fn process_event(&mut self, command: &Command, _ctx: &mut Ctx) -> Handled {
        warn!(?command, "ignored");
        Handled::Yes
    }
}

struct Heating;

impl StateHandler<Oven, Command> for Heating {
    fn on_entry(&mut self, _ctx: &mut Ctx) {
        info!("heater on");
    }

    fn on_exit(&mut self, _ctx: &mut Ctx) {
        info!("heater off");
    }

    fn process_event(&mut self, command: &Command, ctx: &mut Ctx) -> Handled {
        match command {
            Command::DoorOpen => ctx.transition_to(Oven::DoorOpen),
            Command::DoToasting { timeout_ms } => {
                info!(timeout_ms, "toasting requested");
                ctx.transition_to(Oven::Toasting);
            }
            Command::DoBaking { temperature } => {
                info!(temperature, "baking requested");
                ctx.transition_to(Oven::Baking);
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }
}

struct DoorOpen;

impl StateHandler<Oven, Command> for DoorOpen {
    fn on_entry(&mut self, _ctx: &mut Ctx) {
        info!("internal lamp on");
    }

    fn on_exit(&mut self, _ctx: &mut Ctx) {
        info!("internal lamp off");
    }

    fn process_event(&mut self, command: &Command, ctx: &mut Ctx) -> Handled {
        match command {
            Command::DoorClose => {
                ctx.transition_to(Oven::Heating);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

struct Toasting;

impl StateHandler<Oven, Command> for Toasting {
    fn on_entry(&mut self, _ctx: &mut Ctx) {
        info!("time event armed");
    }

    fn on_exit(&mut self, _ctx: &mut Ctx) {
        info!("time event disarmed");
    }

    fn process_event(&mut self, command: &Command, ctx: &mut Ctx) -> Handled {
        match command {
            Command::Timeout => {
                ctx.transition_to(Oven::Heating);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

struct Baking;

impl StateHandler<Oven, Command> for Baking {
    fn on_entry(&mut self, _ctx: &mut Ctx) {
        info!("temperature set");
    }

    fn on_exit(&mut self, _ctx: &mut Ctx) {
        info!("temperature reset");
    }

    /// Baking runs to completion; nothing leaves it, not even the door.
    fn process_event(&mut self, command: &Command, _ctx: &mut Ctx) -> Handled {
        info!(?command, "baking, ignored");
        Handled::Yes
    }
}

fn event_for(choice: i64) -> Option<Command> {
    match choice {
        0 => Some(Command::DoorOpen),
        1 => Some(Command::DoorClose),
        2 => Some(Command::DoToasting { timeout_ms: 60_000 }),
        3 => Some(Command::DoBaking { temperature: 140.0 }),
        4 => Some(Command::Timeout),
        5 => Some(Command::Shutdown),
        _ => None,
    }
}

fn oven() -> Result<StateManager<Oven, Command>, BuildError> {
    StateMachineBuilder::new(Oven::Root, Root)
        .state(Oven::Root, Oven::Heating, Heating)
        .state(Oven::Root, Oven::DoorOpen, DoorOpen)
        .state(Oven::Heating, Oven::Toasting, Toasting)
        .state(Oven::Heating, Oven::Baking, Baking)
        .initial(Oven::Heating)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut toaster = Actor::new("toaster", oven()?);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter event number: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let choice = match line?.trim().parse::<i64>() {
            Ok(-1) => break,
            Ok(choice) => choice,
            Err(_) => {
                println!("Invalid choice. Try again.");
                continue;
            }
        };
        let Some(command) = event_for(choice) else {
            println!("Invalid choice. Try again.");
            continue;
        };

        toaster.send(command);
        if let Some(step) = toaster.run_once()? {
            if let Dispatch::Handled { by, depth } = step.dispatch {
                info!(by = by.name(), depth, transitions = step.transitions, "processed");
            }
        }
        if let Some(state) = toaster.current_state() {
            println!("Current state: {}", state.name());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(commands: &[Command]) -> Oven {
        let mut toaster = Actor::new("toaster", oven().unwrap());
        for command in commands {
            toaster.send(command.clone());
            toaster.run_once().unwrap();
        }
        toaster.current_state().unwrap()
    }

    #[test]
    fn baking_ignores_the_door() {
        let state = drive(&[Command::DoBaking { temperature: 140.0 }, Command::DoorOpen]);
        assert_eq!(state, Oven::Baking);
    }

    #[test]
    fn toasting_returns_to_heating_on_timeout() {
        let state = drive(&[Command::DoToasting { timeout_ms: 10 }, Command::Timeout]);
        assert_eq!(state, Oven::Heating);
    }

    #[test]
    fn door_opens_from_heating_and_closes_back() {
        assert_eq!(drive(&[Command::DoorOpen]), Oven::DoorOpen);
        assert_eq!(drive(&[Command::DoorOpen, Command::DoorClose]), Oven::Heating);
    }
}
