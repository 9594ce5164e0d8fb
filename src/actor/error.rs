//! Actor lifecycle errors.

use thiserror::Error;

/// Errors that can occur while starting, stopping or stepping an actor.
#[derive(Debug, Error)]
pub enum ActorError {
    /// The worker thread could not be spawned
    #[error("Failed to spawn worker thread for actor {actor}: {source}")]
    Spawn {
        actor: String,
        #[source]
        source: std::io::Error,
    },

    /// A state handler panicked on the worker thread; the machine is lost
    #[error("Worker thread of actor {0} panicked")]
    WorkerPanicked(String),

    /// The actor lost its state machine to an earlier worker panic
    #[error("Actor {0} is poisoned by an earlier worker panic")]
    Poisoned(String),

    /// The operation needs a stopped actor
    #[error("Actor {0} is running; stop it first")]
    Running(String),
}
