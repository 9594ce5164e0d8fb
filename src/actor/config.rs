//! Actor configuration.

use crate::core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on transitions chained from entry/exit handlers.
pub const DEFAULT_MAX_CHAINED_TRANSITIONS: usize = 16;

/// Errors that can occur while loading an [`ActorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid actor configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for one actor. Every field has a default, so partial documents
/// are accepted.
///
/// # Example
///
/// ```rust
/// use strata::actor::ActorConfig;
///
/// let config = ActorConfig::from_json(r#"{ "history_limit": 8 }"#).unwrap();
/// assert_eq!(config.history_limit, 8);
/// assert_eq!(config.thread_name_prefix, "actor-");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActorConfig {
    /// Prefix of the worker thread name; the actor name is appended
    pub thread_name_prefix: String,
    /// Transitions kept in the state machine history (0 disables it)
    pub history_limit: usize,
    /// Transitions requested from entry/exit handlers that may be applied
    /// back to back before further requests are dropped
    pub max_chained_transitions: usize,
    /// Worker thread stack size in bytes; the platform default when unset
    pub stack_size: Option<usize>,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "actor-".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_chained_transitions: DEFAULT_MAX_CHAINED_TRANSITIONS,
            stack_size: None,
        }
    }
}

impl ActorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn thread_name(&self, actor: &str) -> String {
        format!("{}{}", self.thread_name_prefix, actor)
    }
}
