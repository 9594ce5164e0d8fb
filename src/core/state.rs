//! State identifier trait.
//!
//! Every state in a hierarchy is named by a value of a small `Copy` enum.
//! Identifiers are what handlers pass to `Context::transition_to`, what the
//! tree indexes nodes by and what the transition history records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: identifiers are map keys and cheap to pass around
/// - `Debug`: identifiers show up in logs and panic messages
/// - `Serialize` + `Deserialize`: identifiers are part of exported history
///
/// # Example
///
/// ```rust
/// use strata::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Oven {
///     Root,
///     Heating,
///     Baking,
/// }
///
/// impl State for Oven {
///     fn name(&self) -> &str {
///         match self {
///             Self::Root => "Root",
///             Self::Heating => "Heating",
///             Self::Baking => "Baking",
///         }
///     }
/// }
///
/// assert_eq!(Oven::Baking.name(), "Baking");
/// ```
pub trait State:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
