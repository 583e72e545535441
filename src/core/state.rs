//! State names for the machine.
//!
//! A state is an opaque, comparable identifier. The runtime only ever
//! compares states for equality, hashes them for registry lookup, and
//! prints their name in diagnostics.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the current state is handed out by value
/// - `Eq` + `Hash`: states key the registry and decide whether a transition happens
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: transition metadata and history are serializable
///
/// `String` implements this trait, so string-named machines need no extra code.
/// For enums, see [`state_enum!`](crate::state_enum).
///
/// # Example
///
/// ```rust
/// use switchboard::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
