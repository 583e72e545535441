//! State transition history tracking.
//!
//! Every transition a machine applies, including the synthetic entry into
//! the initial state, is recorded as an immutable [`StateTransition`].

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use switchboard::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Some(String::from("off")),
///     to: String::from("on"),
///     event: Some(String::from("toggle")),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_initial());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left; `None` for the initial entry
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// The event that caused the move; `None` for the initial entry
    pub event: Option<String>,
    /// When the state cell was updated
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// True for the synthetic entry made at construction.
    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }
}

/// Ordered history of state transitions.
///
/// History is immutable - [`StateHistory::record`] returns a new history
/// with the transition appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// # Example
    ///
    /// ```rust
    /// use switchboard::core::{StateHistory, StateTransition};
    /// use chrono::Utc;
    ///
    /// let history = StateHistory::new();
    /// let new_history = history.record(StateTransition {
    ///     from: None,
    ///     to: String::from("idle"),
    ///     event: None,
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(new_history.len(), 1);
    /// assert!(history.is_empty()); // Original unchanged
    /// ```
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Record a transition, keeping at most `limit` of the newest entries.
    ///
    /// A `limit` of zero records nothing.
    pub fn record_bounded(&self, transition: StateTransition<S>, limit: usize) -> Self {
        let mut history = self.record(transition);
        let excess = history.transitions.len().saturating_sub(limit);
        history.transitions.drain(..excess);
        history
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the oldest transition (when there is
    /// one), followed by the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Duration from the oldest to the newest recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// The most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
