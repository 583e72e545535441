//! Build errors for machine construction.

use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state '{state}' has no action table and no wildcard table is defined")]
    UnknownInitialState { state: String },

    #[error("Event '{event}' targets state '{state}', which has no action table")]
    UnknownTargetState { state: String, event: String },

    #[error("State '{state}' is registered more than once")]
    DuplicateState { state: String },

    #[error("Event name '{event}' is reserved for lifecycle hooks; use on_enter/on_exit")]
    ReservedEvent { event: String },
}
