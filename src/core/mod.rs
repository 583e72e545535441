//! Core state machine types.
//!
//! This module contains the declarative side of a machine:
//! - State names via the `State` trait
//! - Actions, hooks and per-state action tables
//! - The registry and its lookup rules
//! - Immutable history tracking
//!
//! Nothing here runs user code; see [`crate::runtime`] for that.

mod action;
mod history;
mod registry;
mod state;

pub use action::{
    is_lifecycle_event, Action, ActionFn, ActionTable, Args, Hook, Lifecycle, Outcome,
    TransitionMeta, ENTER, EXIT,
};
pub use history::{StateHistory, StateTransition};
pub use registry::Registry;
pub use state::State;
