//! The running machine.
//!
//! This is the imperative shell around [`crate::core`]: it owns the
//! current-state cell and runs actions, lifecycle hooks and debounce timers.
//!
//! # Key Concepts
//!
//! - **Dispatch**: resolve an event for the current state and run its action
//! - **Transition**: exit hook, state update, enter hook, always in that order
//! - **Invokers**: cached per-event handles, each with a `debounce` variant
//! - **Debounce**: one pending timer per event name; re-arming replaces it

mod debounce;
mod error;
mod gate;
mod invoker;
mod machine;

pub use debounce::Debounce;
pub use error::InvokeError;
pub use invoker::Invoker;
pub use machine::{Dispatched, Machine};
