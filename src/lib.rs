//! Switchboard: a small event-driven finite state machine runtime
//!
//! A machine is built from named states, each with a table mapping event
//! names to actions plus optional `_enter` / `_exit` lifecycle hooks.
//! Invoking an event resolves its action for the current state, runs it,
//! and moves the machine when the action names a different state.
//!
//! # Core Concepts
//!
//! - **State**: opaque, comparable state names via the `State` trait
//! - **Actions**: a fixed target state or a function of the call arguments
//! - **Wildcard table**: fallback consulted when a state lacks an event
//! - **Lifecycle hooks**: exit, state update, enter, always in that order
//! - **Invokers**: cached per-event handles with a debounced variant
//!
//! # Example
//!
//! ```rust
//! use switchboard::{args, create_machine, ActionTable, Registry};
//!
//! let machine = create_machine(
//!     "off",
//!     Registry::<String>::new()
//!         .state(
//!             "off",
//!             ActionTable::new()
//!                 .on("toggle", "on")
//!                 .on_exit(|meta| println!("leaving off via {:?}", meta.event)),
//!         )
//!         .state("on", ActionTable::new().on("toggle", "off")),
//! )
//! .unwrap();
//!
//! let toggle = machine.event("toggle");
//! assert_eq!(toggle.call(args![]).unwrap(), "on");
//! assert_eq!(machine.current(), "on");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use builder::{create_machine, BuildError, MachineBuilder};
pub use config::MachineConfig;
pub use core::{ActionTable, Args, Outcome, Registry, State, TransitionMeta};
pub use runtime::{Debounce, Dispatched, InvokeError, Invoker, Machine};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{json, Value};
}
