//! Builder API for machine construction.
//!
//! This module provides the fluent [`MachineBuilder`], the
//! [`create_machine`] shorthand and the `state_enum!` / `args!` macros.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::{create_machine, MachineBuilder};

use crate::core::{ActionTable, State};

/// Build a two-state toggle: `event` moves `a` to `b` and `b` back to `a`.
///
/// # Example
///
/// ```
/// use switchboard::builder::toggle;
///
/// let machine = toggle::<String>("off", "on", "flip").build().unwrap();
/// assert_eq!(machine.invoke("flip", vec![]), "on");
/// assert_eq!(machine.invoke("flip", vec![]), "off");
/// ```
pub fn toggle<S: State>(a: impl Into<S>, b: impl Into<S>, event: &str) -> MachineBuilder<S> {
    let a = a.into();
    let b = b.into();
    MachineBuilder::new()
        .initial(a.clone())
        .state(a.clone(), ActionTable::new().on(event, b.clone()))
        .state(b, ActionTable::new().on(event, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum Valve {
            Closed,
            Open,
        }
    }

    #[test]
    fn toggle_builds_symmetric_machine() {
        let machine = toggle::<Valve>(Valve::Closed, Valve::Open, "turn").build().unwrap();

        assert_eq!(machine.current(), Valve::Closed);
        assert_eq!(machine.invoke("turn", Vec::new()), Valve::Open);
        assert_eq!(machine.invoke("turn", Vec::new()), Valve::Closed);
    }

    #[test]
    fn toggle_ignores_unrelated_events() {
        let machine = toggle::<String>("a", "b", "swap").build().unwrap();
        assert_eq!(machine.invoke("other", Vec::new()), "a");
    }
}
