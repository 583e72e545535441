//! Per-event invokers.

use super::debounce::Debounce;
use super::error::InvokeError;
use super::machine::{Dispatched, Inner, Machine};
use crate::core::{Args, State};
use std::fmt;
use std::sync::Weak;
use std::time::Duration;

/// Callable handle for one event name, obtained from [`Machine::event`].
///
/// Invokers are created on first access and cached by the machine, so every
/// lookup of the same name yields the same `Arc<Invoker>`. They hold the
/// machine weakly; calls made after the machine is dropped fail with
/// [`InvokeError::MachineDropped`].
pub struct Invoker<S: State> {
    event: String,
    machine: Weak<Inner<S>>,
}

impl<S: State> Invoker<S> {
    pub(crate) fn new(event: &str, machine: Weak<Inner<S>>) -> Self {
        Self {
            event: event.to_string(),
            machine,
        }
    }

    /// Event name this invoker is bound to.
    pub fn name(&self) -> &str {
        &self.event
    }

    /// Invoke the event and return the resulting current state.
    pub fn call(&self, args: Args) -> Result<S, InvokeError> {
        self.machine().map(|machine| machine.invoke(&self.event, args))
    }

    /// Invoke the event and report the outcome as well as the new state.
    pub fn dispatch(&self, args: Args) -> Result<Dispatched<S>, InvokeError> {
        self.machine().map(|machine| machine.dispatch(&self.event, args))
    }

    /// Debounced variant of [`Invoker::call`]; see [`Machine::debounce`].
    pub fn debounce(&self, wait: impl Into<Option<Duration>>, args: Args) -> Debounce<S> {
        match self.machine() {
            Ok(machine) => machine.debounce(&self.event, wait, args),
            Err(err) => Debounce::ready(&self.event, Err(err)),
        }
    }

    /// Debounce using the machine's configured default delay.
    pub fn debounce_default(&self, args: Args) -> Debounce<S> {
        match self.machine() {
            Ok(machine) => {
                let wait = machine.config().default_debounce();
                machine.debounce(&self.event, wait, args)
            }
            Err(err) => Debounce::ready(&self.event, Err(err)),
        }
    }

    /// Cancel a pending debounced call for this event.
    pub fn cancel(&self) -> bool {
        self.machine()
            .map(|machine| machine.cancel_debounce(&self.event))
            .unwrap_or(false)
    }

    fn machine(&self) -> Result<Machine<S>, InvokeError> {
        Machine::from_weak(&self.machine).ok_or_else(|| InvokeError::MachineDropped {
            event: self.event.clone(),
        })
    }
}

impl<S: State> fmt::Debug for Invoker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("event", &self.event)
            .field("attached", &(self.machine.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::core::{ActionTable, Outcome, Registry};
    use serde_json::json;

    fn toggle_machine() -> Machine<String> {
        let registry = Registry::new()
            .state("off", ActionTable::new().on("toggle", "on"))
            .state(
                "on",
                ActionTable::new()
                    .on("toggle", "off")
                    .on_value("echo", |_, args| json!(args)),
            );
        Machine::start("off".to_string(), registry, MachineConfig::default())
    }

    #[test]
    fn call_invokes_bound_event() {
        let machine = toggle_machine();
        let toggle = machine.event("toggle");

        assert_eq!(toggle.name(), "toggle");
        assert_eq!(toggle.call(Vec::new()).unwrap(), "on");
        assert_eq!(toggle.call(Vec::new()).unwrap(), "off");
        assert_eq!(machine.current(), "off");
    }

    #[test]
    fn dispatch_relays_outcome() {
        let machine = toggle_machine();
        machine.invoke("toggle", Vec::new());

        let dispatched = machine.event("echo").dispatch(vec![json!(7)]).unwrap();
        assert_eq!(dispatched.outcome, Outcome::Value(json!([7])));
        assert_eq!(dispatched.current, "on");
    }

    #[test]
    fn unknown_events_still_get_invokers() {
        let machine = toggle_machine();
        let missing = machine.event("missing");

        assert_eq!(missing.call(Vec::new()).unwrap(), "off");
    }

    #[test]
    fn detached_invoker_reports_dropped_machine() {
        let machine = toggle_machine();
        let toggle = machine.event("toggle");
        drop(machine);

        assert_eq!(
            toggle.call(Vec::new()),
            Err(InvokeError::MachineDropped {
                event: "toggle".to_string()
            })
        );
        assert!(!toggle.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_default_uses_configured_delay() {
        let machine = toggle_machine();
        let toggle = machine.event("toggle");
        let start = tokio::time::Instant::now();

        let state = toggle.debounce_default(Vec::new()).await.unwrap();

        assert_eq!(state, "on");
        assert!(start.elapsed() >= machine.config().default_debounce());
    }

    #[tokio::test(start_paused = true)]
    async fn invoker_cancel_stops_pending_call() {
        let machine = toggle_machine();
        let toggle = machine.event("toggle");

        let pending = toggle.debounce(Duration::from_millis(30), Vec::new());
        assert!(toggle.cancel());
        assert!(pending.await.is_err());
        assert_eq!(machine.current(), "off");
    }
}
