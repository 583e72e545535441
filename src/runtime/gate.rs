//! Serializes dispatch so that exit, state update and enter never interleave.

use parking_lot::{Condvar, Mutex};
use std::thread::{self, ThreadId};

/// Admits one thread at a time.
///
/// Other threads wait their turn. The thread already inside may dispatch
/// further events from its actions and hooks, but never an event that is
/// still in flight on its own stack.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    state: Mutex<Occupancy>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct Occupancy {
    owner: Option<ThreadId>,
    in_flight: Vec<String>,
}

impl Gate {
    /// Enter the gate for `event`, or `None` when the calling thread is
    /// already dispatching that same event.
    pub(crate) fn enter(&self, event: &str) -> Option<GateGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.owner == Some(me) {
            if state.in_flight.iter().any(|name| name == event) {
                return None;
            }
        } else {
            while state.owner.is_some() {
                self.released.wait(&mut state);
            }
            state.owner = Some(me);
        }
        state.in_flight.push(event.to_string());
        Some(GateGuard { gate: self })
    }
}

pub(crate) struct GateGuard<'a> {
    gate: &'a Gate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.state.lock();
        state.in_flight.pop();
        if state.in_flight.is_empty() {
            state.owner = None;
            self.gate.released.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn same_event_is_refused_while_in_flight() {
        let gate = Gate::default();
        let guard = gate.enter("toggle");
        assert!(guard.is_some());
        assert!(gate.enter("toggle").is_none());
        drop(guard);
        assert!(gate.enter("toggle").is_some());
    }

    #[test]
    fn owner_may_nest_other_events() {
        let gate = Gate::default();
        let outer = gate.enter("submit").unwrap();
        let inner = gate.enter("start").unwrap();

        assert!(gate.enter("submit").is_none());
        assert!(gate.enter("start").is_none());

        drop(inner);
        assert!(gate.enter("start").is_some());
        drop(outer);
        assert!(gate.state.lock().owner.is_none());
    }

    #[test]
    fn other_threads_wait_for_release() {
        let gate = Arc::new(Gate::default());
        let counter = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let gate = Arc::clone(&gate);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    let _guard = gate.enter("tick").unwrap();
                    counter.lock().push(i);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.lock().len(), 4);
        assert!(gate.enter("tick").is_some());
    }
}
