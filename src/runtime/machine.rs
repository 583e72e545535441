//! Machine handle, dispatcher and transition engine.

use super::debounce::Armed;
use super::gate::Gate;
use super::invoker::Invoker;
use crate::config::MachineConfig;
use crate::core::{
    is_lifecycle_event, Args, Lifecycle, Outcome, Registry, State, StateHistory, StateTransition,
    TransitionMeta, ENTER,
};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

/// Result of dispatching one event.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatched<S: State> {
    /// What the resolved action produced (`Unit` when nothing was resolved).
    pub outcome: Outcome<S>,
    /// Whether the outcome moved the machine.
    pub transitioned: bool,
    /// Current state after the dispatch.
    pub current: S,
}

/// A live state machine.
///
/// `Machine` is a cheap handle; clones share the same state. Build one with
/// [`MachineBuilder`](crate::builder::MachineBuilder) or
/// [`create_machine`](crate::builder::create_machine).
///
/// # Example
///
/// ```rust
/// use switchboard::{create_machine, args, ActionTable, Registry};
///
/// let machine = create_machine(
///     "off",
///     Registry::<String>::new()
///         .state("off", ActionTable::new().on("toggle", "on"))
///         .state("on", ActionTable::new().on("toggle", "off")),
/// )
/// .unwrap();
///
/// assert_eq!(machine.invoke("toggle", args![]), "on");
/// assert_eq!(machine.event("toggle").call(args![]).unwrap(), "off");
/// ```
pub struct Machine<S: State> {
    pub(crate) inner: Arc<Inner<S>>,
}

pub(crate) struct Inner<S: State> {
    pub(crate) registry: Registry<S>,
    pub(crate) config: MachineConfig,
    current: RwLock<S>,
    history: Mutex<StateHistory<S>>,
    gate: Gate,
    pub(crate) timers: Mutex<HashMap<String, Armed>>,
    pub(crate) next_timer: AtomicU64,
    invokers: Mutex<HashMap<String, Arc<Invoker<S>>>>,
}

impl<S: State> Machine<S> {
    /// Create the machine and enter the initial state.
    ///
    /// The registry is assumed to be validated already.
    pub(crate) fn start(initial: S, registry: Registry<S>, config: MachineConfig) -> Self {
        let machine = Self {
            inner: Arc::new(Inner {
                registry,
                config,
                current: RwLock::new(initial.clone()),
                history: Mutex::new(StateHistory::new()),
                gate: Gate::default(),
                timers: Mutex::new(HashMap::new()),
                next_timer: AtomicU64::new(0),
                invokers: Mutex::new(HashMap::new()),
            }),
        };

        let meta = TransitionMeta::initial(initial);
        if let Some(_guard) = machine.inner.gate.enter(ENTER) {
            machine.record(&meta);
            debug!(state = meta.to.name(), "entering initial state");
            machine.run_hook(&meta.to, Lifecycle::Enter, &meta);
        }
        machine
    }

    pub(crate) fn from_weak(inner: &Weak<Inner<S>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner<S>> {
        Arc::downgrade(&self.inner)
    }

    /// The current state.
    pub fn current(&self) -> S {
        self.inner.current.read().clone()
    }

    /// Snapshot of the transitions applied so far, oldest first.
    pub fn history(&self) -> StateHistory<S> {
        self.inner.history.lock().clone()
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.inner.registry
    }

    pub fn config(&self) -> &MachineConfig {
        &self.inner.config
    }

    /// Invoke an event and return the resulting current state.
    pub fn invoke(&self, event: &str, args: Args) -> S {
        self.dispatch(event, args).current
    }

    /// Invoke an event and report what happened.
    ///
    /// Resolves the action for the current state (falling back to the
    /// wildcard table), runs it, and applies a transition when the outcome
    /// names a state other than the one current after the action returned.
    /// At most one transition happens per call.
    ///
    /// Actions and hooks may dispatch other events on the same machine; those
    /// nested calls complete, transitions included, before the outer outcome
    /// is applied. Dispatching an event that is already in flight on the
    /// calling thread is refused with a warning and changes nothing.
    ///
    /// The reserved `_enter` / `_exit` names are never resolved as events:
    /// dispatching them is a silent no-op and does not run any hook.
    pub fn dispatch(&self, event: &str, args: Args) -> Dispatched<S> {
        let Some(_guard) = self.inner.gate.enter(event) else {
            let current = self.current();
            warn!(
                event,
                state = current.name(),
                "Re-entrant dispatch of event {} in state {} ignored",
                event,
                current.name()
            );
            return Dispatched {
                outcome: Outcome::Unit,
                transitioned: false,
                current,
            };
        };

        let outcome = self.resolve(&self.current(), event, &args);
        let current = self.current();
        let transitioned = match outcome.state() {
            Some(next) if *next != current => {
                let next = next.clone();
                self.apply_transition(current, next, event, args);
                true
            }
            _ => false,
        };

        Dispatched {
            outcome,
            transitioned,
            current: self.current(),
        }
    }

    /// Cached invoker for an event name.
    ///
    /// The first access creates the invoker; every later access returns the
    /// same `Arc`. Names are not checked against the registry.
    pub fn event(&self, name: &str) -> Arc<Invoker<S>> {
        let mut invokers = self.inner.invokers.lock();
        if let Some(invoker) = invokers.get(name) {
            return Arc::clone(invoker);
        }
        trace!(event = name, "materializing invoker");
        let invoker = Arc::new(Invoker::new(name, self.downgrade()));
        invokers.insert(name.to_string(), Arc::clone(&invoker));
        invoker
    }

    fn resolve(&self, current: &S, event: &str, args: &[Value]) -> Outcome<S> {
        match self.inner.registry.action(current, event) {
            Some(action) => {
                trace!(event, state = current.name(), ?action, "resolved action");
                action.run(self, args)
            }
            None => {
                if !is_lifecycle_event(event) {
                    warn!(
                        event,
                        state = current.name(),
                        "No action defined for event {} in state {}",
                        event,
                        current.name()
                    );
                }
                Outcome::Unit
            }
        }
    }

    fn apply_transition(&self, from: S, to: S, event: &str, args: Args) {
        let meta = TransitionMeta {
            from: Some(from),
            to,
            event: Some(event.to_string()),
            args,
        };

        if let Some(from) = &meta.from {
            self.run_hook(from, Lifecycle::Exit, &meta);
        }
        *self.inner.current.write() = meta.to.clone();
        self.record(&meta);
        debug!(
            event,
            from = meta.from.as_ref().map(|s| s.name()),
            to = meta.to.name(),
            "transition applied"
        );
        self.run_hook(&meta.to, Lifecycle::Enter, &meta);
    }

    fn run_hook(&self, state: &S, lifecycle: Lifecycle, meta: &TransitionMeta<S>) {
        if let Some(hook) = self.inner.registry.hook(state, lifecycle) {
            trace!(state = state.name(), hook = lifecycle.event_name(), "running hook");
            hook(meta);
        }
    }

    fn record(&self, meta: &TransitionMeta<S>) {
        let transition = StateTransition {
            from: meta.from.clone(),
            to: meta.to.clone(),
            event: meta.event.clone(),
            timestamp: Utc::now(),
        };
        let mut history = self.inner.history.lock();
        *history = history.record_bounded(transition, self.inner.config.history_limit);
    }
}

impl<S: State> Clone for Machine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State> fmt::Debug for Machine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<S: State> Drop for Inner<S> {
    fn drop(&mut self) {
        for (event, armed) in self.timers.get_mut().drain() {
            debug!(event = %event, "machine dropped, cancelling debounced call");
            armed.abort();
        }
    }
}
