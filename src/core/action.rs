//! Actions, lifecycle hooks and per-state action tables.

use super::state::State;
use crate::runtime::Machine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reserved table key for the enter hook.
pub const ENTER: &str = "_enter";

/// Reserved table key for the exit hook.
pub const EXIT: &str = "_exit";

/// Positional arguments passed to an event.
pub type Args = Vec<Value>;

/// Function backing a computed action.
///
/// Receives the machine it runs on and the caller's arguments.
pub type ActionFn<S> = Arc<dyn Fn(&Machine<S>, &[Value]) -> Outcome<S> + Send + Sync>;

/// Lifecycle hook, called with the metadata of the transition in progress.
pub type Hook<S> = Arc<dyn Fn(&TransitionMeta<S>) + Send + Sync>;

/// Which side of a transition a hook runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Enter,
    Exit,
}

impl Lifecycle {
    /// Reserved event name of this hook.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Enter => ENTER,
            Self::Exit => EXIT,
        }
    }
}

/// Returns true for the reserved `_enter` / `_exit` names.
pub fn is_lifecycle_event(event: &str) -> bool {
    event == ENTER || event == EXIT
}

/// What a dispatched event produced.
///
/// Only [`Outcome::State`] can move the machine, and only when it differs
/// from the current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Outcome<S: State> {
    /// A state name; triggers a transition when it differs from the current state.
    State(S),
    /// A plain value relayed back to the caller.
    Value(Value),
    /// No result.
    Unit,
}

impl<S: State> Outcome<S> {
    /// Outcome naming the next state.
    pub fn goto(state: impl Into<S>) -> Self {
        Self::State(state.into())
    }

    /// The state this outcome names, if any.
    pub fn state(&self) -> Option<&S> {
        match self {
            Self::State(state) => Some(state),
            _ => None,
        }
    }

    /// The relayed value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl<S: State> From<()> for Outcome<S> {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

/// A state transition rule.
pub enum Action<S: State> {
    /// Unconditional move to a fixed state.
    Goto(S),
    /// Function computing the outcome from the call arguments.
    Computed(ActionFn<S>),
}

impl<S: State> Action<S> {
    /// Run the action, producing its outcome.
    pub fn run(&self, machine: &Machine<S>, args: &[Value]) -> Outcome<S> {
        match self {
            Self::Goto(state) => Outcome::State(state.clone()),
            Self::Computed(f) => f(machine, args),
        }
    }
}

impl<S: State> Clone for Action<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Goto(state) => Self::Goto(state.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<S: State> fmt::Debug for Action<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goto(state) => f.debug_tuple("Goto").field(state).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Record describing a move, shared by the exit and enter hooks.
///
/// The synthetic transition made at construction has no `from`, no `event`
/// and empty `args`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionMeta<S: State> {
    pub from: Option<S>,
    pub to: S,
    pub event: Option<String>,
    pub args: Args,
}

impl<S: State> TransitionMeta<S> {
    /// Metadata for entering the initial state.
    pub fn initial(to: S) -> Self {
        Self {
            from: None,
            to,
            event: None,
            args: Vec::new(),
        }
    }
}

/// Event-to-action mapping for one state, plus its optional lifecycle hooks.
///
/// # Example
///
/// ```rust
/// use switchboard::core::{ActionTable, Outcome};
///
/// let off: ActionTable<String> = ActionTable::new()
///     .on("toggle", "on")
///     .on_fn("set", |_machine, args| match args.first().and_then(|v| v.as_str()) {
///         Some(target) => Outcome::goto(target),
///         None => Outcome::Unit,
///     })
///     .on_enter(|meta| println!("entered {}", meta.to));
///
/// assert!(off.action("toggle").is_some());
/// assert!(off.action("missing").is_none());
/// ```
pub struct ActionTable<S: State> {
    actions: HashMap<String, Action<S>>,
    enter: Option<Hook<S>>,
    exit: Option<Hook<S>>,
}

impl<S: State> ActionTable<S> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            enter: None,
            exit: None,
        }
    }

    /// Map an event to a fixed target state.
    pub fn on(mut self, event: impl Into<String>, target: impl Into<S>) -> Self {
        self.actions.insert(event.into(), Action::Goto(target.into()));
        self
    }

    /// Map an event to a function computing its outcome.
    pub fn on_fn<F>(mut self, event: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Machine<S>, &[Value]) -> Outcome<S> + Send + Sync + 'static,
    {
        self.actions.insert(event.into(), Action::Computed(Arc::new(action)));
        self
    }

    /// Map an event to a function run only for its side effects or return value.
    ///
    /// The returned value is relayed to the caller and never causes a transition.
    pub fn on_value<F>(self, event: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Machine<S>, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.on_fn(event, move |machine, args| Outcome::Value(action(machine, args)))
    }

    /// Insert a prebuilt action.
    pub fn action_entry(mut self, event: impl Into<String>, action: Action<S>) -> Self {
        self.actions.insert(event.into(), action);
        self
    }

    /// Set the hook run after this state becomes current.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionMeta<S>) + Send + Sync + 'static,
    {
        self.enter = Some(Arc::new(hook));
        self
    }

    /// Set the hook run before this state stops being current.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionMeta<S>) + Send + Sync + 'static,
    {
        self.exit = Some(Arc::new(hook));
        self
    }

    /// Look up the action for an event.
    pub fn action(&self, event: &str) -> Option<&Action<S>> {
        self.actions.get(event)
    }

    /// Look up a lifecycle hook.
    pub fn hook(&self, lifecycle: Lifecycle) -> Option<&Hook<S>> {
        match lifecycle {
            Lifecycle::Enter => self.enter.as_ref(),
            Lifecycle::Exit => self.exit.as_ref(),
        }
    }

    /// Names of all events with an action in this table.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S: State> Default for ActionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Clone for ActionTable<S> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            enter: self.enter.clone(),
            exit: self.exit.clone(),
        }
    }
}

impl<S: State> fmt::Debug for ActionTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("actions", &self.actions)
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn static_action_yields_its_target() {
        let table: ActionTable<String> = ActionTable::new().on("toggle", "on");
        match table.action("toggle") {
            Some(Action::Goto(target)) => assert_eq!(target, "on"),
            other => panic!("Expected Goto action, got {:?}", other),
        }
    }

    #[test]
    fn later_entries_replace_earlier_ones() {
        let table: ActionTable<String> = ActionTable::new().on("go", "a").on("go", "b");
        assert_eq!(table.len(), 1);
        assert!(matches!(table.action("go"), Some(Action::Goto(s)) if s == "b"));
    }

    #[test]
    fn hooks_are_not_events() {
        let table: ActionTable<String> = ActionTable::new()
            .on_enter(|_| {})
            .on_exit(|_| {});

        assert!(table.is_empty());
        assert!(table.action(ENTER).is_none());
        assert!(table.hook(Lifecycle::Enter).is_some());
        assert!(table.hook(Lifecycle::Exit).is_some());
    }

    #[test]
    fn lifecycle_names_are_reserved() {
        assert!(is_lifecycle_event("_enter"));
        assert!(is_lifecycle_event("_exit"));
        assert!(!is_lifecycle_event("enter"));
        assert_eq!(Lifecycle::Exit.event_name(), "_exit");
    }

    #[test]
    fn outcome_accessors() {
        let state: Outcome<String> = Outcome::goto("on");
        assert_eq!(state.state().map(String::as_str), Some("on"));
        assert!(state.value().is_none());

        let value: Outcome<String> = Outcome::Value(json!(42));
        assert_eq!(value.value(), Some(&json!(42)));
        assert!(value.state().is_none());

        assert!(Outcome::<String>::from(()).is_unit());
    }

    #[test]
    fn initial_meta_has_no_origin() {
        let meta = TransitionMeta::initial(String::from("off"));
        assert_eq!(meta.from, None);
        assert_eq!(meta.event, None);
        assert!(meta.args.is_empty());
    }

    #[test]
    fn transition_meta_serializes() {
        let meta = TransitionMeta {
            from: Some(String::from("off")),
            to: String::from("on"),
            event: Some(String::from("toggle")),
            args: vec![json!(1), json!("two")],
        };

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({"from": "off", "to": "on", "event": "toggle", "args": [1, "two"]})
        );
    }
}
