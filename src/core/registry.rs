//! The static table of states a machine is built from.
//!
//! Lookups here are pure: they decide which action or hook applies but
//! never run anything.

use super::action::{Action, ActionTable, Hook, Lifecycle};
use super::state::State;
use std::collections::HashMap;

/// Mapping from state to action table, plus an optional wildcard table
/// consulted whenever the current state's table lacks an entry.
///
/// # Example
///
/// ```rust
/// use switchboard::core::{ActionTable, Registry};
///
/// let registry: Registry<String> = Registry::new()
///     .state("off", ActionTable::new().on("toggle", "on"))
///     .state("on", ActionTable::new().on("toggle", "off"))
///     .wildcard(ActionTable::new().on("reset", "off"));
///
/// let off = String::from("off");
/// assert!(registry.action(&off, "toggle").is_some());
/// assert!(registry.action(&off, "reset").is_some());
/// assert!(registry.action(&off, "missing").is_none());
/// ```
pub struct Registry<S: State> {
    tables: HashMap<S, ActionTable<S>>,
    wildcard: Option<ActionTable<S>>,
    duplicates: Vec<S>,
}

impl<S: State> Registry<S> {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            wildcard: None,
            duplicates: Vec::new(),
        }
    }

    /// Add the action table for a state.
    ///
    /// Registering the same state twice keeps the later table; the repeat is
    /// reported when the machine is built.
    pub fn state(mut self, state: impl Into<S>, table: ActionTable<S>) -> Self {
        let state = state.into();
        if self.tables.contains_key(&state) {
            self.duplicates.push(state.clone());
        }
        self.tables.insert(state, table);
        self
    }

    /// Set the wildcard table.
    pub fn wildcard(mut self, table: ActionTable<S>) -> Self {
        self.wildcard = Some(table);
        self
    }

    /// Resolve the action for `event` in `state`: the state's own table
    /// first, then the wildcard table.
    pub fn action(&self, state: &S, event: &str) -> Option<&Action<S>> {
        self.tables
            .get(state)
            .and_then(|table| table.action(event))
            .or_else(|| self.wildcard.as_ref().and_then(|t| t.action(event)))
    }

    /// Resolve a lifecycle hook for `state`, with the same fallback as [`Registry::action`].
    pub fn hook(&self, state: &S, lifecycle: Lifecycle) -> Option<&Hook<S>> {
        self.tables
            .get(state)
            .and_then(|table| table.hook(lifecycle))
            .or_else(|| self.wildcard.as_ref().and_then(|t| t.hook(lifecycle)))
    }

    pub fn table(&self, state: &S) -> Option<&ActionTable<S>> {
        self.tables.get(state)
    }

    pub fn wildcard_table(&self) -> Option<&ActionTable<S>> {
        self.wildcard.as_ref()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.tables.contains_key(state)
    }

    /// All named states (the wildcard is not a state).
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.tables.keys()
    }

    /// True when no named state exists and only the wildcard table is set.
    pub fn is_wildcard_only(&self) -> bool {
        self.tables.is_empty() && self.wildcard.is_some()
    }

    /// Iterate over every table, named states first, then the wildcard.
    pub(crate) fn all_tables(&self) -> impl Iterator<Item = &ActionTable<S>> {
        self.tables.values().chain(self.wildcard.iter())
    }

    pub(crate) fn duplicates(&self) -> &[S] {
        &self.duplicates
    }
}

impl<S: State> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}
