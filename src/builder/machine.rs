//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{is_lifecycle_event, Action, ActionTable, Registry, State};
use crate::runtime::Machine;

/// Builder for constructing machines with a fluent API.
///
/// Validation happens in [`MachineBuilder::build`]; the initial enter hook
/// runs only once validation has passed.
pub struct MachineBuilder<S: State> {
    initial: Option<S>,
    registry: Registry<S>,
    config: MachineConfig,
}

impl<S: State> MachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            registry: Registry::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<S>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add the action table for a state.
    pub fn state(mut self, state: impl Into<S>, table: ActionTable<S>) -> Self {
        self.registry = self.registry.state(state, table);
        self
    }

    /// Set the wildcard table.
    pub fn wildcard(mut self, table: ActionTable<S>) -> Self {
        self.registry = self.registry.wildcard(table);
        self
    }

    /// Replace the whole registry.
    pub fn registry(mut self, registry: Registry<S>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the definition and start the machine.
    pub fn build(self) -> Result<Machine<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        validate(&initial, &self.registry, &self.config)?;
        Ok(Machine::start(initial, self.registry, self.config))
    }
}

impl<S: State> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a machine from an initial state and a registry with default configuration.
///
/// # Example
///
/// ```rust
/// use switchboard::{create_machine, ActionTable, Registry};
///
/// let machine = create_machine(
///     "off",
///     Registry::<String>::new().state("off", ActionTable::new()),
/// )
/// .unwrap();
/// assert_eq!(machine.current(), "off");
/// ```
pub fn create_machine<S: State>(
    initial: impl Into<S>,
    registry: Registry<S>,
) -> Result<Machine<S>, BuildError> {
    MachineBuilder::new()
        .initial(initial)
        .registry(registry)
        .build()
}

fn validate<S: State>(
    initial: &S,
    registry: &Registry<S>,
    config: &MachineConfig,
) -> Result<(), BuildError> {
    if let Some(state) = registry.duplicates().first() {
        return Err(BuildError::DuplicateState {
            state: state.name().to_string(),
        });
    }

    if let Some(event) = registry
        .all_tables()
        .flat_map(|table| table.events())
        .find(|event| is_lifecycle_event(event))
    {
        return Err(BuildError::ReservedEvent {
            event: event.to_string(),
        });
    }

    if !config.strict_initial || registry.states().next().is_none() {
        return Ok(());
    }

    let has_fallback = registry.wildcard_table().is_some();
    if !has_fallback && !registry.contains(initial) {
        return Err(BuildError::UnknownInitialState {
            state: initial.name().to_string(),
        });
    }

    // Static targets must name a registered state.
    for table in registry.all_tables() {
        for event in table.events() {
            if let Some(Action::Goto(target)) = table.action(event) {
                if !registry.contains(target) {
                    return Err(BuildError::UnknownTargetState {
                        state: target.name().to_string(),
                        event: event.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}
