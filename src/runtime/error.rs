//! Errors surfaced by invokers and debounced calls.
//!
//! Plain dispatch never fails: a missing action is logged and treated as a
//! no-op. These errors only cover handles that outlive their machine and
//! debounced calls that never ran.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("Debounced call for event '{event}' was superseded or cancelled")]
    Superseded { event: String },

    #[error("No tokio runtime available to schedule debounced event '{event}'")]
    NoRuntime { event: String },

    #[error("Machine behind event '{event}' has been dropped")]
    MachineDropped { event: String },
}

impl InvokeError {
    /// Event name the failed call was made for.
    pub fn event(&self) -> &str {
        match self {
            Self::Superseded { event }
            | Self::NoRuntime { event }
            | Self::MachineDropped { event } => event,
        }
    }
}
