//! Machine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default debounce delay, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Default number of history entries kept per machine.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Tunables for a machine.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use switchboard::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{"default_debounce_ms": 250}"#).unwrap();
/// assert_eq!(config.default_debounce().as_millis(), 250);
/// assert!(config.strict_initial);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Delay used by `debounce_default`.
    pub default_debounce_ms: u64,

    /// When named states exist, reject static targets that have no table,
    /// and an initial state without a table unless a wildcard table is present.
    pub strict_initial: bool,

    /// Maximum number of transitions kept in the machine's history.
    pub history_limit: usize,
}

impl MachineConfig {
    pub fn default_debounce(&self) -> Duration {
        Duration::from_millis(self.default_debounce_ms)
    }

    pub fn with_default_debounce(mut self, wait: Duration) -> Self {
        self.default_debounce_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_strict_initial(mut self, strict: bool) -> Self {
        self.strict_initial = strict;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            default_debounce_ms: DEFAULT_DEBOUNCE_MS,
            strict_initial: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = MachineConfig::default();
        assert_eq!(config.default_debounce(), Duration::from_millis(100));
        assert!(config.strict_initial);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config: MachineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = MachineConfig::default()
            .with_default_debounce(Duration::from_millis(40))
            .with_strict_initial(false)
            .with_history_limit(3);

        assert_eq!(config.default_debounce_ms, 40);
        assert!(!config.strict_initial);
        assert_eq!(config.history_limit, 3);
    }
}
