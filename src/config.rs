//! Engine configuration.
//!
//! Defaults match the classic idle-callback scheduler: yield once less than
//! one millisecond remains in a slice, treat `on*` props as event bindings,
//! and reject hook-order drift.
//!
//! ```ignore
//! let config = EngineConfig::from_toml_str(r#"
//!     yield_threshold_ms = 4
//!     strict_hooks = false
//! "#)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Default prefix marking a prop as an event subscription.
pub const DEFAULT_EVENT_PREFIX: &str = "on";

/// Default minimum time left in a slice before the work loop yields.
pub const DEFAULT_YIELD_THRESHOLD: Duration = Duration::from_millis(1);

/// Tunables for the scheduler, the hook store and the stock host renderers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Yield when `time_remaining()` drops below this after a unit of work.
    #[serde(rename = "yield_threshold_ms", deserialize_with = "deserialize_millis")]
    pub yield_threshold: Duration,

    /// Abort the pass on hook-order drift instead of warning and reseeding.
    pub strict_hooks: bool,

    /// Props whose name starts with this are event bindings.
    pub event_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_threshold: DEFAULT_YIELD_THRESHOLD,
            strict_hooks: true,
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_prefix.is_empty() {
            return Err(ConfigError::EmptyEventPrefix);
        }
        Ok(())
    }

    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    pub fn with_strict_hooks(mut self, strict: bool) -> Self {
        self.strict_hooks = strict;
        self
    }

    pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.yield_threshold, Duration::from_millis(1));
        assert!(config.strict_hooks);
        assert_eq!(config.event_prefix, "on");
    }

    #[test]
    fn test_from_toml_partial() {
        let config =
            EngineConfig::from_toml_str("yield_threshold_ms = 5\nstrict_hooks = false\n").unwrap();
        assert_eq!(config.yield_threshold, Duration::from_millis(5));
        assert!(!config.strict_hooks);
        assert_eq!(config.event_prefix, "on");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let err = EngineConfig::from_toml_str("event_prefix = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyEventPrefix));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = EngineConfig::from_toml_str("frame_rate = 60").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_strict_hooks(false)
            .with_event_prefix("handle")
            .with_yield_threshold(Duration::ZERO);
        assert!(!config.strict_hooks);
        assert_eq!(config.event_prefix, "handle");
        assert_eq!(config.yield_threshold, Duration::ZERO);
    }
}
