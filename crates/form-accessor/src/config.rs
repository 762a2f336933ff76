//! Accessor configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_TRACE_ID: &str = "form-accessor";
pub const DEFAULT_MAX_EVENTS: usize = 10_000;

/// What to do when a form has no data container at access time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Reads and writes fail with `AccessError::InvalidTarget`.
    #[default]
    FailFast,
    /// Reads fall through to the form's own properties; writes report a
    /// mismatch. No container is ever created.
    TreatAsEmpty,
}

impl fmt::Display for MissingDataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail_fast"),
            Self::TreatAsEmpty => f.write_str("treat_as_empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    pub missing_data: MissingDataPolicy,
    /// Record an `AccessEvent` for every read and write.
    pub record_events: bool,
    /// Maximum buffered events; the oldest are dropped past this.
    pub max_events: usize,
    /// Stamped on every recorded event.
    pub trace_id: String,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            missing_data: MissingDataPolicy::FailFast,
            record_events: true,
            max_events: DEFAULT_MAX_EVENTS,
            trace_id: DEFAULT_TRACE_ID.to_string(),
        }
    }
}

impl AccessorConfig {
    /// Parse from JSON. Absent fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_missing_data(mut self, policy: MissingDataPolicy) -> Self {
        self.missing_data = policy;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn without_events(mut self) -> Self {
        self.record_events = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ERROR_INVALID_CONFIG;

    #[test]
    fn defaults_fail_fast_and_record() {
        let config = AccessorConfig::default();
        assert_eq!(config.missing_data, MissingDataPolicy::FailFast);
        assert!(config.record_events);
        assert_eq!(config.trace_id, DEFAULT_TRACE_ID);
        assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = AccessorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AccessorConfig::default());
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let config =
            AccessorConfig::from_json_str(r#"{"missing_data":"treat_as_empty","trace_id":"t-7"}"#)
                .unwrap();
        assert_eq!(config.missing_data, MissingDataPolicy::TreatAsEmpty);
        assert_eq!(config.trace_id, "t-7");
        assert!(config.record_events);
        assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
    }

    #[test]
    fn max_events_from_json() {
        let config = AccessorConfig::from_json_str(r#"{"max_events":16}"#).unwrap();
        assert_eq!(config.max_events, 16);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = AccessorConfig::from_json_str(r#"{"missing_data":"guess"}"#).unwrap_err();
        assert_eq!(err.stable_code(), ERROR_INVALID_CONFIG);
    }

    #[test]
    fn builder_methods() {
        let config = AccessorConfig::default()
            .with_missing_data(MissingDataPolicy::TreatAsEmpty)
            .with_trace_id("trace-1")
            .without_events();
        assert_eq!(config.missing_data.to_string(), "treat_as_empty");
        assert_eq!(config.trace_id, "trace-1");
        assert!(!config.record_events);
    }
}
