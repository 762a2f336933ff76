//! Transparent field proxy over a form.
//!
//! Reads resolve against the form's data container when the key is one of
//! the container's listed keys (own, enumerable, string-keyed) and against
//! the form's own properties otherwise. Presence is re-checked on every
//! read. Writes always land in the data container, even when the key names
//! an own property of the form, and report whether the container holds a
//! strictly equal value afterwards.
//!
//! ```
//! use form_accessor::{FieldValue, FormRecord, FunctionHandle, TransparentFieldProxy};
//!
//! let mut form = FormRecord::new()
//!     .with_field("name", "Ann")
//!     .with_property("greet", FieldValue::Function(FunctionHandle(1)));
//! let mut fields = TransparentFieldProxy::new(&mut form);
//!
//! assert_eq!(fields.get("name").unwrap(), FieldValue::from("Ann"));
//! assert!(fields.get("greet").unwrap().is_callable());
//! assert!(fields.set("age", 30).unwrap());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bag::PropertyBag;
use crate::config::{AccessorConfig, MissingDataPolicy};
use crate::error::AccessError;
use crate::target::FormTarget;
use crate::value::{FieldValue, PropertyKey};

pub const FORM_ACCESSOR_COMPONENT: &str = "form_accessor";

pub const EVENT_FIELD_READ: &str = "field_read";
pub const EVENT_FIELD_WRITE: &str = "field_write";
pub const EVENT_INVALID_TARGET: &str = "invalid_target";

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_MISMATCH: &str = "mismatch";
pub const OUTCOME_ERROR: &str = "error";

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// The namespace a field access resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Data,
    Target,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Target => f.write_str("target"),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessEvent
// ---------------------------------------------------------------------------

/// Structured event recorded for each read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub trace_id: String,
    pub component: String,
    pub event: String,
    pub key: PropertyKey,
    /// `None` when the access failed before a namespace was chosen.
    pub route: Option<Route>,
    pub outcome: String,
    pub error_code: Option<String>,
}

// ---------------------------------------------------------------------------
// TransparentFieldProxy
// ---------------------------------------------------------------------------

/// Routes field reads and writes between a form and its data container.
///
/// The proxy borrows its target for its whole lifetime and keeps no field
/// state of its own; only configuration and the audit trail live here.
#[derive(Debug)]
pub struct TransparentFieldProxy<'t, T: FormTarget + ?Sized> {
    target: &'t mut T,
    config: AccessorConfig,
    events: Vec<AccessEvent>,
    event_counts: BTreeMap<String, u64>,
}

impl<'t, T: FormTarget + ?Sized> TransparentFieldProxy<'t, T> {
    /// Wrap `target` with the default configuration.
    pub fn new(target: &'t mut T) -> Self {
        Self::with_config(target, AccessorConfig::default())
    }

    /// Wrap `target`. The container is not inspected until the first access.
    pub fn with_config(target: &'t mut T, config: AccessorConfig) -> Self {
        Self {
            target,
            config,
            events: Vec::new(),
            event_counts: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    pub fn target(&self) -> &T {
        &*self.target
    }

    /// Which namespace a read of `key` would resolve to right now.
    pub fn route(&self, key: impl Into<PropertyKey>) -> Result<Route, AccessError> {
        self.resolve_route(&key.into())
    }

    /// Read `key` without recording an event.
    pub fn peek(&self, key: impl Into<PropertyKey>) -> Result<FieldValue, AccessError> {
        let key = key.into();
        let route = self.resolve_route(&key)?;
        Ok(self.read_via(route, &key))
    }

    /// Read `key`: the container's value when the key is listed there, the
    /// form's own property otherwise, `Undefined` when neither has it.
    pub fn get(&mut self, key: impl Into<PropertyKey>) -> Result<FieldValue, AccessError> {
        let key = key.into();
        match self.resolve_route(&key) {
            Ok(route) => {
                let value = self.read_via(route, &key);
                self.record(EVENT_FIELD_READ, &key, Some(route), OUTCOME_OK, None);
                Ok(value)
            }
            Err(err) => {
                self.record_error(&key, &err);
                Err(err)
            }
        }
    }

    /// Write `value` into the data container under `key`.
    ///
    /// Returns whether the container's value for `key` is strictly equal to
    /// `value` after the write. `Ok(false)` is a write mismatch: a read-only
    /// slot, a non-extensible container, or a value like `NaN` that never
    /// equals itself.
    pub fn set(
        &mut self,
        key: impl Into<PropertyKey>,
        value: impl Into<FieldValue>,
    ) -> Result<bool, AccessError> {
        let key = key.into();
        let value = value.into();

        let written = self
            .target
            .data_mut()
            .map(|data| write_field(data, key.clone(), &value));

        match written {
            Some(matched) => {
                let outcome = if matched { OUTCOME_OK } else { OUTCOME_MISMATCH };
                self.record(EVENT_FIELD_WRITE, &key, Some(Route::Data), outcome, None);
                Ok(matched)
            }
            None => match self.config.missing_data {
                MissingDataPolicy::FailFast => {
                    let err = AccessError::InvalidTarget { key: key.clone() };
                    self.record_error(&key, &err);
                    Err(err)
                }
                MissingDataPolicy::TreatAsEmpty => {
                    self.record(EVENT_FIELD_WRITE, &key, None, OUTCOME_MISMATCH, None);
                    Ok(false)
                }
            },
        }
    }

    /// Drain accumulated events. At most `config.max_events` are retained;
    /// older ones are dropped first.
    pub fn drain_events(&mut self) -> Vec<AccessEvent> {
        std::mem::take(&mut self.events)
    }

    /// Event counters, keyed by event name.
    pub fn event_counts(&self) -> &BTreeMap<String, u64> {
        &self.event_counts
    }

    // -- Internal --

    fn resolve_route(&self, key: &PropertyKey) -> Result<Route, AccessError> {
        match self.target.data() {
            Some(data) if data.lists_key(key) => Ok(Route::Data),
            Some(_) => Ok(Route::Target),
            None => match self.config.missing_data {
                MissingDataPolicy::FailFast => {
                    Err(AccessError::InvalidTarget { key: key.clone() })
                }
                MissingDataPolicy::TreatAsEmpty => Ok(Route::Target),
            },
        }
    }

    fn read_via(&self, route: Route, key: &PropertyKey) -> FieldValue {
        let found = match route {
            Route::Data => self.target.data().and_then(|data| data.own_value(key)),
            Route::Target => self.target.own_property(key),
        };
        found.cloned().unwrap_or(FieldValue::Undefined)
    }

    fn record_error(&mut self, key: &PropertyKey, err: &AccessError) {
        self.record(
            EVENT_INVALID_TARGET,
            key,
            None,
            OUTCOME_ERROR,
            Some(err.stable_code()),
        );
    }

    fn record(
        &mut self,
        event: &str,
        key: &PropertyKey,
        route: Option<Route>,
        outcome: &str,
        error_code: Option<&str>,
    ) {
        if !self.config.record_events {
            return;
        }
        self.events.push(AccessEvent {
            trace_id: self.config.trace_id.clone(),
            component: FORM_ACCESSOR_COMPONENT.to_string(),
            event: event.to_string(),
            key: key.clone(),
            route,
            outcome: outcome.to_string(),
            error_code: error_code.map(str::to_string),
        });
        if self.events.len() > self.config.max_events {
            self.events.remove(0);
        }
        *self.event_counts.entry(event.to_string()).or_insert(0) += 1;
    }
}

/// Assign into the container, then compare what a read of `key` on the
/// container now yields (prototype included) against `value`.
fn write_field(data: &mut PropertyBag, key: PropertyKey, value: &FieldValue) -> bool {
    let lookup_key = key.clone();
    data.assign(key, value.clone());
    match data.lookup(&lookup_key) {
        Some(stored) => stored.strict_equals(value),
        None => value.is_undefined(),
    }
}
