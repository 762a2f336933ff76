//! Property bags: own slots plus an optional inherited prototype bag.
//!
//! A bag backs both sides of a form: the target's own fields and methods,
//! and the data container holding the field values. Slots are kept in a
//! `BTreeMap` so key listings are deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, PropertyKey};

/// serde_json requires string map keys but `PropertyKey` is an enum, so
/// slots travel as a sorted sequence of `[key, slot]` pairs.
mod slots_as_seq {
    use super::{BTreeMap, PropertyKey, PropertySlot};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<PropertyKey, PropertySlot>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&PropertyKey, &PropertySlot)> = map.iter().collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<PropertyKey, PropertySlot>, D::Error> {
        let pairs: Vec<(PropertyKey, PropertySlot)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// PropertySlot
// ---------------------------------------------------------------------------

/// A stored value with its attribute flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySlot {
    pub value: FieldValue,
    pub writable: bool,
    /// Non-enumerable slots are left out of key listings.
    pub enumerable: bool,
}

impl PropertySlot {
    /// Writable, enumerable slot.
    pub fn data(value: FieldValue) -> Self {
        Self {
            value,
            writable: true,
            enumerable: true,
        }
    }

    /// Enumerable slot that rejects assignment.
    pub fn read_only(value: FieldValue) -> Self {
        Self {
            value,
            writable: false,
            enumerable: true,
        }
    }

    /// Writable slot hidden from key listings.
    pub fn hidden(value: FieldValue) -> Self {
        Self {
            value,
            writable: true,
            enumerable: false,
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyBag
// ---------------------------------------------------------------------------

/// Own slots, an optional prototype, and an extensibility flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    #[serde(with = "slots_as_seq")]
    slots: BTreeMap<PropertyKey, PropertySlot>,
    prototype: Option<Box<PropertyBag>>,
    extensible: bool,
}

impl Default for PropertyBag {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
            prototype: None,
            extensible: true,
        }
    }
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bag inheriting from `proto`.
    pub fn with_prototype(proto: PropertyBag) -> Self {
        Self {
            prototype: Some(Box::new(proto)),
            ..Self::default()
        }
    }

    /// Builder form of [`PropertyBag::define`] with a writable, enumerable slot.
    pub fn with(mut self, key: impl Into<PropertyKey>, value: impl Into<FieldValue>) -> Self {
        self.slots
            .insert(key.into(), PropertySlot::data(value.into()));
        self
    }

    /// Builder form of [`PropertyBag::define`].
    pub fn with_slot(mut self, key: impl Into<PropertyKey>, slot: PropertySlot) -> Self {
        self.slots.insert(key.into(), slot);
        self
    }

    /// Define or replace an own slot. Returns `false` when the key is new and
    /// the bag is not extensible.
    pub fn define(&mut self, key: PropertyKey, slot: PropertySlot) -> bool {
        if !self.extensible && !self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, slot);
        true
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<&PropertySlot> {
        self.slots.get(key)
    }

    /// Own value for `key`, ignoring the prototype.
    pub fn own_value(&self, key: &PropertyKey) -> Option<&FieldValue> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Ordinary property read: own slot first, then up the prototype chain.
    pub fn lookup(&self, key: &PropertyKey) -> Option<&FieldValue> {
        let mut current = Some(self);
        while let Some(bag) = current {
            if let Some(slot) = bag.slots.get(key) {
                return Some(&slot.value);
            }
            current = bag.prototype.as_deref();
        }
        None
    }

    /// Own enumerable string keys: canonical integer keys in numeric order,
    /// then the remaining string keys. `"01"` and `"+1"` are not canonical.
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut int_keys: Vec<(u64, PropertyKey)> = Vec::new();
        let mut str_keys: Vec<PropertyKey> = Vec::new();

        for (key, slot) in &self.slots {
            if !slot.enumerable {
                continue;
            }
            if let PropertyKey::String(s) = key {
                match s.parse::<u64>() {
                    Ok(n) if n.to_string() == *s => int_keys.push((n, key.clone())),
                    _ => str_keys.push(key.clone()),
                }
            }
        }

        int_keys.sort_by_key(|(n, _)| *n);
        let mut result: Vec<PropertyKey> = int_keys.into_iter().map(|(_, k)| k).collect();
        result.extend(str_keys);
        result
    }

    /// Whether [`PropertyBag::keys`] would list `key`, without building the list.
    pub fn lists_key(&self, key: &PropertyKey) -> bool {
        key.is_string() && self.slots.get(key).is_some_and(|slot| slot.enumerable)
    }

    /// Ordinary assignment. Returns `false` and leaves the bag unchanged when
    /// the own or inherited slot is read-only, or the key is new and the bag
    /// is not extensible.
    pub fn assign(&mut self, key: PropertyKey, value: FieldValue) -> bool {
        if let Some(slot) = self.slots.get_mut(&key) {
            if !slot.writable {
                return false;
            }
            slot.value = value;
            return true;
        }
        if self.inherited_read_only(&key) || !self.extensible {
            return false;
        }
        self.slots.insert(key, PropertySlot::data(value));
        true
    }

    fn inherited_read_only(&self, key: &PropertyKey) -> bool {
        let mut current = self.prototype.as_deref();
        while let Some(bag) = current {
            if let Some(slot) = bag.slots.get(key) {
                return !slot.writable;
            }
            current = bag.prototype.as_deref();
        }
        false
    }

    pub fn prototype(&self) -> Option<&PropertyBag> {
        self.prototype.as_deref()
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    pub fn prevent_extensions(&mut self) {
        self.extensible = false;
    }

    /// Non-extensible with every own slot read-only.
    pub fn freeze(&mut self) {
        self.extensible = false;
        for slot in self.slots.values_mut() {
            slot.writable = false;
        }
    }

    pub fn is_frozen(&self) -> bool {
        !self.extensible && self.slots.values().all(|slot| !slot.writable)
    }

    /// Number of own slots, including hidden and symbol-keyed ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
