//! Form records: a form's own properties plus the data container holding
//! its field values.

use serde::{Deserialize, Serialize};

use crate::bag::PropertyBag;
use crate::value::{FieldValue, PropertyKey};

/// A form-like object a [`TransparentFieldProxy`](crate::proxy::TransparentFieldProxy)
/// can wrap.
pub trait FormTarget {
    /// Ordinary read of the form's own property (prototype chain included).
    fn own_property(&self, key: &PropertyKey) -> Option<&FieldValue>;

    /// The data container, or `None` when the form has none.
    fn data(&self) -> Option<&PropertyBag>;

    fn data_mut(&mut self) -> Option<&mut PropertyBag>;
}

/// A form with its own properties and methods alongside a data container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub properties: PropertyBag,
    pub data: Option<PropertyBag>,
}

impl FormRecord {
    /// A form with an empty data container.
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(),
            data: Some(PropertyBag::new()),
        }
    }

    /// A form whose data container is missing.
    pub fn without_data() -> Self {
        Self {
            properties: PropertyBag::new(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: PropertyBag) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_properties(mut self, properties: PropertyBag) -> Self {
        self.properties = properties;
        self
    }

    /// Add a field value to the data container, creating it if missing.
    pub fn with_field(mut self, key: impl Into<PropertyKey>, value: impl Into<FieldValue>) -> Self {
        let data = self.data.take().unwrap_or_default();
        self.data = Some(data.with(key, value));
        self
    }

    /// Add an own property or method to the form.
    pub fn with_property(
        mut self,
        key: impl Into<PropertyKey>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.properties = self.properties.with(key, value);
        self
    }
}

impl Default for FormRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl FormTarget for FormRecord {
    fn own_property(&self, key: &PropertyKey) -> Option<&FieldValue> {
        self.properties.lookup(key)
    }

    fn data(&self) -> Option<&PropertyBag> {
        self.data.as_ref()
    }

    fn data_mut(&mut self) -> Option<&mut PropertyBag> {
        self.data.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FunctionHandle;

    #[test]
    fn new_record_has_empty_container() {
        let record = FormRecord::new();
        assert!(record.data().is_some_and(PropertyBag::is_empty));
    }

    #[test]
    fn default_record_has_empty_container() {
        assert_eq!(FormRecord::default(), FormRecord::new());
        assert!(FormRecord::default().data().is_some());
    }

    #[test]
    fn without_data_has_no_container() {
        assert!(FormRecord::without_data().data().is_none());
    }

    #[test]
    fn builder_separates_fields_from_properties() {
        let greet = FieldValue::Function(FunctionHandle(1));
        let record = FormRecord::new()
            .with_field("name", "Ann")
            .with_property("greet", greet.clone());
        let name = PropertyKey::from("name");
        let greet_key = PropertyKey::from("greet");
        assert!(record.own_property(&name).is_none());
        assert_eq!(record.own_property(&greet_key), Some(&greet));
        assert!(record.data().is_some_and(|d| d.has_own(&name)));
    }

    #[test]
    fn own_property_reads_inherited_methods() {
        let proto = PropertyBag::new().with("submit", FieldValue::Function(FunctionHandle(9)));
        let record = FormRecord::new().with_properties(PropertyBag::with_prototype(proto));
        assert_eq!(
            record.own_property(&"submit".into()),
            Some(&FieldValue::Function(FunctionHandle(9)))
        );
    }

    #[test]
    fn serde_round_trip() {
        let record = FormRecord::new()
            .with_field("name", "Ann")
            .with_property("greet", FieldValue::Function(FunctionHandle(1)));
        let json = serde_json::to_string(&record).unwrap();
        let back: FormRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
