//! Property keys and field values shared by the record model and the proxy.
//!
//! Objects and functions are carried as handles, so comparing two values
//! compares references for those variants and contents for primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PropertyKey
// ---------------------------------------------------------------------------

/// Unique symbol identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// A property key: either a string or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    String(String),
    Symbol(SymbolId),
}

impl PropertyKey {
    /// String keys are the only ones a key listing reports.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<SymbolId> for PropertyKey {
    fn from(id: SymbolId) -> Self {
        Self::Symbol(id)
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque reference to an object owned outside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u32);

/// Opaque reference to a callable (a form's method).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionHandle(pub u32);

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A value stored on a form or in its data container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(SymbolId),
    Object(ObjectHandle),
    Function(FunctionHandle),
}

impl FieldValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }

    /// Strict equality (`===`).
    ///
    /// Integers and floats are both numbers, so `Int(1)` equals `Float(1.0)`.
    /// `NaN` never equals itself and `0.0` equals `-0.0`.
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Float(a), Self::Float(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_nan() => write!(f, "NaN"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Symbol(id) => write!(f, "Symbol({})", id.0),
            Self::Object(h) => write!(f, "[object#{}]", h.0),
            Self::Function(h) => write!(f, "[function#{}]", h.0),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_key_from_str_and_display() {
        let k: PropertyKey = "name".into();
        assert_eq!(k, PropertyKey::String("name".to_string()));
        assert_eq!(k.to_string(), "name");
        assert_eq!(PropertyKey::Symbol(SymbolId(4)).to_string(), "Symbol(4)");
    }

    #[test]
    fn string_keys_sort_before_symbols() {
        assert!(PropertyKey::from("z") < PropertyKey::Symbol(SymbolId(0)));
    }

    #[test]
    fn strict_equals_numbers_across_representations() {
        assert!(FieldValue::Int(1).strict_equals(&FieldValue::Float(1.0)));
        assert!(FieldValue::Float(0.0).strict_equals(&FieldValue::Float(-0.0)));
        assert!(!FieldValue::Int(1).strict_equals(&FieldValue::Float(1.5)));
    }

    #[test]
    fn nan_is_not_strictly_equal_to_itself() {
        let nan = FieldValue::Float(f64::NAN);
        assert!(!nan.strict_equals(&nan));
    }

    #[test]
    fn objects_compare_by_handle() {
        let a = FieldValue::Object(ObjectHandle(1));
        assert!(a.strict_equals(&FieldValue::Object(ObjectHandle(1))));
        assert!(!a.strict_equals(&FieldValue::Object(ObjectHandle(2))));
    }

    #[test]
    fn strings_and_numbers_never_equal() {
        assert!(!FieldValue::from("1").strict_equals(&FieldValue::Int(1)));
    }

    #[test]
    fn display_and_type_names() {
        assert_eq!(FieldValue::Undefined.to_string(), "undefined");
        assert_eq!(FieldValue::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(FieldValue::Function(FunctionHandle(2)).to_string(), "[function#2]");
        assert_eq!(FieldValue::Float(2.5).type_name(), "number");
        assert!(FieldValue::Function(FunctionHandle(0)).is_callable());
    }
}
