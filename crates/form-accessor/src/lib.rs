#![forbid(unsafe_code)]

//! Field access for form-like records whose values live in a nested data
//! container. A [`TransparentFieldProxy`] lets callers read and write those
//! fields as if they were the form's own, falling back to the form's own
//! properties and methods for keys the container does not hold.

pub mod bag;
pub mod config;
pub mod error;
pub mod proxy;
pub mod target;
pub mod value;

pub use bag::{PropertyBag, PropertySlot};
pub use config::{AccessorConfig, MissingDataPolicy};
pub use error::{AccessError, ConfigError};
pub use proxy::{AccessEvent, Route, TransparentFieldProxy};
pub use target::{FormRecord, FormTarget};
pub use value::{FieldValue, FunctionHandle, ObjectHandle, PropertyKey, SymbolId};
