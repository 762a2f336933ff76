use thiserror::Error;

use crate::value::PropertyKey;

pub const ERROR_INVALID_TARGET: &str = "FA-ACCESS-0001";
pub const ERROR_INVALID_CONFIG: &str = "FA-CONFIG-0001";

/// Errors surfaced by field reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("invalid target: no data container while accessing `{key}`")]
    InvalidTarget { key: PropertyKey },
}

impl AccessError {
    pub fn stable_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => ERROR_INVALID_TARGET,
        }
    }
}

/// Errors from loading an [`AccessorConfig`](crate::config::AccessorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid accessor config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn stable_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => ERROR_INVALID_CONFIG,
        }
    }
}
