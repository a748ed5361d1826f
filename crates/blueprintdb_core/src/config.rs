//! Store configuration.
//!
//! # Responsibility
//! - Carry the namespace, untitled prefix and auto-save debounce used by the
//!   document store and service.
//!
//! # Invariants
//! - A validated namespace is non-blank and contains no `-` separator, so a
//!   key splits unambiguously into namespace and document name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "blueprintdb";
pub const DEFAULT_UNTITLED_PREFIX: &str = "Untitled";
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 500;

/// Document store settings; every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub namespace: String,
    pub untitled_prefix: String,
    pub autosave_debounce_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            untitled_prefix: DEFAULT_UNTITLED_PREFIX.to_string(),
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNamespace(String),
    InvalidUntitledPrefix(String),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNamespace(value) => write!(
                f,
                "invalid namespace `{value}`; expected a non-empty value without `-`"
            ),
            Self::InvalidUntitledPrefix(value) => {
                write!(f, "invalid untitled prefix `{value}`")
            }
            Self::Parse(message) => write!(f, "invalid store config: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Parses a JSON config object; missing fields take defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.namespace.trim();
        if namespace.is_empty() || namespace != self.namespace || namespace.contains('-') {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        if self.untitled_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidUntitledPrefix(
                self.untitled_prefix.clone(),
            ));
        }
        Ok(())
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}
