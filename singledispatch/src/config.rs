//! Dispatch configuration.
//!
//! Controls how ambiguity between unrelated interface registrations is
//! handled and whether resolutions are cached.
//!
//! ```toml
//! ambiguity = "registration-order"
//! cache = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a [`crate::Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// What to do when two unrelated interfaces match a type equally well.
    pub ambiguity: AmbiguityPolicy,

    /// Cache resolutions per concrete runtime type.
    pub cache: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::Reject,
            cache: true,
        }
    }
}

impl DispatchConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// Ambiguity handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Reject a registration that makes any known type resolve ambiguously.
    #[default]
    Reject,
    /// Accept such registrations; the key registered first wins.
    RegistrationOrder,
}
