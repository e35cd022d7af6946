//! Error types for hierarchy construction, registration and configuration.
//!
//! Resolution itself never fails: a type with no matching registration
//! falls back to the default implementation. Every error in this module is
//! raised when the host model or a registration is set up, never at call
//! time.

use std::path::PathBuf;

use thiserror::Error;

use crate::hierarchy::ClassId;

/// Errors raised while declaring or building a [`crate::Hierarchy`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("type `{name}` is already declared")]
    DuplicateName { name: String },

    #[error("type `{name}` names base {base:?}, which is not declared")]
    UnknownBase { name: String, base: ClassId },

    #[error("type `{name}` lists base `{base}` more than once")]
    DuplicateBase { name: String, base: String },

    #[error("`{name}` is not an interface; only interfaces accept members")]
    NotAnInterface { name: String },

    #[error("no type with id {0:?} is declared")]
    UnknownType(ClassId),

    #[error("cannot create a consistent method resolution order for `{name}`")]
    InconsistentMro { name: String },

    #[error("registering `{member}` as a member of `{interface}` would create an inheritance cycle")]
    MembershipCycle { interface: String, member: String },
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Configuration errors raised by registration on a dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("cannot register {0:?}: the type is not part of this hierarchy")]
    UnknownType(ClassId),

    #[error("cannot register `{0}`: no type with that name is declared")]
    UnknownTypeName(String),

    #[error("ambiguous dispatch for `{ty}`: `{first}` or `{second}`")]
    Ambiguous {
        /// The concrete type whose resolution became ambiguous.
        ty: String,
        /// The key that would be matched first.
        first: String,
        /// The unrelated, equally specific key found next.
        second: String,
    },
}

/// Result type for registration.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while loading a [`crate::DispatchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dispatch configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
