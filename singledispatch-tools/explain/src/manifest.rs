//! Hierarchy manifests.
//!
//! A manifest declares a type hierarchy, a dispatch configuration, and the
//! keys a generic function registers, in TOML:
//!
//! ```toml
//! registrations = ["Shape", "Drawable"]
//!
//! [dispatch]
//! ambiguity = "reject"
//!
//! [[type]]
//! name = "object"
//!
//! [[type]]
//! name = "Drawable"
//! interface = true
//! bases = ["object"]
//! requires = ["draw"]
//!
//! [[type]]
//! name = "Shape"
//! bases = ["object"]
//! provides = ["draw"]
//! ```
//!
//! Types are declared in file order, so bases must appear before the types
//! that inherit from them. `members` lists explicit interface members and
//! may name types declared later.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use singledispatch::{DispatchConfig, Hierarchy, HierarchyBuilder, HierarchyError, TypeDecl};
use thiserror::Error;
use tracing::debug;

/// Errors in a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("type `{ty}` names unknown base `{base}`")]
    UnknownBase { ty: String, base: String },

    #[error("interface `{interface}` names unknown member `{member}`")]
    UnknownMember { interface: String, member: String },

    #[error("`{ty}` lists members but is not an interface")]
    MembersOnConcrete { ty: String },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Result type for manifest handling.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// One `[[type]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeEntry {
    /// Type name.
    pub name: String,
    /// Declare an interface rather than a concrete class.
    pub interface: bool,
    /// Nominal bases, by name.
    pub bases: Vec<String>,
    /// Capabilities the type defines.
    pub provides: Vec<String>,
    /// Capabilities the type explicitly switches off.
    pub disables: Vec<String>,
    /// Structural requirements (interfaces only).
    pub requires: Vec<String>,
    /// Explicit members (interfaces only).
    pub members: Vec<String>,
}

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Dispatch configuration.
    pub dispatch: DispatchConfig,
    /// Type declarations, in order.
    #[serde(rename = "type")]
    pub types: Vec<TypeEntry>,
    /// Registration keys, in registration order.
    pub registrations: Vec<String>,
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(source: &str) -> ManifestResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a manifest file.
    pub fn load(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Build the declared hierarchy.
    pub fn build_hierarchy(&self) -> ManifestResult<Hierarchy> {
        let mut builder = HierarchyBuilder::new();
        let mut ids = Vec::with_capacity(self.types.len());

        for entry in &self.types {
            let mut decl = if entry.interface {
                TypeDecl::interface(&entry.name)
            } else {
                TypeDecl::concrete(&entry.name)
            };
            for base in &entry.bases {
                let id = builder.lookup(base).ok_or_else(|| ManifestError::UnknownBase {
                    ty: entry.name.clone(),
                    base: base.clone(),
                })?;
                decl = decl.base(id);
            }
            decl = decl
                .provides(&entry.provides)
                .disables(&entry.disables)
                .requires(&entry.requires);
            ids.push(builder.declare(decl)?);
        }

        for (entry, &interface) in self.types.iter().zip(&ids) {
            if entry.members.is_empty() {
                continue;
            }
            if !entry.interface {
                return Err(ManifestError::MembersOnConcrete {
                    ty: entry.name.clone(),
                });
            }
            for member in &entry.members {
                let id = builder.lookup(member).ok_or_else(|| ManifestError::UnknownMember {
                    interface: entry.name.clone(),
                    member: member.clone(),
                })?;
                builder.register_member(interface, id)?;
            }
        }

        let hierarchy = builder.build()?;
        debug!(types = hierarchy.len(), "built hierarchy from manifest");
        Ok(hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use singledispatch::AmbiguityPolicy;

    use super::*;

    const SHAPES: &str = r#"
registrations = ["Shape"]

[dispatch]
ambiguity = "registration-order"

[[type]]
name = "object"

[[type]]
name = "Drawable"
interface = true
bases = ["object"]
requires = ["draw"]
members = ["Sprite"]

[[type]]
name = "Shape"
bases = ["object"]
provides = ["draw"]

[[type]]
name = "Sprite"
bases = ["object"]
"#;

    #[test]
    fn test_parse() {
        let manifest = Manifest::from_toml_str(SHAPES).unwrap();
        assert_eq!(manifest.dispatch.ambiguity, AmbiguityPolicy::RegistrationOrder);
        assert_eq!(manifest.types.len(), 4);
        assert_eq!(manifest.types[1].requires, vec!["draw".to_string()]);
        assert_eq!(manifest.registrations, vec!["Shape".to_string()]);
    }

    #[test]
    fn test_build_hierarchy() {
        let h = Manifest::from_toml_str(SHAPES).unwrap().build_hierarchy().unwrap();
        let drawable = h.lookup("Drawable").unwrap();
        assert!(h.is_subclass(h.lookup("Shape").unwrap(), drawable));
        assert!(h.is_subclass(h.lookup("Sprite").unwrap(), drawable));
        assert!(!h.is_subclass(h.lookup("object").unwrap(), drawable));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::from_toml_str("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert!(manifest.build_hierarchy().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_base() {
        let source = r#"
[[type]]
name = "Child"
bases = ["Parent"]
"#;
        let err = Manifest::from_toml_str(source).unwrap().build_hierarchy().unwrap_err();
        assert_eq!(err.to_string(), "type `Child` names unknown base `Parent`");
    }

    #[test]
    fn test_members_on_concrete() {
        let source = r#"
[[type]]
name = "A"
members = ["A"]
"#;
        let err = Manifest::from_toml_str(source).unwrap().build_hierarchy().unwrap_err();
        assert!(matches!(err, ManifestError::MembersOnConcrete { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let source = r#"
[[type]]
name = "A"
parents = ["B"]
"#;
        assert!(matches!(
            Manifest::from_toml_str(source),
            Err(ManifestError::Parse(_))
        ));
    }
}
