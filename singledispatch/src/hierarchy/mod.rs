//! Host type hierarchy consulted by dispatch.
//!
//! The hierarchy is the engine's view of the host type system: concrete
//! classes with ordered nominal bases, and interfaces (abstract capability
//! categories) whose membership is decided by nominal inheritance, by a
//! structural capability check, or by explicit registration.
//!
//! A [`Hierarchy`] is immutable once built. Building computes every
//! nominal MRO with C3 and the complete subtype relation, so dispatch
//! never re-derives membership per call.
//!
//! # Subtyping
//!
//! `c <: t` holds when:
//!
//! 1. `t` is in the nominal MRO of `c`, or
//! 2. `t` is an interface and
//!    - its structural requirement is met by `c` (every required
//!      capability is found walking the MRO of `c`, and the first class
//!      mentioning it provides rather than disables it), or
//!    - `c <: r` for a member `r` explicitly registered with `t`, or
//!    - `c <: s` for a direct nominal subclass `s` of `t`.
//!
//! # Module Structure
//!
//! - [`builder`] - Type declarations and hierarchy construction
//! - `c3` - C3 linearization
//! - `builtins` - A ready-made universe of builtin types and interfaces

mod builder;
mod builtins;
pub(crate) mod c3;

#[cfg(test)]
mod tests;

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

pub use builder::{HierarchyBuilder, TypeDecl};

/// Identifier of a type within a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    /// Create an id from a raw index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index of this id.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The two kinds of registration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A class values can be instances of.
    Concrete,
    /// An abstract capability category.
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Concrete => f.write_str("concrete"),
            TypeKind::Interface => f.write_str("interface"),
        }
    }
}

/// A declared type together with its computed linearization.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// The id of this type.
    pub id: ClassId,
    /// The declared name.
    pub name: String,
    /// Concrete class or interface.
    pub kind: TypeKind,
    /// Direct nominal bases, in declaration order.
    pub bases: Vec<ClassId>,
    /// Nominal method resolution order, starting with this type.
    pub mro: Vec<ClassId>,
    /// Direct nominal subclasses, in declaration order.
    pub subclasses: Vec<ClassId>,
    /// Explicitly registered members (interfaces only).
    pub members: Vec<ClassId>,
    pub(crate) provides: FxHashSet<String>,
    pub(crate) disables: FxHashSet<String>,
    pub(crate) requires: Vec<String>,
}

impl TypeInfo {
    /// Whether this type is an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// An immutable, fully linearized type hierarchy.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    types: Vec<TypeInfo>,
    by_name: FxHashMap<String, ClassId>,
    /// For each type, every type it is a subtype of (itself included).
    supertypes: Vec<FxHashSet<ClassId>>,
}

impl Hierarchy {
    /// Start declaring a new hierarchy.
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    /// A hierarchy of builtin types modelled on a dynamic language.
    ///
    /// See the `builtins` module for the full list.
    pub fn builtins() -> Self {
        builtins::builtin_hierarchy()
            .expect("builtin hierarchy declarations are consistent")
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no type is declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Look up a type by id.
    pub fn get(&self, id: ClassId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    /// Look up a type id by name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// The name of a type, or `"<unknown>"` for an id not in this hierarchy.
    pub fn name(&self, id: ClassId) -> &str {
        self.get(id).map_or("<unknown>", |info| info.name.as_str())
    }

    /// The kind of a type, if declared.
    pub fn kind(&self, id: ClassId) -> Option<TypeKind> {
        self.get(id).map(|info| info.kind)
    }

    /// Whether `id` names a declared interface.
    pub fn is_interface(&self, id: ClassId) -> bool {
        self.get(id).is_some_and(TypeInfo::is_interface)
    }

    /// The nominal MRO of a type; empty for an unknown id.
    pub fn mro(&self, id: ClassId) -> &[ClassId] {
        self.get(id).map_or(&[], |info| info.mro.as_slice())
    }

    /// Direct nominal bases of a type.
    pub fn bases(&self, id: ClassId) -> &[ClassId] {
        self.get(id).map_or(&[], |info| info.bases.as_slice())
    }

    /// Direct nominal subclasses of a type.
    pub fn subclasses(&self, id: ClassId) -> &[ClassId] {
        self.get(id).map_or(&[], |info| info.subclasses.as_slice())
    }

    /// Whether `cls` is a subtype of `of`, nominally or through interface
    /// membership.
    pub fn is_subclass(&self, cls: ClassId, of: ClassId) -> bool {
        self.supertypes
            .get(cls.index())
            .is_some_and(|supers| supers.contains(&of))
    }

    /// Interfaces `cls` belongs to, in declaration order.
    pub fn interfaces_of(&self, cls: ClassId) -> Vec<ClassId> {
        let Some(supers) = self.supertypes.get(cls.index()) else {
            return Vec::new();
        };
        let mut interfaces: Vec<ClassId> = supers
            .iter()
            .copied()
            .filter(|&t| t != cls && self.is_interface(t))
            .collect();
        interfaces.sort_unstable();
        interfaces
    }

    /// All concrete types, in declaration order.
    pub fn concrete_types(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.types
            .iter()
            .filter(|info| info.kind == TypeKind::Concrete)
            .map(|info| info.id)
    }

    /// Render a list of ids as names, for diagnostics.
    pub fn names(&self, ids: &[ClassId]) -> Vec<&str> {
        ids.iter().map(|&id| self.name(id)).collect()
    }

    pub(crate) fn from_parts(
        types: Vec<TypeInfo>,
        by_name: FxHashMap<String, ClassId>,
        supertypes: Vec<FxHashSet<ClassId>>,
    ) -> Self {
        Self {
            types,
            by_name,
            supertypes,
        }
    }
}

/// Computes the subtype relation over a set of linearized types.
///
/// Used while building: the relation is evaluated against the
/// memberships registered so far, then frozen into [`Hierarchy`].
pub(crate) struct SubtypeOracle<'a> {
    types: &'a [TypeInfo],
    memo: FxHashMap<(ClassId, ClassId), bool>,
}

impl<'a> SubtypeOracle<'a> {
    pub(crate) fn new(types: &'a [TypeInfo]) -> Self {
        Self {
            types,
            memo: FxHashMap::default(),
        }
    }

    pub(crate) fn is_subclass(&mut self, cls: ClassId, of: ClassId) -> bool {
        if let Some(&known) = self.memo.get(&(cls, of)) {
            return known;
        }
        let answer = self.compute(cls, of);
        self.memo.insert((cls, of), answer);
        answer
    }

    fn compute(&mut self, cls: ClassId, of: ClassId) -> bool {
        let types = self.types;
        let (Some(info), Some(target)) = (types.get(cls.index()), types.get(of.index())) else {
            return false;
        };
        if info.mro.contains(&of) {
            return true;
        }
        if target.kind != TypeKind::Interface {
            return false;
        }
        if !target.requires.is_empty() && self.satisfies(info, &target.requires) {
            return true;
        }
        if target.members.iter().any(|&member| self.is_subclass(cls, member)) {
            return true;
        }
        target.subclasses.iter().any(|&sub| self.is_subclass(cls, sub))
    }

    /// Structural check: every capability resolves to a providing class
    /// along the MRO.
    fn satisfies(&self, info: &TypeInfo, required: &[String]) -> bool {
        required.iter().all(|capability| {
            for &ancestor in &info.mro {
                let ancestor = &self.types[ancestor.index()];
                if ancestor.disables.contains(capability) {
                    return false;
                }
                if ancestor.provides.contains(capability) {
                    return true;
                }
            }
            false
        })
    }
}
