//! Type declarations and hierarchy construction.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::{c3, ClassId, Hierarchy, SubtypeOracle, TypeInfo, TypeKind};
use crate::error::{HierarchyError, HierarchyResult};

/// Declaration of a single type.
///
/// ```
/// use singledispatch::{Hierarchy, TypeDecl};
///
/// let mut builder = Hierarchy::builder();
/// let object = builder.declare(TypeDecl::concrete("object").provides(["hash"])).unwrap();
/// let sized = builder.declare(TypeDecl::interface("Sized").base(object).requires(["len"])).unwrap();
/// let list = builder
///     .declare(TypeDecl::concrete("list").base(object).provides(["len"]).disables(["hash"]))
///     .unwrap();
/// let hierarchy = builder.build().unwrap();
/// assert!(hierarchy.is_subclass(list, sized));
/// ```
#[derive(Debug, Clone)]
pub struct TypeDecl {
    name: String,
    kind: TypeKind,
    bases: Vec<ClassId>,
    provides: Vec<String>,
    disables: Vec<String>,
    requires: Vec<String>,
}

impl TypeDecl {
    /// Declare a concrete class.
    pub fn concrete(name: impl Into<String>) -> Self {
        Self::new(name.into(), TypeKind::Concrete)
    }

    /// Declare an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name.into(), TypeKind::Interface)
    }

    fn new(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            bases: Vec::new(),
            provides: Vec::new(),
            disables: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Append a nominal base.
    pub fn base(mut self, base: ClassId) -> Self {
        self.bases.push(base);
        self
    }

    /// Append several nominal bases, in order.
    pub fn bases(mut self, bases: impl IntoIterator<Item = ClassId>) -> Self {
        self.bases.extend(bases);
        self
    }

    /// Capabilities this type defines.
    pub fn provides<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides.extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Capabilities this type explicitly switches off, hiding any
    /// definition inherited from its bases.
    pub fn disables<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disables.extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Capabilities that make a type a structural member of this
    /// interface. Ignored for concrete types.
    pub fn requires<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(capabilities.into_iter().map(Into::into));
        self
    }
}

/// Incrementally declares types and builds a [`Hierarchy`].
///
/// Bases must be declared before the types deriving from them, so the
/// nominal graph is acyclic by construction. Each declaration is
/// linearized immediately and rejected if no consistent MRO exists.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    types: Vec<TypeInfo>,
    by_name: FxHashMap<String, ClassId>,
    memberships: Vec<(ClassId, ClassId)>,
}

impl HierarchyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type, returning its id.
    pub fn declare(&mut self, decl: TypeDecl) -> HierarchyResult<ClassId> {
        if self.by_name.contains_key(&decl.name) {
            return Err(HierarchyError::DuplicateName { name: decl.name });
        }

        let mut seen = FxHashSet::default();
        for &base in &decl.bases {
            let Some(info) = self.types.get(base.index()) else {
                return Err(HierarchyError::UnknownBase {
                    name: decl.name,
                    base,
                });
            };
            if !seen.insert(base) {
                return Err(HierarchyError::DuplicateBase {
                    name: decl.name,
                    base: info.name.clone(),
                });
            }
        }

        let id = ClassId::new(self.types.len() as u32);

        let mut seqs = Vec::with_capacity(decl.bases.len() + 2);
        seqs.push(vec![id]);
        seqs.extend(decl.bases.iter().map(|base| self.types[base.index()].mro.clone()));
        seqs.push(decl.bases.clone());
        let Some(mro) = c3::merge(seqs) else {
            return Err(HierarchyError::InconsistentMro { name: decl.name });
        };

        for &base in &decl.bases {
            self.types[base.index()].subclasses.push(id);
        }

        self.by_name.insert(decl.name.clone(), id);
        self.types.push(TypeInfo {
            id,
            name: decl.name,
            kind: decl.kind,
            bases: decl.bases,
            mro,
            subclasses: Vec::new(),
            members: Vec::new(),
            provides: decl.provides.into_iter().collect(),
            disables: decl.disables.into_iter().collect(),
            requires: decl.requires,
        });
        Ok(id)
    }

    /// Explicitly register `member` as belonging to `interface`.
    ///
    /// Cycle checks happen in [`HierarchyBuilder::build`], once every
    /// membership is known.
    pub fn register_member(
        &mut self,
        interface: ClassId,
        member: ClassId,
    ) -> HierarchyResult<&mut Self> {
        let Some(info) = self.types.get(interface.index()) else {
            return Err(HierarchyError::UnknownType(interface));
        };
        if info.kind != TypeKind::Interface {
            return Err(HierarchyError::NotAnInterface {
                name: info.name.clone(),
            });
        }
        if self.types.get(member.index()).is_none() {
            return Err(HierarchyError::UnknownType(member));
        }
        self.memberships.push((interface, member));
        Ok(self)
    }

    /// Look up an already declared type by name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Freeze the declarations into a [`Hierarchy`].
    pub fn build(mut self) -> HierarchyResult<Hierarchy> {
        // Apply memberships in order; each one must not make the interface
        // a subtype of its own member.
        for (interface, member) in std::mem::take(&mut self.memberships) {
            let cyclic = interface == member
                || SubtypeOracle::new(&self.types).is_subclass(interface, member);
            if cyclic {
                return Err(HierarchyError::MembershipCycle {
                    interface: self.types[interface.index()].name.clone(),
                    member: self.types[member.index()].name.clone(),
                });
            }
            let members = &mut self.types[interface.index()].members;
            if !members.contains(&member) {
                members.push(member);
            }
        }

        let supertypes = {
            let mut oracle = SubtypeOracle::new(&self.types);
            let ids: Vec<ClassId> = self.types.iter().map(|info| info.id).collect();
            ids.iter()
                .map(|&cls| {
                    ids.iter()
                        .copied()
                        .filter(|&of| oracle.is_subclass(cls, of))
                        .collect::<FxHashSet<_>>()
                })
                .collect::<Vec<_>>()
        };

        debug!(types = self.types.len(), "built type hierarchy");
        Ok(Hierarchy::from_parts(self.types, self.by_name, supertypes))
    }
}
