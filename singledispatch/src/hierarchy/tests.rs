//! Tests for hierarchy construction and subtyping.

use pretty_assertions::assert_eq;

use super::*;
use crate::error::HierarchyError;

fn id(h: &Hierarchy, name: &str) -> ClassId {
    h.lookup(name).unwrap_or_else(|| panic!("type `{}` not declared", name))
}

fn mro_names<'h>(h: &'h Hierarchy, name: &str) -> Vec<&'h str> {
    h.names(h.mro(id(h, name)))
}

#[test]
fn test_builtin_mros() {
    let h = Hierarchy::builtins();
    assert_eq!(mro_names(&h, "object"), vec!["object"]);
    assert_eq!(mro_names(&h, "bool"), vec!["bool", "int", "object"]);
    assert_eq!(mro_names(&h, "tuple"), vec!["tuple", "object"]);
    assert_eq!(
        mro_names(&h, "Sequence"),
        vec!["Sequence", "Reversible", "Collection", "Sized", "Iterable", "Container", "object"]
    );
}

#[test]
fn test_builtin_kinds() {
    let h = Hierarchy::builtins();
    assert_eq!(h.kind(id(&h, "list")), Some(TypeKind::Concrete));
    assert_eq!(h.kind(id(&h, "Sequence")), Some(TypeKind::Interface));
    assert!(h.concrete_types().all(|c| !h.is_interface(c)));
    assert_eq!(h.concrete_types().count(), 13);
}

#[test]
fn test_nominal_subclass() {
    let h = Hierarchy::builtins();
    assert!(h.is_subclass(id(&h, "bool"), id(&h, "int")));
    assert!(h.is_subclass(id(&h, "bool"), id(&h, "object")));
    assert!(h.is_subclass(id(&h, "int"), id(&h, "int")));
    assert!(!h.is_subclass(id(&h, "int"), id(&h, "bool")));
    assert!(!h.is_subclass(id(&h, "str"), id(&h, "int")));
}

#[test]
fn test_structural_membership() {
    let h = Hierarchy::builtins();
    let sized = id(&h, "Sized");
    assert!(h.is_subclass(id(&h, "list"), sized));
    assert!(h.is_subclass(id(&h, "dict"), sized));
    assert!(!h.is_subclass(id(&h, "int"), sized));
    assert!(!h.is_subclass(id(&h, "NoneType"), sized));
}

#[test]
fn test_disabled_capability_blocks_structural_membership() {
    let h = Hierarchy::builtins();
    let hashable = id(&h, "Hashable");
    assert!(h.is_subclass(id(&h, "tuple"), hashable));
    assert!(h.is_subclass(id(&h, "NoneType"), hashable));
    assert!(!h.is_subclass(id(&h, "list"), hashable));
    assert!(!h.is_subclass(id(&h, "dict"), hashable));
    assert!(!h.is_subclass(id(&h, "set"), hashable));
}

#[test]
fn test_explicit_membership() {
    let h = Hierarchy::builtins();
    let sequence = id(&h, "Sequence");
    assert!(h.is_subclass(id(&h, "tuple"), sequence));
    assert!(h.is_subclass(id(&h, "str"), sequence));
    assert!(!h.is_subclass(id(&h, "dict"), sequence));
    assert!(!h.is_subclass(id(&h, "set"), sequence));
}

#[test]
fn test_membership_through_registered_subinterface() {
    let h = Hierarchy::builtins();
    // list is registered with MutableSequence only.
    assert!(h.is_subclass(id(&h, "list"), id(&h, "MutableSequence")));
    assert!(h.is_subclass(id(&h, "list"), id(&h, "Sequence")));
    assert!(h.is_subclass(id(&h, "list"), id(&h, "Reversible")));
    assert!(!h.is_subclass(id(&h, "tuple"), id(&h, "MutableSequence")));
    assert!(h.is_subclass(id(&h, "dict"), id(&h, "Mapping")));
}

#[test]
fn test_interfaces_of() {
    let h = Hierarchy::builtins();
    let names = h.names(&h.interfaces_of(id(&h, "tuple")));
    assert_eq!(
        names,
        vec!["Hashable", "Sized", "Iterable", "Container", "Reversible", "Collection", "Sequence"]
    );
    assert!(h.interfaces_of(id(&h, "NoneType")).iter().all(|&i| h.name(i) == "Hashable"));
}

#[test]
fn test_unknown_ids() {
    let h = Hierarchy::builtins();
    let bogus = ClassId::new(10_000);
    assert!(h.get(bogus).is_none());
    assert_eq!(h.name(bogus), "<unknown>");
    assert!(h.mro(bogus).is_empty());
    assert!(!h.is_subclass(bogus, id(&h, "object")));
    assert!(h.lookup("NoSuchType").is_none());
}

#[test]
fn test_diamond_mro() {
    let mut b = Hierarchy::builder();
    let o = b.declare(TypeDecl::concrete("O")).unwrap();
    let a = b.declare(TypeDecl::concrete("A").base(o)).unwrap();
    let bb = b.declare(TypeDecl::concrete("B").base(a)).unwrap();
    let c = b.declare(TypeDecl::concrete("C").base(a)).unwrap();
    b.declare(TypeDecl::concrete("D").bases([bb, c])).unwrap();
    let h = b.build().unwrap();

    assert_eq!(mro_names(&h, "D"), vec!["D", "B", "C", "A", "O"]);
    assert_eq!(h.subclasses(a).len(), 2);
}

#[test]
fn test_inconsistent_mro_rejected() {
    let mut b = Hierarchy::builder();
    let o = b.declare(TypeDecl::concrete("O")).unwrap();
    let x = b.declare(TypeDecl::concrete("X").base(o)).unwrap();
    let y = b.declare(TypeDecl::concrete("Y").base(o)).unwrap();
    let a = b.declare(TypeDecl::concrete("A").bases([x, y])).unwrap();
    let bb = b.declare(TypeDecl::concrete("B").bases([y, x])).unwrap();

    let err = b.declare(TypeDecl::concrete("Z").bases([a, bb])).unwrap_err();
    assert_eq!(err, HierarchyError::InconsistentMro { name: "Z".into() });
    // The failed declaration leaves no trace.
    assert!(b.lookup("Z").is_none());
}

#[test]
fn test_duplicate_name_rejected() {
    let mut b = Hierarchy::builder();
    b.declare(TypeDecl::concrete("A")).unwrap();
    let err = b.declare(TypeDecl::interface("A")).unwrap_err();
    assert_eq!(err, HierarchyError::DuplicateName { name: "A".into() });
}

#[test]
fn test_unknown_and_duplicate_base_rejected() {
    let mut b = Hierarchy::builder();
    let a = b.declare(TypeDecl::concrete("A")).unwrap();

    let err = b.declare(TypeDecl::concrete("B").base(ClassId::new(7))).unwrap_err();
    assert!(matches!(err, HierarchyError::UnknownBase { ref name, .. } if name == "B"));

    let err = b.declare(TypeDecl::concrete("C").bases([a, a])).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::DuplicateBase { name: "C".into(), base: "A".into() }
    );
}

#[test]
fn test_register_member_requires_interface() {
    let mut b = Hierarchy::builder();
    let a = b.declare(TypeDecl::concrete("A")).unwrap();
    let c = b.declare(TypeDecl::concrete("C")).unwrap();
    let err = b.register_member(a, c).unwrap_err();
    assert_eq!(err, HierarchyError::NotAnInterface { name: "A".into() });

    let err = b.register_member(ClassId::new(99), c).unwrap_err();
    assert_eq!(err, HierarchyError::UnknownType(ClassId::new(99)));
}

#[test]
fn test_membership_cycle_rejected() {
    let mut b = Hierarchy::builder();
    let base = b.declare(TypeDecl::interface("Base")).unwrap();
    let derived = b.declare(TypeDecl::interface("Derived").base(base)).unwrap();
    // Derived <: Base already, so Base cannot become a member of Derived.
    b.register_member(derived, base).unwrap();
    let err = b.build().unwrap_err();
    assert_eq!(
        err,
        HierarchyError::MembershipCycle { interface: "Derived".into(), member: "Base".into() }
    );
}

#[test]
fn test_self_membership_rejected() {
    let mut b = Hierarchy::builder();
    let i = b.declare(TypeDecl::interface("I")).unwrap();
    b.register_member(i, i).unwrap();
    assert!(matches!(b.build(), Err(HierarchyError::MembershipCycle { .. })));
}

#[test]
fn test_structural_requirement_not_inherited_by_subinterface() {
    let mut b = Hierarchy::builder();
    let object = b.declare(TypeDecl::concrete("object")).unwrap();
    let sized = b.declare(TypeDecl::interface("Sized").base(object).requires(["len"])).unwrap();
    let counted = b.declare(TypeDecl::interface("Counted").base(sized)).unwrap();
    let bag = b.declare(TypeDecl::concrete("Bag").base(object).provides(["len"])).unwrap();
    let h = b.build().unwrap();

    assert!(h.is_subclass(bag, sized));
    assert!(!h.is_subclass(bag, counted));
}

#[test]
fn test_concrete_class_inheriting_interface() {
    let mut b = Hierarchy::builder();
    let object = b.declare(TypeDecl::concrete("object")).unwrap();
    let sized = b.declare(TypeDecl::interface("Sized").base(object).requires(["len"])).unwrap();
    let custom = b.declare(TypeDecl::concrete("Custom").bases([sized])).unwrap();
    let h = b.build().unwrap();

    assert!(h.is_subclass(custom, sized));
    assert_eq!(h.names(h.mro(custom)), vec!["Custom", "Sized", "object"]);
}
