//! Builtin types and collection interfaces.
//!
//! Concrete: `object`, `NoneType`, `int`, `bool`, `float`, `str`, `bytes`,
//! `list`, `tuple`, `dict`, `set`, `frozenset`, `range`.
//!
//! Interfaces: `Hashable`, `Sized`, `Iterable`, `Container`,
//! `Reversible`, `Collection`, `Sequence`, `MutableSequence`, `Set`,
//! `MutableSet`, `Mapping`, `MutableMapping`.
//!
//! The one-method interfaces are structural. The richer ones (`Sequence`
//! and below) rely on explicit membership, since having the right methods
//! does not imply the intended semantics.

use super::{Hierarchy, HierarchyBuilder, TypeDecl};
use crate::error::HierarchyResult;

const SEQUENCE_METHODS: [&str; 4] = ["len", "iter", "contains", "getitem"];

pub(super) fn builtin_hierarchy() -> HierarchyResult<Hierarchy> {
    let mut b = HierarchyBuilder::new();

    let object = b.declare(TypeDecl::concrete("object").provides(["hash", "eq", "repr"]))?;
    b.declare(TypeDecl::concrete("NoneType").base(object))?;
    let int = b.declare(TypeDecl::concrete("int").base(object).provides(["add", "index"]))?;
    b.declare(TypeDecl::concrete("bool").base(int))?;
    b.declare(TypeDecl::concrete("float").base(object).provides(["add"]))?;

    let str_ = b.declare(TypeDecl::concrete("str").base(object).provides(SEQUENCE_METHODS))?;
    let bytes = b.declare(TypeDecl::concrete("bytes").base(object).provides(SEQUENCE_METHODS))?;
    let list = b.declare(
        TypeDecl::concrete("list")
            .base(object)
            .provides(SEQUENCE_METHODS)
            .provides(["setitem", "reversed"])
            .disables(["hash"]),
    )?;
    let tuple = b.declare(TypeDecl::concrete("tuple").base(object).provides(SEQUENCE_METHODS))?;
    let dict = b.declare(
        TypeDecl::concrete("dict")
            .base(object)
            .provides(["len", "iter", "contains", "getitem", "setitem", "keys", "reversed"])
            .disables(["hash"]),
    )?;
    let set = b.declare(
        TypeDecl::concrete("set")
            .base(object)
            .provides(["len", "iter", "contains", "add"])
            .disables(["hash"]),
    )?;
    let frozenset = b.declare(
        TypeDecl::concrete("frozenset").base(object).provides(["len", "iter", "contains"]),
    )?;
    let range = b.declare(
        TypeDecl::concrete("range")
            .base(object)
            .provides(SEQUENCE_METHODS)
            .provides(["reversed"]),
    )?;

    b.declare(TypeDecl::interface("Hashable").base(object).requires(["hash"]))?;
    let sized = b.declare(TypeDecl::interface("Sized").base(object).requires(["len"]))?;
    let iterable = b.declare(TypeDecl::interface("Iterable").base(object).requires(["iter"]))?;
    let container =
        b.declare(TypeDecl::interface("Container").base(object).requires(["contains"]))?;
    let reversible = b.declare(
        TypeDecl::interface("Reversible")
            .base(iterable)
            .requires(["reversed", "iter"]),
    )?;
    let collection = b.declare(
        TypeDecl::interface("Collection")
            .bases([sized, iterable, container])
            .requires(["len", "iter", "contains"]),
    )?;
    let sequence = b.declare(TypeDecl::interface("Sequence").bases([reversible, collection]))?;
    let mutable_sequence = b.declare(TypeDecl::interface("MutableSequence").base(sequence))?;
    let abstract_set = b.declare(TypeDecl::interface("Set").base(collection))?;
    let mutable_set = b.declare(TypeDecl::interface("MutableSet").base(abstract_set))?;
    let mapping = b.declare(TypeDecl::interface("Mapping").base(collection))?;
    let mutable_mapping = b.declare(TypeDecl::interface("MutableMapping").base(mapping))?;

    for member in [tuple, str_, range, bytes] {
        b.register_member(sequence, member)?;
    }
    b.register_member(mutable_sequence, list)?;
    b.register_member(abstract_set, frozenset)?;
    b.register_member(mutable_set, set)?;
    b.register_member(mutable_mapping, dict)?;

    b.build()
}
