//! Ranking order for a runtime type against a set of registered keys.
//!
//! The nominal MRO of a type only contains its nominal ancestors. Interfaces
//! the type belongs to through structural checks or explicit registration
//! are inserted into a copy of that MRO at the point where the type's
//! ancestry first introduces the membership. Walking the composed order
//! front to back then visits keys from most to least specific.
//!
//! # Algorithm
//!
//! 1. **Collect related keys**: registered keys the type is a subtype of
//!    but that are not already in its nominal MRO
//! 2. **Drop strict bases**: keys that appear in the MRO of another
//!    related key will be reached through that key anyway
//! 3. **Stabilize interface order**: when a related key has nominal
//!    subclasses the type also belongs to, those subclasses' orderings
//!    decide the relative position of related keys
//! 4. **Linearize**: C3-merge the type's bases with the interfaces each
//!    base introduces

use std::cmp::Reverse;

use crate::hierarchy::{c3, ClassId, Hierarchy};

/// Composed ranking order for `cls`, or `None` when the interface
/// insertions cannot be ordered consistently.
pub(crate) fn compose_mro(
    hierarchy: &Hierarchy,
    cls: ClassId,
    registered: &[ClassId],
) -> Option<Vec<ClassId>> {
    let bases = hierarchy.mro(cls);

    let related: Vec<ClassId> = registered
        .iter()
        .copied()
        .filter(|&key| !bases.contains(&key) && hierarchy.is_subclass(cls, key))
        .collect();

    let types: Vec<ClassId> = related
        .iter()
        .copied()
        .filter(|&key| {
            !related
                .iter()
                .any(|&other| other != key && hierarchy.mro(other).contains(&key))
        })
        .collect();

    let mut abcs: Vec<ClassId> = Vec::with_capacity(types.len());
    for &key in &types {
        let mut found: Vec<Vec<ClassId>> = hierarchy
            .subclasses(key)
            .iter()
            .copied()
            .filter(|&sub| !bases.contains(&sub) && hierarchy.is_subclass(cls, sub))
            .map(|sub| {
                hierarchy
                    .mro(sub)
                    .iter()
                    .copied()
                    .filter(|t| types.contains(t))
                    .collect()
            })
            .collect();

        if found.is_empty() {
            abcs.push(key);
            continue;
        }

        found.sort_by_key(|order| Reverse(order.len()));
        for candidate in found.into_iter().flatten() {
            if !abcs.contains(&candidate) {
                abcs.push(candidate);
            }
        }
    }

    linearize(hierarchy, cls, &abcs)
}

/// C3 linearization of `cls` with the interfaces in `abcs` inserted.
///
/// Bases up to and including the last interface base are merged first;
/// interfaces introduced by `cls` itself (it belongs to them but none of
/// its bases does) come next, then the remaining bases.
fn linearize(hierarchy: &Hierarchy, cls: ClassId, abcs: &[ClassId]) -> Option<Vec<ClassId>> {
    let bases = hierarchy.bases(cls);
    let boundary = bases
        .iter()
        .rposition(|&base| hierarchy.is_interface(base))
        .map_or(0, |index| index + 1);
    let (explicit, other) = bases.split_at(boundary);

    let (introduced, remaining): (Vec<ClassId>, Vec<ClassId>) =
        abcs.iter().copied().partition(|&abc| {
            hierarchy.is_subclass(cls, abc)
                && !bases.iter().any(|&base| hierarchy.is_subclass(base, abc))
        });

    let mut seqs = Vec::with_capacity(bases.len() + introduced.len() + 4);
    seqs.push(vec![cls]);
    for &base in explicit.iter().chain(&introduced).chain(other) {
        seqs.push(linearize(hierarchy, base, &remaining)?);
    }
    seqs.push(explicit.to_vec());
    seqs.push(introduced);
    seqs.push(other.to_vec());

    c3::merge(seqs)
}

/// Fallback order when composition fails: the nominal MRO followed by the
/// related keys in registration order.
pub(crate) fn fallback_order(
    hierarchy: &Hierarchy,
    cls: ClassId,
    registered: &[ClassId],
) -> Vec<ClassId> {
    let mut order = hierarchy.mro(cls).to_vec();
    for &key in registered {
        if !order.contains(&key) && hierarchy.is_subclass(cls, key) {
            order.push(key);
        }
    }
    order
}
