//! Selection of the most specific registered key for a runtime type.

use tracing::warn;

use super::compose::{compose_mro, fallback_order};
use super::registry::Registry;
use crate::hierarchy::{ClassId, Hierarchy};

/// Outcome of resolving a runtime type against a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A unique most specific key was found.
    Resolved(ClassId),
    /// No registered key matches; the default applies.
    NoMatch,
    /// Two unrelated interfaces match equally well.
    Ambiguous {
        /// The key found first in the composed order.
        first: ClassId,
        /// The unrelated key immediately after it.
        second: ClassId,
    },
}

impl Resolution {
    /// The key whose implementation is used, breaking ties by
    /// registration order. `None` means the default.
    pub fn selected<F>(&self, registry: &Registry<F>) -> Option<ClassId> {
        match *self {
            Resolution::Resolved(key) => Some(key),
            Resolution::NoMatch => None,
            Resolution::Ambiguous { first, second } => {
                let first_pos = registry.position(first).unwrap_or(usize::MAX);
                let second_pos = registry.position(second).unwrap_or(usize::MAX);
                Some(if second_pos < first_pos { second } else { first })
            }
        }
    }
}

/// Full account of a resolution, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    /// The runtime type that was resolved.
    pub ty: ClassId,
    /// Its nominal MRO.
    pub mro: Vec<ClassId>,
    /// The composed ranking order that was walked.
    pub composed: Vec<ClassId>,
    /// Whether the composed order came from the fallback path.
    pub fallback: bool,
    /// The outcome of the walk.
    pub resolution: Resolution,
    /// The key whose implementation is used; `None` for the default.
    pub selected: Option<ClassId>,
}

/// Resolve `cls` against `registry`, returning the walked order and the
/// outcome.
pub(crate) fn resolve<F>(
    hierarchy: &Hierarchy,
    cls: ClassId,
    registry: &Registry<F>,
) -> (Vec<ClassId>, bool, Resolution) {
    let registered: Vec<ClassId> = registry.keys().collect();
    let (composed, fallback) = match compose_mro(hierarchy, cls, &registered) {
        Some(order) => (order, false),
        None => {
            warn!(
                ty = hierarchy.name(cls),
                "inconsistent interface ordering, falling back to registration order"
            );
            (fallback_order(hierarchy, cls, &registered), true)
        }
    };
    let resolution = find_match(hierarchy, cls, &composed, registry);
    (composed, fallback, resolution)
}

/// Walk the composed order and pick the first registered key.
///
/// A registration for `cls` itself always wins, even when an interface
/// derived from `cls` precedes it in the composed order (the root class
/// and an interface over it, for example). Otherwise the match is
/// ambiguous when the element right after it is also registered, neither
/// of the two is a nominal ancestor of `cls`, and the match is not a
/// subtype of that element.
fn find_match<F>(
    hierarchy: &Hierarchy,
    cls: ClassId,
    composed: &[ClassId],
    registry: &Registry<F>,
) -> Resolution {
    if registry.contains(cls) {
        return Resolution::Resolved(cls);
    }
    let nominal = hierarchy.mro(cls);
    let Some(index) = composed.iter().position(|&t| registry.contains(t)) else {
        return Resolution::NoMatch;
    };
    let found = composed[index];

    if let Some(&next) = composed.get(index + 1) {
        let unrelated = registry.contains(next)
            && !nominal.contains(&next)
            && !nominal.contains(&found)
            && !hierarchy.is_subclass(found, next);
        if unrelated {
            return Resolution::Ambiguous {
                first: found,
                second: next,
            };
        }
    }
    Resolution::Resolved(found)
}

/// Build an [`Explanation`] for `cls`.
pub(crate) fn explain<F>(hierarchy: &Hierarchy, cls: ClassId, registry: &Registry<F>) -> Explanation {
    let (composed, fallback, resolution) = resolve(hierarchy, cls, registry);
    Explanation {
        ty: cls,
        mro: hierarchy.mro(cls).to_vec(),
        composed,
        fallback,
        selected: resolution.selected(registry),
        resolution,
    }
}
