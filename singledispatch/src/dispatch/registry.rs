//! Type key → implementation mapping.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::hierarchy::ClassId;

/// Registered implementations of one generic function.
///
/// Keys are unique. Registering an existing key replaces its
/// implementation but keeps its original position, so iteration order is
/// the order in which keys were first registered. That order is the
/// precedence used to break resolution ties.
#[derive(Clone)]
pub struct Registry<F> {
    default: F,
    entries: IndexMap<ClassId, F, FxBuildHasher>,
}

impl<F> Registry<F> {
    /// Create a registry holding only the default implementation.
    pub fn new(default: F) -> Self {
        Self {
            default,
            entries: IndexMap::default(),
        }
    }

    /// Insert or replace the implementation for `key`, returning the
    /// replaced one.
    pub fn register(&mut self, key: ClassId, implementation: F) -> Option<F> {
        self.entries.insert(key, implementation)
    }

    /// The base implementation used when nothing matches.
    pub fn default_impl(&self) -> &F {
        &self.default
    }

    /// The implementation registered for exactly `key`.
    pub fn lookup_exact(&self, key: ClassId) -> Option<&F> {
        self.entries.get(&key)
    }

    /// Whether `key` has a registration.
    pub fn contains(&self, key: ClassId) -> bool {
        self.entries.contains_key(&key)
    }

    /// Registration precedence of `key` (lower registered earlier).
    pub fn position(&self, key: ClassId) -> Option<usize> {
        self.entries.get_index_of(&key)
    }

    /// Registered keys, in first-registration order.
    pub fn keys(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered keys, not counting the default.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether only the default is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
