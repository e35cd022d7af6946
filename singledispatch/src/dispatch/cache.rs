//! Registry generations and their resolution caches.
//!
//! Every registration publishes a new [`Generation`]: an immutable
//! registry snapshot with its own empty cache. A resolution computed
//! against a generation is only ever stored in that generation's cache,
//! so once a newer generation is published no reader can observe an entry
//! that predates the registration.
//!
//! Readers never lock: the current generation and its cache map are both
//! behind `ArcSwap`. A cache miss publishes a copy of the map with the new
//! entry; misses happen once per concrete type per generation.

use std::fmt;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use super::registry::Registry;
use crate::hierarchy::ClassId;

/// Concrete runtime type → selected implementation.
pub(crate) struct ResolutionCache<F> {
    entries: ArcSwap<FxHashMap<ClassId, F>>,
}

impl<F: Clone> ResolutionCache<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(FxHashMap::default()),
        }
    }

    pub(crate) fn get(&self, cls: ClassId) -> Option<F> {
        self.entries.load().get(&cls).cloned()
    }

    pub(crate) fn insert(&self, cls: ClassId, implementation: F) {
        self.entries.rcu(|current| {
            let mut next = FxHashMap::clone(current);
            next.insert(cls, implementation.clone());
            next
        });
    }

    pub(crate) fn clear(&self) {
        self.entries.store(Default::default());
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.load().len()
    }
}

/// A published registry snapshot together with its cache.
pub(crate) struct Generation<F> {
    pub(crate) registry: Registry<F>,
    pub(crate) cache: ResolutionCache<F>,
}

impl<F: Clone> Generation<F> {
    pub(crate) fn new(registry: Registry<F>) -> Self {
        Self {
            registry,
            cache: ResolutionCache::new(),
        }
    }
}

impl<F> fmt::Debug for Generation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
