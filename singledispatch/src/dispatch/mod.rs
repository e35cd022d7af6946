//! Single-dispatch resolution.
//!
//! This module implements the engine that selects which implementation of
//! a generic function to run based on the runtime type of the first
//! argument.
//!
//! # Algorithm Overview
//!
//! 1. **Cache check**: return the cached implementation for the type
//! 2. **Compose**: insert matching interfaces into the type's MRO
//! 3. **Walk**: the first registered key in the composed order wins
//! 4. **Break ties**: unrelated interfaces matching equally well are
//!    rejected at registration time, or settled by registration order
//! 5. **Fall back**: with no match, the default implementation is used
//!
//! # Module Structure
//!
//! - [`registry`] - Key → implementation mapping
//! - `compose` - Ranking order for a runtime type
//! - [`resolver`] - Walk, ambiguity detection, explanations
//! - `cache` - Registry generations and their caches

mod cache;
mod compose;
pub mod registry;
pub mod resolver;


use std::fmt;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use self::cache::Generation;
use self::registry::Registry;
use self::resolver::{Explanation, Resolution};
use crate::config::{AmbiguityPolicy, DispatchConfig};
use crate::error::{DispatchError, DispatchResult};
use crate::hierarchy::{ClassId, Hierarchy, TypeKind};

/// The dispatch unit of one generic function: a registry, its resolution
/// cache, and the hierarchy both are interpreted against.
///
/// `F` is the implementation type; it only needs to be cheap to clone
/// (typically an `Arc`). Lookups run concurrently without locking;
/// registrations are serialized and take effect for every thread before
/// [`Dispatcher::register`] returns.
pub struct Dispatcher<F> {
    name: String,
    hierarchy: Arc<Hierarchy>,
    config: DispatchConfig,
    current: ArcSwap<Generation<F>>,
    write_lock: Mutex<()>,
}

impl<F: Clone> Dispatcher<F> {
    /// Create a dispatcher with the default configuration.
    pub fn new(name: impl Into<String>, hierarchy: Arc<Hierarchy>, default: F) -> Self {
        Self::with_config(name, hierarchy, default, DispatchConfig::default())
    }

    /// Create a dispatcher with an explicit configuration.
    pub fn with_config(
        name: impl Into<String>,
        hierarchy: Arc<Hierarchy>,
        default: F,
        config: DispatchConfig,
    ) -> Self {
        Self {
            name: name.into(),
            hierarchy,
            config,
            current: ArcSwap::from_pointee(Generation::new(Registry::new(default))),
            write_lock: Mutex::new(()),
        }
    }

    /// Register `implementation` for `key`, replacing any previous one.
    ///
    /// Returns the implementation unchanged so call sites can chain it.
    /// Under [`AmbiguityPolicy::Reject`] the registration is refused, and
    /// the registry left untouched, if it would make some concrete type
    /// resolve ambiguously.
    pub fn register(&self, key: ClassId, implementation: F) -> DispatchResult<F> {
        let Some(kind) = self.hierarchy.kind(key) else {
            return Err(DispatchError::UnknownType(key));
        };

        let _guard = self.write_lock.lock();
        let mut registry = self.current.load().registry.clone();
        let replaced = registry.register(key, implementation.clone()).is_some();

        if self.config.ambiguity == AmbiguityPolicy::Reject {
            self.check_ambiguity(&registry, key)?;
        }

        self.current.store(Arc::new(Generation::new(registry)));
        debug!(
            function = %self.name,
            key = self.hierarchy.name(key),
            kind = %kind,
            replaced,
            "registered implementation, resolution cache invalidated"
        );
        Ok(implementation)
    }

    /// Register by type name.
    pub fn register_named(&self, name: &str, implementation: F) -> DispatchResult<F> {
        let key = self
            .hierarchy
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownTypeName(name.to_string()))?;
        self.register(key, implementation)
    }

    /// Every concrete type the new key applies to must still resolve to a
    /// unique key.
    fn check_ambiguity(&self, registry: &Registry<F>, key: ClassId) -> DispatchResult<()> {
        let hierarchy = &*self.hierarchy;
        for cls in hierarchy.concrete_types() {
            if !hierarchy.is_subclass(cls, key) {
                continue;
            }
            let (_, _, resolution) = resolver::resolve(hierarchy, cls, registry);
            if let Resolution::Ambiguous { first, second } = resolution {
                return Err(DispatchError::Ambiguous {
                    ty: hierarchy.name(cls).to_string(),
                    first: hierarchy.name(first).to_string(),
                    second: hierarchy.name(second).to_string(),
                });
            }
        }
        Ok(())
    }

    /// The implementation for runtime type `cls`.
    ///
    /// Never fails: an unknown type or a type with no matching
    /// registration gets the default implementation.
    pub fn dispatch(&self, cls: ClassId) -> F {
        let generation = self.current.load();
        if self.config.cache {
            if let Some(hit) = generation.cache.get(cls) {
                return hit;
            }
        }

        let generation = Guard::into_inner(generation);
        if self.hierarchy.get(cls).is_none() {
            trace!(function = %self.name, ?cls, "unknown runtime type, using default");
            return generation.registry.default_impl().clone();
        }

        let (_, _, resolution) = resolver::resolve(&self.hierarchy, cls, &generation.registry);
        let selected = resolution.selected(&generation.registry);
        if let Resolution::Ambiguous { first, second } = resolution {
            warn!(
                function = %self.name,
                ty = self.hierarchy.name(cls),
                first = self.hierarchy.name(first),
                second = self.hierarchy.name(second),
                "ambiguous dispatch, using the earlier registration"
            );
        }
        trace!(
            function = %self.name,
            ty = self.hierarchy.name(cls),
            selected = selected.map_or("<default>", |key| self.hierarchy.name(key)),
            "resolved"
        );

        let implementation = selected
            .and_then(|key| generation.registry.lookup_exact(key))
            .unwrap_or_else(|| generation.registry.default_impl())
            .clone();
        if self.config.cache {
            generation.cache.insert(cls, implementation.clone());
        }
        implementation
    }

    /// The implementation for the runtime type named `name`; the default
    /// if no such type is declared.
    pub fn dispatch_name(&self, name: &str) -> F {
        match self.hierarchy.lookup(name) {
            Some(cls) => self.dispatch(cls),
            None => {
                trace!(function = %self.name, name, "undeclared runtime type, using default");
                self.default_impl()
            }
        }
    }

    /// The base implementation.
    pub fn default_impl(&self) -> F {
        self.current.load().registry.default_impl().clone()
    }

    /// The implementation registered for exactly `key`.
    pub fn lookup_exact(&self, key: ClassId) -> Option<F> {
        self.current.load().registry.lookup_exact(key).cloned()
    }

    /// Registered keys in first-registration order.
    pub fn registered_keys(&self) -> Vec<ClassId> {
        self.current.load().registry.keys().collect()
    }

    /// A snapshot of the current registry.
    pub fn registry(&self) -> Registry<F> {
        self.current.load().registry.clone()
    }

    /// Describe how `cls` resolves right now, bypassing the cache.
    pub fn explain(&self, cls: ClassId) -> Explanation {
        let generation = self.current.load_full();
        resolver::explain(&self.hierarchy, cls, &generation.registry)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.current.load().cache.clear();
    }

    /// Number of cached resolutions.
    pub fn cache_len(&self) -> usize {
        self.current.load().cache.len()
    }

    /// The function name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hierarchy registrations are interpreted against.
    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The kind of a potential registration key.
    pub fn classify(&self, key: ClassId) -> Option<TypeKind> {
        self.hierarchy.kind(key)
    }
}

impl<F> fmt::Debug for Dispatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("generation", &*self.current.load())
            .finish_non_exhaustive()
    }
}
