//! Generic functions: a [`Dispatcher`] over callable implementations.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use singledispatch::{GenericFunction, Hierarchy, Value};
//!
//! let describe = GenericFunction::new(
//!     "describe",
//!     Arc::new(Hierarchy::builtins()),
//!     |v: &Value| format!("object {}", v),
//! );
//! describe.register_named("int", |_: &Value| "an int".to_string()).unwrap();
//!
//! assert_eq!(describe.call(&Value::Int(1)), "an int");
//! assert_eq!(describe.call(&Value::Bool(true)), "an int");
//! assert_eq!(describe.call(&Value::None), "object None");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::dispatch::resolver::Explanation;
use crate::dispatch::Dispatcher;
use crate::error::DispatchResult;
use crate::hierarchy::{ClassId, Hierarchy};
use crate::value::Typed;

/// A shared implementation of a generic function.
pub type Implementation<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

/// A function with one default body and type-specific overrides, selected
/// by the runtime type of its argument.
pub struct GenericFunction<A: ?Sized, R> {
    dispatcher: Dispatcher<Implementation<A, R>>,
}

impl<A, R> GenericFunction<A, R>
where
    A: Typed + ?Sized + 'static,
    R: 'static,
{
    /// Create a generic function from its default body.
    pub fn new<F>(name: impl Into<String>, hierarchy: Arc<Hierarchy>, default: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        Self::with_config(name, hierarchy, default, DispatchConfig::default())
    }

    /// Create a generic function with an explicit configuration.
    pub fn with_config<F>(
        name: impl Into<String>,
        hierarchy: Arc<Hierarchy>,
        default: F,
        config: DispatchConfig,
    ) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        let default: Implementation<A, R> = Arc::new(default);
        Self {
            dispatcher: Dispatcher::with_config(name, hierarchy, default, config),
        }
    }

    /// Register an implementation for `key`; returns it for chaining.
    pub fn register<F>(&self, key: ClassId, implementation: F) -> DispatchResult<Implementation<A, R>>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        self.dispatcher.register(key, Arc::new(implementation))
    }

    /// Register an implementation for the type called `name`.
    pub fn register_named<F>(
        &self,
        name: &str,
        implementation: F,
    ) -> DispatchResult<Implementation<A, R>>
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        self.dispatcher.register_named(name, Arc::new(implementation))
    }

    /// The implementation `arg` dispatches to.
    pub fn resolve(&self, arg: &A) -> Implementation<A, R> {
        self.dispatcher.dispatch_name(arg.type_name())
    }

    /// Dispatch on `arg` and run the selected implementation.
    pub fn call(&self, arg: &A) -> R {
        let implementation = self.resolve(arg);
        implementation(arg)
    }

    /// The implementation for runtime type `cls`.
    pub fn dispatch(&self, cls: ClassId) -> Implementation<A, R> {
        self.dispatcher.dispatch(cls)
    }

    /// Describe how `cls` resolves.
    pub fn explain(&self, cls: ClassId) -> Explanation {
        self.dispatcher.explain(cls)
    }

    /// The underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<Implementation<A, R>> {
        &self.dispatcher
    }
}

impl<A: ?Sized, R> fmt::Debug for GenericFunction<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericFunction")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
