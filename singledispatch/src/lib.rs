//! Runtime single-dispatch generic functions.
//!
//! A generic function has a default implementation and any number of
//! implementations registered against types after the fact. Each call
//! selects the most specific implementation for the runtime type of its
//! first argument.
//!
//! Registration targets are concrete classes or interfaces of a host
//! [`Hierarchy`]. A type matches a concrete key it is, or inherits from,
//! and an interface key it belongs to nominally, structurally, or by
//! explicit registration. Among several matches the one closest to the
//! type in its linearized ancestry wins, with interfaces ranked at the
//! ancestor that introduces the membership. Results are cached per
//! concrete type and the cache is invalidated on every registration.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use singledispatch::{GenericFunction, Hierarchy, Value};
//!
//! let render = GenericFunction::new("render", Arc::new(Hierarchy::builtins()), |v: &Value| {
//!     format!("<{}>", v)
//! });
//! render
//!     .register_named("Sequence", |v: &Value| {
//!         let items = v.items().unwrap_or_default();
//!         format!("seq of {}", items.len())
//!     })
//!     .unwrap();
//! render.register_named("tuple", |_: &Value| "tuple".to_string()).unwrap();
//!
//! assert_eq!(render.call(&Value::str_list(["a", "b"])), "seq of 2");
//! assert_eq!(render.call(&Value::str_tuple(["a"])), "tuple");
//! assert_eq!(render.call(&Value::Int(3)), "<3>");
//! ```
//!
//! # Module Structure
//!
//! - [`hierarchy`] - Host type model: classes, interfaces, MROs, subtyping
//! - [`dispatch`] - Registry, ranking, resolution and caching
//! - [`function`] - Callable generic functions on top of the dispatcher
//! - [`value`] - Values that report their runtime type
//! - [`config`] - Dispatch configuration
//! - [`error`] - Error types

pub mod config;
pub mod dispatch;
pub mod error;
pub mod function;
pub mod hierarchy;
pub mod value;

pub use config::{AmbiguityPolicy, DispatchConfig};
pub use dispatch::registry::Registry;
pub use dispatch::resolver::{Explanation, Resolution};
pub use dispatch::Dispatcher;
pub use error::{
    ConfigError, ConfigResult, DispatchError, DispatchResult, HierarchyError, HierarchyResult,
};
pub use function::{GenericFunction, Implementation};
pub use hierarchy::{ClassId, Hierarchy, HierarchyBuilder, TypeDecl, TypeInfo, TypeKind};
pub use value::{Typed, Value};
