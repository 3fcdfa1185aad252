//! # Replica Clone
//!
//! Cycle-safe, type-preserving deep copy of a `replica_value` graph.
//!
//! - **Identity preserving**: an object reachable along several paths is
//!   copied once, and cycles in the source are cycles in the copy
//! - **Type preserving**: every clonable kind is rebuilt with its own
//!   internal slot and constructing type
//! - **Never fails**: constructors that need arguments and fields that
//!   cannot be read degrade into diagnostics instead of errors
//! - **Iterative**: traversal uses an explicit worklist, so graph depth is
//!   bounded by memory, not by the stack
//!
//! ```
//! use replica_clone::deep_clone;
//! use replica_value::{ObjectRef, PropertyKey, Value};
//!
//! let node = ObjectRef::ordinary();
//! node.set(PropertyKey::string("self"), Value::object(node.clone())).unwrap();
//!
//! let copy = deep_clone(&Value::object(node.clone()));
//! let copy = copy.as_object().unwrap();
//! assert!(!copy.ptr_eq(&node));
//! let inner = copy.get(&PropertyKey::string("self")).unwrap();
//! assert!(inner.as_object().unwrap().ptr_eq(copy));
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

mod cloners;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod fallback;
pub mod kind;
pub mod registry;

pub use config::{CloneOptions, ConfigError, DEFAULT_CONFIG_FILE};
pub use diagnostics::CloneDiagnostic;
pub use driver::{CloneOutcome, DeepCloner};
pub use fallback::FallbackMode;
pub use kind::{Kind, classify, classify_object};
pub use registry::IdentityRegistry;

use replica_value::Value;

/// Deep-copy `value` with default options.
///
/// Diagnostics are logged through `tracing` and otherwise discarded; use
/// [`deep_clone_with`] to inspect them.
pub fn deep_clone(value: &Value) -> Value {
    deep_clone_with(value, &CloneOptions::default()).value
}

/// Deep-copy `value` with `options`, returning the copy and its diagnostics
pub fn deep_clone_with(value: &Value, options: &CloneOptions) -> CloneOutcome {
    DeepCloner::new(options).run(value)
}
