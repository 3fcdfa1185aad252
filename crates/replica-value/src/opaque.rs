//! Payloads for objects that stand for live or unreproducible state:
//! promises, weak collections and host resources.

use crate::object::{ObjectRef, WeakObjectRef};
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Promise state
#[derive(Debug, Clone, Default)]
pub enum PromiseState {
    /// Not yet settled
    #[default]
    Pending,
    /// Resolved with value
    Fulfilled(Value),
    /// Rejected with error
    Rejected(Value),
}

impl PromiseState {
    /// Check if settled (fulfilled or rejected)
    pub fn is_settled(&self) -> bool {
        !matches!(self, PromiseState::Pending)
    }

    /// Settle a pending promise. Returns `false` if it was already settled.
    pub fn settle(&mut self, outcome: Result<Value, Value>) -> bool {
        if self.is_settled() {
            return false;
        }
        *self = match outcome {
            Ok(v) => PromiseState::Fulfilled(v),
            Err(e) => PromiseState::Rejected(e),
        };
        true
    }
}

/// Backing table of a `WeakMap`: object key (by address) to value.
///
/// Keys are held weakly. An entry whose key has died is treated as absent,
/// which also guards against a new object reusing a dead key's address.
#[derive(Debug, Default)]
pub struct WeakMapData {
    entries: FxHashMap<usize, (WeakObjectRef, Value)>,
}

impl WeakMapData {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value for `key`
    pub fn get(&self, key: &ObjectRef) -> Option<Value> {
        match self.entries.get(&key.as_ptr()) {
            Some((weak, value)) if weak.is(key) => Some(value.clone()),
            _ => None,
        }
    }

    /// Check for a live entry
    pub fn has(&self, key: &ObjectRef) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace the value for `key`
    pub fn set(&mut self, key: &ObjectRef, value: Value) {
        self.entries
            .insert(key.as_ptr(), (key.downgrade(), value));
    }

    /// Remove `key`. Returns `true` if a live entry was removed.
    pub fn delete(&mut self, key: &ObjectRef) -> bool {
        let live = self.has(key);
        if live {
            self.entries.remove(&key.as_ptr());
        }
        live
    }
}

/// Backing table of a `WeakSet`
#[derive(Debug, Default)]
pub struct WeakSetData {
    entries: FxHashMap<usize, WeakObjectRef>,
}

impl WeakSetData {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value`
    pub fn add(&mut self, value: &ObjectRef) {
        self.entries.insert(value.as_ptr(), value.downgrade());
    }

    /// Check membership
    pub fn has(&self, value: &ObjectRef) -> bool {
        self.entries
            .get(&value.as_ptr())
            .is_some_and(|weak| weak.is(value))
    }

    /// Remove `value`. Returns `true` if it was present.
    pub fn delete(&mut self, value: &ObjectRef) -> bool {
        let live = self.has(value);
        if live {
            self.entries.remove(&value.as_ptr());
        }
        live
    }
}

/// A resource owned by the embedding runtime (a DOM node, a socket, ...).
pub trait HostResource: Send + Sync + 'static {
    /// Name shown in diagnostics
    fn type_name(&self) -> &str;
}

/// Shared handle to a host resource
#[derive(Clone)]
pub struct HostHandle(Arc<dyn HostResource>);

impl HostHandle {
    /// Wrap a host resource
    pub fn new(resource: impl HostResource) -> Self {
        Self(Arc::new(resource))
    }

    /// Host type name
    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &HostHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostHandle({})", self.type_name())
    }
}
