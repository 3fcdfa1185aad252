//! Identity registry: source object to its clone, for one clone call.
//!
//! Keys are allocation addresses. Each entry also holds a handle to its
//! source so the address cannot be freed and reused by a different object
//! while the call is running. The registry is dropped with the call.

use replica_value::ObjectRef;
use rustc_hash::FxHashMap;

struct Entry {
    _source: ObjectRef,
    clone: ObjectRef,
}

/// Map from source identity to clone identity
#[derive(Default)]
pub struct IdentityRegistry {
    entries: FxHashMap<usize, Entry>,
}

impl IdentityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The clone registered for `source`, complete or still being populated
    pub fn get(&self, source: &ObjectRef) -> Option<ObjectRef> {
        self.entries
            .get(&source.as_ptr())
            .map(|entry| entry.clone.clone())
    }

    /// Register `clone` as the copy of `source`
    pub fn put(&mut self, source: &ObjectRef, clone: ObjectRef) {
        self.entries.insert(
            source.as_ptr(),
            Entry {
                _source: source.clone(),
                clone,
            },
        );
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for IdentityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityRegistry({} entries)", self.entries.len())
    }
}
