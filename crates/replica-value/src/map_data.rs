//! Backing data structures for Map and Set.
//!
//! Keys use SameValueZero via `MapKey`; iteration follows insertion order.
//! Deleting keeps the relative order of the remaining entries.

use crate::value::{Value, same_value_zero};
use indexmap::{IndexMap, IndexSet};
use std::hash::{Hash, Hasher};

/// A wrapper around `Value` that implements `Hash` and `Eq` using SameValueZero.
#[derive(Clone)]
pub struct MapKey(pub Value);

impl MapKey {
    /// Returns a reference to the underlying `Value`.
    pub fn value(&self) -> &Value {
        &self.0
    }
}

// Type discriminant tags for hashing
const HASH_TAG_UNDEFINED: u8 = 0;
const HASH_TAG_NULL: u8 = 1;
const HASH_TAG_BOOL: u8 = 2;
const HASH_TAG_FLOAT64: u8 = 4;
const HASH_TAG_STRING: u8 = 5;
const HASH_TAG_SYMBOL: u8 = 6;
const HASH_TAG_OBJECT: u8 = 7;
const HASH_TAG_FUNCTION: u8 = 8;
const HASH_TAG_BIGINT: u8 = 9;

/// Normalize a float for SameValueZero hashing: -0 to +0, NaN to canonical NaN bits.
fn normalize_float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0u64
    } else if n.is_nan() {
        0x7FF8_0000_0000_0000u64
    } else {
        n.to_bits()
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Undefined => HASH_TAG_UNDEFINED.hash(state),
            Value::Null => HASH_TAG_NULL.hash(state),
            Value::Boolean(b) => {
                HASH_TAG_BOOL.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                HASH_TAG_FLOAT64.hash(state);
                normalize_float_bits(*n).hash(state);
            }
            Value::String(s) => {
                HASH_TAG_STRING.hash(state);
                s.hash(state);
            }
            Value::Symbol(sym) => {
                HASH_TAG_SYMBOL.hash(state);
                sym.id().hash(state);
            }
            Value::BigInt(b) => {
                HASH_TAG_BIGINT.hash(state);
                b.hash(state);
            }
            Value::Function(f) => {
                HASH_TAG_FUNCTION.hash(state);
                f.as_ptr().hash(state);
            }
            // Identity only: never lock the object to hash it.
            Value::Object(obj) => {
                HASH_TAG_OBJECT.hash(state);
                obj.as_ptr().hash(state);
            }
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        same_value_zero(&self.0, &other.0)
    }
}

impl Eq for MapKey {}

impl std::fmt::Debug for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MapKey({:?})", self.0)
    }
}

// ============================================================================
// MapData
// ============================================================================

/// Internal storage for a `Map`.
#[derive(Debug, Default)]
pub struct MapData {
    entries: IndexMap<MapKey, Value>,
}

impl MapData {
    /// Create an empty MapData.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty MapData with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Get the value associated with `key`, or `None`.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries.get(&MapKey(key.clone())).cloned()
    }

    /// Returns `true` if `key` exists.
    pub fn has(&self, key: &Value) -> bool {
        self.entries.contains_key(&MapKey(key.clone()))
    }

    /// Insert or update `key` to `value`. Returns `true` if this was an update.
    /// Updates keep the key's original position.
    pub fn set(&mut self, key: Value, value: Value) -> bool {
        self.entries.insert(MapKey(key), value).is_some()
    }

    /// Delete `key`. Returns `true` if it existed.
    pub fn delete(&mut self, key: &Value) -> bool {
        self.entries.shift_remove(&MapKey(key.clone())).is_some()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.value().clone(), v.clone()))
            .collect()
    }
}

// ============================================================================
// SetData
// ============================================================================

/// Internal storage for a `Set`.
#[derive(Debug, Default)]
pub struct SetData {
    values: IndexSet<MapKey>,
}

impl SetData {
    /// Create an empty SetData.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty SetData with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexSet::with_capacity(capacity),
        }
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if `value` is a member.
    pub fn has(&self, value: &Value) -> bool {
        self.values.contains(&MapKey(value.clone()))
    }

    /// Add `value`. Returns `true` if it was newly inserted.
    pub fn add(&mut self, value: Value) -> bool {
        self.values.insert(MapKey(value))
    }

    /// Delete `value`. Returns `true` if it existed.
    pub fn delete(&mut self, value: &Value) -> bool {
        self.values.shift_remove(&MapKey(value.clone()))
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Snapshot of elements in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.values.iter().map(|k| k.value().clone()).collect()
    }
}
