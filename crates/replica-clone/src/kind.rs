//! Kind classification
//!
//! Every value falls into exactly one `Kind`, and each kind has exactly one
//! cloning strategy. Classification looks only at the internal slot, never
//! at properties, so it cannot fail or run user code.

use replica_value::{ObjectData, ObjectRef, Value};

/// Closed set of value shapes, one clone strategy each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No identity; cloned by returning it
    Primitive,
    /// Date instant
    DateTime,
    /// RegExp (source pattern plus flags)
    Pattern,
    /// Map: key to value, insertion ordered
    OrderedPairCollection,
    /// Set
    UniqueElementCollection,
    /// ArrayBuffer, and DataView over one
    RawBuffer,
    /// Int8Array to BigUint64Array
    FixedWidthNumericArray,
    /// Plain object or class instance
    ReconstructibleObject,
    /// Error or a subclass of it
    ErrorValue,
    /// Promise, weak collections, host resources, functions: passed through
    Opaque,
    /// Array
    ListCollection,
}

impl Kind {
    /// Whether values of this kind are copied (as opposed to returned as-is)
    pub fn is_cloned(&self) -> bool {
        !matches!(self, Kind::Primitive | Kind::Opaque)
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Primitive => "primitive",
            Kind::DateTime => "date",
            Kind::Pattern => "pattern",
            Kind::OrderedPairCollection => "map",
            Kind::UniqueElementCollection => "set",
            Kind::RawBuffer => "raw buffer",
            Kind::FixedWidthNumericArray => "typed array",
            Kind::ReconstructibleObject => "object",
            Kind::ErrorValue => "error",
            Kind::Opaque => "opaque",
            Kind::ListCollection => "list",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify any value
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Object(obj) => classify_object(obj),
        // Callables are shared bindings (accessors, constructors): never copied.
        Value::Function(_) => Kind::Opaque,
        _ => Kind::Primitive,
    }
}

/// Classify a heap object by its internal slot.
///
/// Error and buffer slots are matched before `Ordinary`, so an instance of
/// `class ApiError extends Error` is an `ErrorValue`, not a plain
/// `ReconstructibleObject`, even though it has a constructing type.
pub fn classify_object(obj: &ObjectRef) -> Kind {
    match &obj.read().data {
        ObjectData::Error(_) => Kind::ErrorValue,
        ObjectData::ArrayBuffer(_) | ObjectData::DataView(_) => Kind::RawBuffer,
        ObjectData::TypedArray(_) => Kind::FixedWidthNumericArray,
        ObjectData::Date(_) => Kind::DateTime,
        ObjectData::RegExp(_) => Kind::Pattern,
        ObjectData::Map(_) => Kind::OrderedPairCollection,
        ObjectData::Set(_) => Kind::UniqueElementCollection,
        ObjectData::Array(_) => Kind::ListCollection,
        ObjectData::Promise(_)
        | ObjectData::WeakMap(_)
        | ObjectData::WeakSet(_)
        | ObjectData::WeakRef(_)
        | ObjectData::Host(_) => Kind::Opaque,
        ObjectData::Ordinary => Kind::ReconstructibleObject,
    }
}
