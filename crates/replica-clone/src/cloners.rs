//! Per-kind clone strategies
//!
//! Each cloner does two things for the driver: build an empty shell of the
//! right type (`make_shell`), and later fill it from the source
//! (`populate`). Shells carry the source's constructing type; only
//! `ReconstructibleObject` shells run a constructor.
//!
//! Neither step holds a lock on any object while resolving another value:
//! sources are snapshotted first, shells are written after.

use crate::diagnostics::CloneDiagnostic;
use crate::driver::DeepCloner;
use crate::kind::Kind;
use replica_value::{
    JsObject, MapData, ObjectData, ObjectRef, PropertyDescriptor, PropertyKey, SetData, Value,
    ValueError,
};

/// Result of `make_shell`: a shell of the source's own type, or a degraded
/// stand-in when that type could not be constructed.
pub(crate) enum Shell {
    Typed(ObjectRef),
    Degraded {
        shell: ObjectRef,
        type_name: String,
        reason: ValueError,
    },
}

pub(crate) trait KindCloner: Sync {
    /// Build the empty shell the source's clone will be written into
    fn make_shell(&self, source: &ObjectRef, cx: &mut DeepCloner<'_>) -> Shell;

    /// Fill `shell` from `source`. Faults are reported, never raised.
    fn populate(&self, shell: &ObjectRef, source: &ObjectRef, cx: &mut DeepCloner<'_>) {
        copy_own_properties(shell, source, cx, FieldFilter::Options);
    }
}

/// The cloner for `kind`, or None for kinds that are returned as-is
pub(crate) fn cloner_for(kind: Kind) -> Option<&'static dyn KindCloner> {
    match kind {
        Kind::Primitive | Kind::Opaque => None,
        Kind::ReconstructibleObject => Some(&ObjectCloner),
        Kind::ErrorValue => Some(&ErrorCloner),
        Kind::ListCollection => Some(&ListCloner),
        Kind::DateTime => Some(&DateCloner),
        Kind::Pattern => Some(&PatternCloner),
        Kind::OrderedPairCollection => Some(&MapCloner),
        Kind::UniqueElementCollection => Some(&SetCloner),
        Kind::RawBuffer => Some(&BufferCloner),
        Kind::FixedWidthNumericArray => Some(&TypedArrayCloner),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldFilter {
    /// Honor `include_non_enumerable` / `include_symbol_keys`
    Options,
    /// Every own field regardless of options (error objects)
    All,
}

/// Copy own fields of `source` onto `shell`.
///
/// Data fields are cloned. Accessor fields are copied as accessor
/// definitions: the getter/setter pair is shared, never invoked. Lazy
/// fields are materialized and their value cloned; one whose initializer
/// fails is skipped with a `FieldSkipped` diagnostic.
pub(crate) fn copy_own_properties(
    shell: &ObjectRef,
    source: &ObjectRef,
    cx: &mut DeepCloner<'_>,
    filter: FieldFilter,
) {
    let include_non_enumerable = filter == FieldFilter::All || cx.options().include_non_enumerable;
    let include_symbol_keys = filter == FieldFilter::All || cx.options().include_symbol_keys;

    for (key, desc) in source.own_properties() {
        if !include_non_enumerable && !desc.is_enumerable() {
            continue;
        }
        if !include_symbol_keys && key.is_symbol() {
            continue;
        }
        let copied = match desc {
            PropertyDescriptor::Data { value, attributes } => PropertyDescriptor::Data {
                value: cx.resolve(&value),
                attributes,
            },
            accessor @ PropertyDescriptor::Accessor { .. } => accessor,
            PropertyDescriptor::Lazy { init, attributes } => match init() {
                Ok(value) => PropertyDescriptor::Data {
                    value: cx.resolve(&value),
                    attributes,
                },
                Err(reason) => {
                    skip_field(cx, source, key, reason);
                    continue;
                }
            },
        };
        shell.define_property(key, copied);
    }
}

fn skip_field(cx: &mut DeepCloner<'_>, source: &ObjectRef, key: PropertyKey, reason: ValueError) {
    cx.report(CloneDiagnostic::FieldSkipped {
        owner: source.type_name(),
        key,
        reason,
    });
}

/// Shell with the source's constructing type and a fresh internal slot
fn shell_like(source: &JsObject, data: ObjectData) -> ObjectRef {
    ObjectRef::new(JsObject::new(source.class.clone(), data))
}

/// The slot changed between classification and shell construction (another
/// thread replaced it). Keep the type and the fields, drop the slot.
fn slot_changed(source: &ObjectRef) -> Shell {
    let obj = source.read();
    Shell::Typed(shell_like(&obj, ObjectData::Ordinary))
}

// ============================================================================
// ReconstructibleObject
// ============================================================================

struct ObjectCloner;

impl KindCloner for ObjectCloner {
    fn make_shell(&self, source: &ObjectRef, cx: &mut DeepCloner<'_>) -> Shell {
        let class = source.read().class.clone();
        let Some(class) = class else {
            return Shell::Typed(ObjectRef::ordinary());
        };
        match class.construct(&[]) {
            Ok(instance) => Shell::Typed(instance),
            Err(reason) => Shell::Degraded {
                shell: cx.options().fallback.shell_for(&class),
                type_name: class.name().to_string(),
                reason,
            },
        }
    }
}

// ============================================================================
// ErrorValue
// ============================================================================

struct ErrorCloner;

impl KindCloner for ErrorCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_error_kind() {
            // Rebuilt without running the error's constructor.
            Some(kind) => Shell::Typed(shell_like(&obj, ObjectData::Error(kind))),
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }

    fn populate(&self, shell: &ObjectRef, source: &ObjectRef, cx: &mut DeepCloner<'_>) {
        copy_own_properties(shell, source, cx, FieldFilter::All);
    }
}

// ============================================================================
// ListCollection
// ============================================================================

struct ListCloner;

impl KindCloner for ListCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_array() {
            Some(elements) => {
                let data = ObjectData::Array(Vec::with_capacity(elements.len()));
                Shell::Typed(shell_like(&obj, data))
            }
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }

    fn populate(&self, shell: &ObjectRef, source: &ObjectRef, cx: &mut DeepCloner<'_>) {
        let elements = source.elements().unwrap_or_default();
        let cloned: Vec<Value> = elements.iter().map(|v| cx.resolve(v)).collect();
        if let Some(target) = shell.write().as_array_mut() {
            target.extend(cloned);
        }
        copy_own_properties(shell, source, cx, FieldFilter::Options);
    }
}

// ============================================================================
// DateTime / Pattern
// ============================================================================

struct DateCloner;

impl KindCloner for DateCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_date() {
            Some(date) => Shell::Typed(shell_like(&obj, ObjectData::Date(*date))),
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }
}

struct PatternCloner;

impl KindCloner for PatternCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_regexp() {
            Some(re) => {
                Shell::Typed(shell_like(&obj, ObjectData::RegExp(re.clone())))
            }
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }
}

// ============================================================================
// OrderedPairCollection / UniqueElementCollection
// ============================================================================

struct MapCloner;

impl KindCloner for MapCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_map() {
            Some(map) => {
                let data = ObjectData::Map(MapData::with_capacity(map.size()));
                Shell::Typed(shell_like(&obj, data))
            }
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }

    fn populate(&self, shell: &ObjectRef, source: &ObjectRef, cx: &mut DeepCloner<'_>) {
        let entries = source
            .read()
            .as_map()
            .map(MapData::entries)
            .unwrap_or_default();
        for (key, value) in entries {
            // Composite keys are cloned too, not reused by reference.
            let key = cx.resolve(&key);
            let value = cx.resolve(&value);
            if let Some(map) = shell.write().as_map_mut() {
                map.set(key, value);
            }
        }
        copy_own_properties(shell, source, cx, FieldFilter::Options);
    }
}

struct SetCloner;

impl KindCloner for SetCloner {
    fn make_shell(&self, source: &ObjectRef, _cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        match obj.as_set() {
            Some(set) => {
                let data = ObjectData::Set(SetData::with_capacity(set.size()));
                Shell::Typed(shell_like(&obj, data))
            }
            None => {
                drop(obj);
                slot_changed(source)
            }
        }
    }

    fn populate(&self, shell: &ObjectRef, source: &ObjectRef, cx: &mut DeepCloner<'_>) {
        let values = source
            .read()
            .as_set()
            .map(SetData::values)
            .unwrap_or_default();
        for value in values {
            let value = cx.resolve(&value);
            if let Some(set) = shell.write().as_set_mut() {
                set.add(value);
            }
        }
        copy_own_properties(shell, source, cx, FieldFilter::Options);
    }
}

// ============================================================================
// RawBuffer / FixedWidthNumericArray
// ============================================================================

struct BufferCloner;

impl KindCloner for BufferCloner {
    fn make_shell(&self, source: &ObjectRef, cx: &mut DeepCloner<'_>) -> Shell {
        let obj = source.read();
        if let Some(buffer) = obj.as_array_buffer() {
            return Shell::Typed(shell_like(&obj, ObjectData::ArrayBuffer(buffer.duplicate())));
        }
        let Some(view) = obj.as_data_view().cloned() else {
            drop(obj);
            return slot_changed(source);
        };
        drop(obj);
        // Views share their buffer's clone, so two views over one buffer
        // stay aliased in the copy.
        let buffer = cx.resolve_object(view.buffer());
        let data = ObjectData::DataView(view.with_buffer(buffer));
        let obj = source.read();
        Shell::Typed(shell_like(&obj, data))
    }
}

struct TypedArrayCloner;

impl KindCloner for TypedArrayCloner {
    fn make_shell(&self, source: &ObjectRef, cx: &mut DeepCloner<'_>) -> Shell {
        let view = source.read().as_typed_array().cloned();
        let Some(view) = view else {
            return slot_changed(source);
        };
        let buffer = cx.resolve_object(view.buffer());
        let data = ObjectData::TypedArray(view.with_buffer(buffer));
        let obj = source.read();
        Shell::Typed(shell_like(&obj, data))
    }
}
