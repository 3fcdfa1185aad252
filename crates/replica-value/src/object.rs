//! Heap objects
//!
//! Every composite value is a `JsObject` behind an `ObjectRef` handle. The
//! handle is the identity: two `ObjectRef`s are the same object iff they
//! point at the same allocation.
//!
//! An object has three parts:
//! - `class`: the constructing type, if any (plain `{}` objects have none)
//! - `data`: the internal slot that makes it a Map, a Date, a buffer, ...
//! - own properties, kept in insertion order

use crate::array_buffer::ArrayBufferData;
use crate::class::Class;
use crate::data_view::DataViewData;
use crate::date::DateData;
use crate::error::{ValueError, ValueResult};
use crate::map_data::{MapData, SetData};
use crate::native_error::ErrorKind;
use crate::opaque::{HostHandle, PromiseState, WeakMapData, WeakSetData};
use crate::property::{PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::regexp::RegExpData;
use crate::typed_array::{TypedArrayData, TypedArrayKind};
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::{Arc, Weak};

/// Internal slot of an object
#[derive(Debug)]
pub enum ObjectData {
    /// Plain object or class instance
    Ordinary,
    /// Array elements
    Array(Vec<Value>),
    /// Date
    Date(DateData),
    /// RegExp
    RegExp(RegExpData),
    /// Map
    Map(MapData),
    /// Set
    Set(SetData),
    /// ArrayBuffer
    ArrayBuffer(ArrayBufferData),
    /// Int8Array, Float64Array, ...
    TypedArray(TypedArrayData),
    /// DataView
    DataView(DataViewData),
    /// Error and its native subclasses
    Error(ErrorKind),
    /// Promise
    Promise(PromiseState),
    /// WeakMap
    WeakMap(WeakMapData),
    /// WeakSet
    WeakSet(WeakSetData),
    /// WeakRef
    WeakRef(WeakObjectRef),
    /// Resource owned by the embedder
    Host(HostHandle),
}

impl ObjectData {
    /// Built-in type name of this slot
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectData::Ordinary => "Object",
            ObjectData::Array(_) => "Array",
            ObjectData::Date(_) => "Date",
            ObjectData::RegExp(_) => "RegExp",
            ObjectData::Map(_) => "Map",
            ObjectData::Set(_) => "Set",
            ObjectData::ArrayBuffer(_) => "ArrayBuffer",
            ObjectData::TypedArray(ta) => ta.kind().name(),
            ObjectData::DataView(_) => "DataView",
            ObjectData::Error(kind) => kind.name(),
            ObjectData::Promise(_) => "Promise",
            ObjectData::WeakMap(_) => "WeakMap",
            ObjectData::WeakSet(_) => "WeakSet",
            ObjectData::WeakRef(_) => "WeakRef",
            ObjectData::Host(_) => "HostObject",
        }
    }
}

/// An object: constructing type, internal slot and own properties
pub struct JsObject {
    /// Constructing type (`None` for plain objects and built-ins)
    pub class: Option<Arc<Class>>,
    /// Internal slot
    pub data: ObjectData,
    properties: IndexMap<PropertyKey, PropertyDescriptor>,
}

impl JsObject {
    /// Create an object with no own properties
    pub fn new(class: Option<Arc<Class>>, data: ObjectData) -> Self {
        Self {
            class,
            data,
            properties: IndexMap::new(),
        }
    }

    /// Name of the constructing type, falling back to the built-in name
    pub fn type_name(&self) -> String {
        match &self.class {
            Some(class) => class.name().to_string(),
            None => self.data.type_name().to_string(),
        }
    }

    /// Get an own property descriptor
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    /// Define (or replace) an own property. Replacing keeps the key's
    /// original position.
    pub fn define_own_property(&mut self, key: PropertyKey, desc: PropertyDescriptor) {
        self.properties.insert(key, desc);
    }

    /// Remove an own property, keeping the order of the rest
    pub fn delete_own_property(&mut self, key: &PropertyKey) -> bool {
        self.properties.shift_remove(key).is_some()
    }

    /// Own properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyKey, &PropertyDescriptor)> {
        self.properties.iter()
    }

    /// Array elements
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match &self.data {
            ObjectData::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Array elements, mutably
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.data {
            ObjectData::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Map entries
    pub fn as_map(&self) -> Option<&MapData> {
        match &self.data {
            ObjectData::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Map entries, mutably
    pub fn as_map_mut(&mut self) -> Option<&mut MapData> {
        match &mut self.data {
            ObjectData::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Set elements
    pub fn as_set(&self) -> Option<&SetData> {
        match &self.data {
            ObjectData::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Set elements, mutably
    pub fn as_set_mut(&mut self) -> Option<&mut SetData> {
        match &mut self.data {
            ObjectData::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Date instant
    pub fn as_date(&self) -> Option<&DateData> {
        match &self.data {
            ObjectData::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Date instant, mutably
    pub fn as_date_mut(&mut self) -> Option<&mut DateData> {
        match &mut self.data {
            ObjectData::Date(date) => Some(date),
            _ => None,
        }
    }

    /// RegExp matcher
    pub fn as_regexp(&self) -> Option<&RegExpData> {
        match &self.data {
            ObjectData::RegExp(re) => Some(re),
            _ => None,
        }
    }

    /// ArrayBuffer storage
    pub fn as_array_buffer(&self) -> Option<&ArrayBufferData> {
        match &self.data {
            ObjectData::ArrayBuffer(buf) => Some(buf),
            _ => None,
        }
    }

    /// ArrayBuffer storage, mutably
    pub fn as_array_buffer_mut(&mut self) -> Option<&mut ArrayBufferData> {
        match &mut self.data {
            ObjectData::ArrayBuffer(buf) => Some(buf),
            _ => None,
        }
    }

    /// TypedArray view
    pub fn as_typed_array(&self) -> Option<&TypedArrayData> {
        match &self.data {
            ObjectData::TypedArray(ta) => Some(ta),
            _ => None,
        }
    }

    /// DataView view
    pub fn as_data_view(&self) -> Option<&DataViewData> {
        match &self.data {
            ObjectData::DataView(dv) => Some(dv),
            _ => None,
        }
    }

    /// Native error kind
    pub fn as_error_kind(&self) -> Option<ErrorKind> {
        match &self.data {
            ObjectData::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Promise state
    pub fn as_promise_mut(&mut self) -> Option<&mut PromiseState> {
        match &mut self.data {
            ObjectData::Promise(state) => Some(state),
            _ => None,
        }
    }

    /// WeakMap table, mutably
    pub fn as_weak_map_mut(&mut self) -> Option<&mut WeakMapData> {
        match &mut self.data {
            ObjectData::WeakMap(table) => Some(table),
            _ => None,
        }
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "JsObject({}, {} properties)",
            self.type_name(),
            self.properties.len()
        )
    }
}

/// Shared, thread-safe handle to a heap object
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<JsObject>>);

impl ObjectRef {
    /// Move an object onto the heap
    pub fn new(object: JsObject) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    fn with_data(data: ObjectData) -> Self {
        Self::new(JsObject::new(None, data))
    }

    /// Create an empty plain object (`{}`)
    pub fn ordinary() -> Self {
        Self::with_data(ObjectData::Ordinary)
    }

    /// Create an array from elements
    pub fn array(elements: Vec<Value>) -> Self {
        Self::with_data(ObjectData::Array(elements))
    }

    /// Create a Date
    pub fn date(date: DateData) -> Self {
        Self::with_data(ObjectData::Date(date))
    }

    /// Create a RegExp with `lastIndex` set to 0
    pub fn regexp(source: &str, flags: &str) -> Self {
        let obj = Self::with_data(ObjectData::RegExp(RegExpData::new(source, flags)));
        obj.define_property(
            PropertyKey::string("lastIndex"),
            PropertyDescriptor::data_with_attrs(
                Value::number(0.0),
                PropertyAttributes {
                    writable: true,
                    enumerable: false,
                    configurable: false,
                },
            ),
        );
        obj
    }

    /// Create an empty Map
    pub fn map() -> Self {
        Self::with_data(ObjectData::Map(MapData::new()))
    }

    /// Create an empty Set
    pub fn set_collection() -> Self {
        Self::with_data(ObjectData::Set(SetData::new()))
    }

    /// Create a zero-filled ArrayBuffer
    pub fn array_buffer(byte_length: usize) -> Self {
        Self::with_data(ObjectData::ArrayBuffer(ArrayBufferData::new(byte_length)))
    }

    /// Create an ArrayBuffer owning `bytes`
    pub fn array_buffer_from(bytes: Vec<u8>) -> Self {
        Self::with_data(ObjectData::ArrayBuffer(ArrayBufferData::from_bytes(bytes)))
    }

    /// Create a TypedArray with its own zero-filled buffer
    pub fn typed_array(kind: TypedArrayKind, length: usize) -> ValueResult<Self> {
        let byte_length = length
            .checked_mul(kind.element_size())
            .ok_or_else(|| ValueError::range_error("TypedArray length overflow"))?;
        let buffer = Self::array_buffer(byte_length);
        Ok(Self::with_data(ObjectData::TypedArray(
            TypedArrayData::over_fresh_buffer(buffer, kind, length),
        )))
    }

    /// Create a TypedArray view over an existing ArrayBuffer object
    pub fn typed_array_view(
        buffer: &ObjectRef,
        kind: TypedArrayKind,
        byte_offset: usize,
        length: usize,
    ) -> ValueResult<Self> {
        let view = TypedArrayData::new(buffer.clone(), kind, byte_offset, length)?;
        Ok(Self::with_data(ObjectData::TypedArray(view)))
    }

    /// Create a DataView over an existing ArrayBuffer object
    pub fn data_view(
        buffer: &ObjectRef,
        byte_offset: usize,
        byte_length: Option<usize>,
    ) -> ValueResult<Self> {
        let view = DataViewData::new(buffer.clone(), byte_offset, byte_length)?;
        Ok(Self::with_data(ObjectData::DataView(view)))
    }

    /// Create a native error object with hidden `message` and lazy `stack`
    pub fn error(kind: ErrorKind, message: &str) -> Self {
        Self::build_error(None, kind, message)
    }

    /// Create an instance of an error subclass (`class X extends Error`)
    pub fn error_with_class(class: Arc<Class>, kind: ErrorKind, message: &str) -> Self {
        Self::build_error(Some(class), kind, message)
    }

    fn build_error(class: Option<Arc<Class>>, kind: ErrorKind, message: &str) -> Self {
        let name = class
            .as_ref()
            .map_or_else(|| kind.name().to_string(), |c| c.name().to_string());
        let obj = Self::new(JsObject::new(class, ObjectData::Error(kind)));
        obj.define_property(
            PropertyKey::string("message"),
            PropertyDescriptor::data_with_attrs(
                Value::string(message),
                PropertyAttributes::hidden(),
            ),
        );
        let header = format!("{}: {}", name, message);
        obj.define_property(
            PropertyKey::string("stack"),
            PropertyDescriptor::Lazy {
                init: Arc::new(move || Ok(Value::string(&format!("{}\n    at <anonymous>", header)))),
                attributes: PropertyAttributes::hidden(),
            },
        );
        obj
    }

    /// Create a pending Promise
    pub fn promise() -> Self {
        Self::with_data(ObjectData::Promise(PromiseState::Pending))
    }

    /// Create an empty WeakMap
    pub fn weak_map() -> Self {
        Self::with_data(ObjectData::WeakMap(WeakMapData::new()))
    }

    /// Create an empty WeakSet
    pub fn weak_set() -> Self {
        Self::with_data(ObjectData::WeakSet(WeakSetData::new()))
    }

    /// Create a WeakRef to `target`
    pub fn weak_ref(target: &ObjectRef) -> Self {
        Self::with_data(ObjectData::WeakRef(target.downgrade()))
    }

    /// Wrap a host resource
    pub fn host(handle: HostHandle) -> Self {
        Self::with_data(ObjectData::Host(handle))
    }

    /// Lock for reading
    pub fn read(&self) -> RwLockReadGuard<'_, JsObject> {
        self.0.read()
    }

    /// Lock for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, JsObject> {
        self.0.write()
    }

    /// Address of the allocation; stable for the object's lifetime
    pub fn as_ptr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Create a weak handle
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Arc::downgrade(&self.0))
    }

    /// Name of the constructing type, if the object has one
    pub fn class_name(&self) -> Option<String> {
        self.read().class.as_ref().map(|c| c.name().to_string())
    }

    /// Constructing type or built-in name
    pub fn type_name(&self) -> String {
        self.read().type_name()
    }

    /// Read a property: data fields return their value, accessors run their
    /// getter, lazy fields are materialized (and stay materialized).
    pub fn get(&self, key: &PropertyKey) -> ValueResult<Value> {
        let desc = self.read().get_own_property(key).cloned();
        match desc {
            None => Ok(Value::undefined()),
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor { get, .. }) => match get {
                Some(getter) => getter.call(&Value::object(self.clone()), &[]),
                None => Ok(Value::undefined()),
            },
            Some(PropertyDescriptor::Lazy { init, attributes }) => {
                let value = init()?;
                self.write().define_own_property(
                    key.clone(),
                    PropertyDescriptor::data_with_attrs(value.clone(), attributes),
                );
                Ok(value)
            }
        }
    }

    /// Assign a property: runs setters, rejects read-only fields, creates
    /// missing fields as plain data properties.
    pub fn set(&self, key: PropertyKey, value: Value) -> ValueResult<()> {
        let setter = {
            let mut obj = self.write();
            match obj.get_own_property(&key) {
                None => {
                    obj.define_own_property(key, PropertyDescriptor::data(value));
                    return Ok(());
                }
                Some(PropertyDescriptor::Accessor { set, .. }) => set.clone(),
                Some(desc) => {
                    if !desc.is_writable() {
                        return Err(ValueError::type_error(format!(
                            "Cannot assign to read only property '{}'",
                            key
                        )));
                    }
                    let attributes = desc.attributes();
                    obj.define_own_property(
                        key,
                        PropertyDescriptor::data_with_attrs(value, attributes),
                    );
                    return Ok(());
                }
            }
        };
        match setter {
            Some(setter) => setter
                .call(&Value::object(self.clone()), &[value])
                .map(|_| ()),
            None => Err(ValueError::type_error(format!(
                "Cannot set property '{}' which has only a getter",
                key
            ))),
        }
    }

    /// Define (or replace) an own property without running setters
    pub fn define_property(&self, key: PropertyKey, desc: PropertyDescriptor) {
        self.write().define_own_property(key, desc);
    }

    /// Copy of an own property descriptor
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.read().get_own_property(key).cloned()
    }

    /// Own property keys in insertion order
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        self.read().properties().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of own properties. The lock is released before returning,
    /// so callers may freely touch other objects (or this one) afterwards.
    pub fn own_properties(&self) -> Vec<(PropertyKey, PropertyDescriptor)> {
        self.read()
            .properties()
            .map(|(k, d)| (k.clone(), d.clone()))
            .collect()
    }

    /// Array element at `index`
    pub fn element(&self, index: usize) -> Option<Value> {
        self.read().as_array()?.get(index).cloned()
    }

    /// Snapshot of array elements
    pub fn elements(&self) -> Option<Vec<Value>> {
        self.read().as_array().cloned()
    }

    /// Write an array element, growing the array with `undefined` as needed.
    /// Returns `false` if this object is not an array.
    pub fn set_element(&self, index: usize, value: Value) -> bool {
        let mut obj = self.write();
        let Some(elements) = obj.as_array_mut() else {
            return false;
        };
        if index >= elements.len() {
            elements.resize(index + 1, Value::undefined());
        }
        elements[index] = value;
        true
    }

    /// Append an array element. Returns `false` if this object is not an array.
    pub fn push(&self, value: Value) -> bool {
        match self.write().as_array_mut() {
            Some(elements) => {
                elements.push(value);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // try_read: Debug may run while the caller holds the write lock.
        match self.0.try_read() {
            Some(obj) => write!(f, "[object {} @{:#x}]", obj.type_name(), self.as_ptr()),
            None => write!(f, "[object <locked> @{:#x}]", self.as_ptr()),
        }
    }
}

/// Weak handle to a heap object
#[derive(Clone)]
pub struct WeakObjectRef(Weak<RwLock<JsObject>>);

impl WeakObjectRef {
    /// Get the object if it is still alive
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }

    /// Check whether this handle points at `target` and the target is alive
    pub fn is(&self, target: &ObjectRef) -> bool {
        self.0.strong_count() > 0 && std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(&target.0))
    }
}

impl std::fmt::Debug for WeakObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeakObjectRef(alive={})", self.0.strong_count() > 0)
    }
}
