//! Shared helpers for replica-clone integration tests

#![allow(dead_code)]

use replica_value::{ObjectData, ObjectRef, PropertyDescriptor, PropertyKey, Value};
use rustc_hash::FxHashSet;

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn key(name: &str) -> PropertyKey {
    PropertyKey::string(name)
}

/// Plain object with the given enumerable data fields
pub fn object(fields: &[(&str, Value)]) -> ObjectRef {
    let obj = ObjectRef::ordinary();
    for (name, value) in fields {
        obj.set(key(name), value.clone()).unwrap();
    }
    obj
}

pub fn field(obj: &ObjectRef, name: &str) -> Value {
    obj.get(&key(name)).unwrap()
}

pub fn field_object(obj: &ObjectRef, name: &str) -> ObjectRef {
    field(obj, name)
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("field '{}' is not an object", name))
}

/// Identities of every object reachable from `root` through data fields,
/// array elements, collection entries and view buffers.
pub fn reachable(root: &Value) -> FxHashSet<usize> {
    let mut seen = FxHashSet::default();
    let mut stack: Vec<ObjectRef> = root.as_object().cloned().into_iter().collect();
    while let Some(obj) = stack.pop() {
        if !seen.insert(obj.as_ptr()) {
            continue;
        }
        let mut children: Vec<Value> = obj
            .own_properties()
            .into_iter()
            .filter_map(|(_, desc)| match desc {
                PropertyDescriptor::Data { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        {
            let guard = obj.read();
            match &guard.data {
                ObjectData::Array(elements) => children.extend(elements.iter().cloned()),
                ObjectData::Map(map) => {
                    for (k, v) in map.entries() {
                        children.push(k);
                        children.push(v);
                    }
                }
                ObjectData::Set(set) => children.extend(set.values()),
                ObjectData::TypedArray(view) => {
                    children.push(Value::object(view.buffer().clone()))
                }
                ObjectData::DataView(view) => children.push(Value::object(view.buffer().clone())),
                _ => {}
            }
        }
        stack.extend(children.iter().filter_map(|v| v.as_object().cloned()));
    }
    seen
}

/// Assert that no object of `clone` is an object of `source`, apart from
/// the ones listed in `shared` (opaque values).
pub fn assert_disjoint(source: &Value, clone: &Value, shared: &[&ObjectRef]) {
    let shared: FxHashSet<usize> = shared.iter().map(|o| o.as_ptr()).collect();
    let source_ids = reachable(source);
    for id in reachable(clone) {
        assert!(
            !source_ids.contains(&id) || shared.contains(&id),
            "clone reaches source object {:#x}",
            id
        );
    }
}

/// Break a `next`-linked chain node by node so dropping it does not recurse
/// through the whole chain.
pub fn unlink_chain(head: ObjectRef) {
    let mut current = Some(head);
    while let Some(node) = current {
        let next = node.get(&key("next")).ok().and_then(|v| v.as_object().cloned());
        node.write().delete_own_property(&key("next"));
        current = next;
    }
}
