//! Deep clone correctness tests
//!
//! Shape, identity and independence of clones across every clonable kind.

mod common;

use common::{assert_disjoint, field, field_object, key, object};
use num_bigint::BigInt;
use replica_clone::{Kind, classify, deep_clone, deep_clone_with, CloneOptions};
use replica_value::{
    Class, DateData, ErrorKind, HostHandle, HostResource, JsFunction, ObjectData, ObjectRef,
    PropertyKey, Symbol, TypedArrayKind, Value,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn clone_object(obj: &ObjectRef) -> ObjectRef {
    deep_clone(&Value::object(obj.clone()))
        .as_object()
        .cloned()
        .expect("clone of an object is an object")
}

#[test]
fn test_primitives_are_returned_unchanged() {
    let sym = Symbol::new(Some("tag"));
    let values = [
        Value::undefined(),
        Value::null(),
        Value::boolean(true),
        Value::number(f64::NAN),
        Value::number(-0.0),
        Value::string("text"),
        Value::bigint(BigInt::from(1u64) << 80),
        Value::Symbol(sym.clone()),
    ];
    for value in &values {
        assert_eq!(&deep_clone(value), value);
    }
    assert_eq!(deep_clone(&Value::Symbol(sym.clone())).as_symbol(), Some(&sym));
}

#[test]
fn test_shape_is_preserved() {
    let buffer = ObjectRef::array_buffer(8);
    let sources = [
        ObjectRef::ordinary(),
        ObjectRef::array(vec![Value::number(1.0)]),
        ObjectRef::date(DateData::from_millis(0.0)),
        ObjectRef::regexp("a+b", "gi"),
        ObjectRef::map(),
        ObjectRef::set_collection(),
        buffer.clone(),
        ObjectRef::data_view(&buffer, 2, Some(4)).unwrap(),
        ObjectRef::typed_array(TypedArrayKind::Int16, 3).unwrap(),
        ObjectRef::error(ErrorKind::TypeError, "bad"),
    ];
    for source in sources {
        let value = Value::object(source.clone());
        let clone = deep_clone(&value);
        assert_eq!(classify(&clone), classify(&value), "{}", source.type_name());
        assert_eq!(clone.as_object().unwrap().type_name(), source.type_name());
        assert!(!clone.as_object().unwrap().ptr_eq(&source));
    }
}

#[test]
fn test_nested_fields_are_copied() {
    let inner = object(&[("n", Value::number(2.0))]);
    let list = ObjectRef::array(vec![Value::string("a"), Value::object(inner.clone())]);
    let root = object(&[
        ("name", Value::string("root")),
        ("list", Value::object(list.clone())),
    ]);

    let clone = clone_object(&root);
    assert_eq!(field(&clone, "name"), Value::string("root"));

    let cloned_list = field_object(&clone, "list");
    assert!(!cloned_list.ptr_eq(&list));
    assert_eq!(cloned_list.element(0), Some(Value::string("a")));
    let cloned_inner = cloned_list.element(1).unwrap().as_object().cloned().unwrap();
    assert!(!cloned_inner.ptr_eq(&inner));
    assert_eq!(field(&cloned_inner, "n"), Value::number(2.0));
}

#[test]
fn test_field_order_is_preserved() {
    let root = object(&[
        ("z", Value::number(1.0)),
        ("a", Value::number(2.0)),
        ("m", Value::number(3.0)),
    ]);
    let clone = clone_object(&root);
    assert_eq!(clone.own_property_keys(), root.own_property_keys());
}

#[test]
fn test_clone_is_independent() {
    let inner = object(&[("v", Value::number(1.0))]);
    let list = ObjectRef::array(vec![Value::object(inner.clone())]);
    let root = object(&[("inner", Value::object(inner.clone())), ("list", Value::object(list.clone()))]);

    let source = Value::object(root.clone());
    let clone = deep_clone(&source);
    assert_disjoint(&source, &clone, &[]);

    let cloned = clone.as_object().unwrap();
    field_object(cloned, "inner")
        .set(key("v"), Value::number(99.0))
        .unwrap();
    field_object(cloned, "list").push(Value::null());
    assert_eq!(field(&inner, "v"), Value::number(1.0));
    assert_eq!(list.elements().unwrap().len(), 1);

    inner.set(key("v"), Value::number(-1.0)).unwrap();
    assert_eq!(field(&field_object(cloned, "inner"), "v"), Value::number(99.0));
}

#[test]
fn test_self_cycle() {
    let a = ObjectRef::ordinary();
    a.set(key("self"), Value::object(a.clone())).unwrap();

    let clone = clone_object(&a);
    assert!(!clone.ptr_eq(&a));
    assert!(field_object(&clone, "self").ptr_eq(&clone));
}

#[test]
fn test_indirect_cycle_through_collections() {
    let parent = ObjectRef::ordinary();
    let children = ObjectRef::array(vec![]);
    let child = object(&[("parent", Value::object(parent.clone()))]);
    children.push(Value::object(child.clone()));
    parent.set(key("children"), Value::object(children)).unwrap();

    let registry = ObjectRef::map();
    registry
        .write()
        .as_map_mut()
        .unwrap()
        .set(Value::string("root"), Value::object(parent.clone()));
    parent.set(key("registry"), Value::object(registry)).unwrap();

    let clone = clone_object(&parent);
    let cloned_child = field_object(&clone, "children")
        .element(0)
        .and_then(|v| v.as_object().cloned())
        .unwrap();
    assert!(field_object(&cloned_child, "parent").ptr_eq(&clone));

    let cloned_registry = field_object(&clone, "registry");
    let via_map = cloned_registry
        .read()
        .as_map()
        .unwrap()
        .get(&Value::string("root"))
        .unwrap();
    assert!(via_map.as_object().unwrap().ptr_eq(&clone));
}

#[test]
fn test_shared_references_stay_shared() {
    let shared = object(&[("x", Value::number(1.0))]);
    let root = object(&[
        ("a", Value::object(shared.clone())),
        ("b", Value::object(shared.clone())),
    ]);

    let clone = clone_object(&root);
    let a = field_object(&clone, "a");
    let b = field_object(&clone, "b");
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&shared));
}

#[test]
fn test_map_with_composite_key() {
    let k = object(&[("id", Value::number(1.0))]);
    let v = object(&[("v", Value::number(2.0))]);
    let map = ObjectRef::map();
    map.write()
        .as_map_mut()
        .unwrap()
        .set(Value::object(k.clone()), Value::object(v.clone()));
    let root = ObjectRef::array(vec![Value::object(map.clone()), Value::object(k.clone())]);

    let clone = clone_object(&root);
    let cloned_map = clone.element(0).and_then(|v| v.as_object().cloned()).unwrap();
    let entries = cloned_map.read().as_map().unwrap().entries();
    assert_eq!(entries.len(), 1);

    let (cloned_key, cloned_value) = &entries[0];
    let cloned_key = cloned_key.as_object().unwrap();
    let cloned_value = cloned_value.as_object().unwrap();
    assert!(!cloned_key.ptr_eq(&k));
    assert!(!cloned_value.ptr_eq(&v));
    assert_eq!(field(cloned_key, "id"), Value::number(1.0));
    assert_eq!(field(cloned_value, "v"), Value::number(2.0));

    // The key's clone is the same object as the clone reached elsewhere.
    let cloned_k = clone.element(1).and_then(|v| v.as_object().cloned()).unwrap();
    assert!(cloned_key.ptr_eq(&cloned_k));
    assert!(cloned_map.read().as_map().unwrap().has(&Value::object(cloned_k)));
}

#[test]
fn test_map_and_set_keep_order_and_primitive_keys() {
    let map = ObjectRef::map();
    {
        let mut guard = map.write();
        let data = guard.as_map_mut().unwrap();
        data.set(Value::string("b"), Value::number(1.0));
        data.set(Value::number(f64::NAN), Value::number(2.0));
        data.set(Value::string("a"), Value::number(3.0));
    }
    let set = ObjectRef::set_collection();
    {
        let mut guard = set.write();
        let data = guard.as_set_mut().unwrap();
        data.add(Value::number(3.0));
        data.add(Value::object(ObjectRef::ordinary()));
        data.add(Value::string("x"));
    }

    let cloned_map = clone_object(&map);
    assert_eq!(
        cloned_map.read().as_map().unwrap().entries(),
        map.read().as_map().unwrap().entries()
    );
    assert!(cloned_map.read().as_map().unwrap().has(&Value::number(f64::NAN)));

    let cloned_set = clone_object(&set);
    let values = cloned_set.read().as_set().unwrap().values();
    let originals = set.read().as_set().unwrap().values();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0], Value::number(3.0));
    assert_eq!(values[2], Value::string("x"));
    assert_ne!(values[1], originals[1]);
}

#[test]
fn test_array_buffer_is_duplicated() {
    let bytes: Vec<u8> = (0..=255).collect();
    let buffer = ObjectRef::array_buffer_from(bytes.clone());

    let clone = clone_object(&buffer);
    assert_eq!(
        clone.read().as_array_buffer().unwrap().byte_length(),
        bytes.len()
    );
    assert_eq!(clone.read().as_array_buffer().unwrap().bytes(), Some(&bytes[..]));

    assert!(clone.write().as_array_buffer_mut().unwrap().set(0, 42));
    assert_eq!(buffer.read().as_array_buffer().unwrap().get(0), Some(0));
}

#[test]
fn test_detached_buffer_clones_detached() {
    let buffer = ObjectRef::array_buffer_from(vec![1, 2, 3]);
    buffer.write().as_array_buffer_mut().unwrap().detach();

    let clone = clone_object(&buffer);
    assert!(clone.read().as_array_buffer().unwrap().is_detached());
}

#[test]
fn test_typed_array_contents_and_independence() {
    let source = ObjectRef::typed_array(TypedArrayKind::Float64, 3).unwrap();
    {
        let guard = source.read();
        let view = guard.as_typed_array().unwrap();
        assert!(view.set(0, &Value::number(1.5)));
        assert!(view.set(2, &Value::number(-4.0)));
    }

    let clone = clone_object(&source);
    let guard = clone.read();
    let view = guard.as_typed_array().unwrap();
    assert_eq!(view.kind(), TypedArrayKind::Float64);
    assert_eq!(view.length(), 3);
    assert_eq!(view.get(0), Some(Value::number(1.5)));
    assert_eq!(view.get(2), Some(Value::number(-4.0)));

    assert!(view.set(0, &Value::number(7.0)));
    let original = source.read().as_typed_array().unwrap().get(0);
    assert_eq!(original, Some(Value::number(1.5)));
}

#[test]
fn test_views_over_one_buffer_share_its_clone() {
    let buffer = ObjectRef::array_buffer(16);
    let bytes = ObjectRef::typed_array_view(&buffer, TypedArrayKind::Uint8, 0, 16).unwrap();
    let words = ObjectRef::typed_array_view(&buffer, TypedArrayKind::Uint32, 8, 2).unwrap();
    let view = ObjectRef::data_view(&buffer, 4, Some(4)).unwrap();
    let root = ObjectRef::array(vec![
        Value::object(bytes),
        Value::object(words),
        Value::object(view),
    ]);

    let clone = clone_object(&root);
    let element = |i| clone.element(i).and_then(|v| v.as_object().cloned()).unwrap();
    let (c_bytes, c_words, c_view) = (element(0), element(1), element(2));

    let byte_buffer = c_bytes.read().as_typed_array().unwrap().buffer().clone();
    let word_buffer = c_words.read().as_typed_array().unwrap().buffer().clone();
    let view_buffer = c_view.read().as_data_view().unwrap().buffer().clone();
    assert!(byte_buffer.ptr_eq(&word_buffer));
    assert!(byte_buffer.ptr_eq(&view_buffer));
    assert!(!byte_buffer.ptr_eq(&buffer));

    assert!(c_words.read().as_typed_array().unwrap().set(0, &Value::number(0x0102_0304 as f64)));
    assert_eq!(c_bytes.read().as_typed_array().unwrap().get(8), Some(Value::number(4.0)));
    c_view.read().as_data_view().unwrap().set_uint8(0, 9).unwrap();
    assert_eq!(c_bytes.read().as_typed_array().unwrap().get(4), Some(Value::number(9.0)));
    assert_eq!(buffer.read().as_array_buffer().unwrap().get(8), Some(0));

    let guard = c_view.read();
    let dv = guard.as_data_view().unwrap();
    assert_eq!((dv.byte_offset(), dv.byte_length()), (4, 4));
}

#[test]
fn test_date_and_regexp() {
    let date = ObjectRef::date(DateData::from_millis(1_700_000_000_123.0));
    let invalid = ObjectRef::date(DateData::invalid());
    let re = ObjectRef::regexp("h(e)llo", "gi");
    re.set(key("lastIndex"), Value::number(3.0)).unwrap();

    let c_date = clone_object(&date);
    assert_eq!(c_date.read().as_date(), date.read().as_date());
    c_date.write().as_date_mut().unwrap().set_time(0.0);
    assert_eq!(date.read().as_date().unwrap().time_value(), 1_700_000_000_123.0);

    assert!(!clone_object(&invalid).read().as_date().unwrap().is_valid());

    let c_re = clone_object(&re);
    {
        let guard = c_re.read();
        let data = guard.as_regexp().unwrap();
        assert_eq!(data.source(), "h(e)llo");
        assert_eq!(data.flags(), "gi");
        assert!(data.test("HELLO"));
    }
    assert_eq!(field(&c_re, "lastIndex"), Value::number(3.0));
    assert!(!c_re.get_own_property(&key("lastIndex")).unwrap().is_enumerable());
}

#[test]
fn test_array_extra_fields() {
    let arr = ObjectRef::array(vec![Value::number(1.0), Value::undefined()]);
    arr.set(key("tag"), Value::string("extra")).unwrap();

    let clone = clone_object(&arr);
    assert_eq!(clone.elements().unwrap(), arr.elements().unwrap());
    assert_eq!(field(&clone, "tag"), Value::string("extra"));
}

#[test]
fn test_class_instance_is_reconstructed() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();
    let point = Class::with_initializer("Point", move |this, args| {
        counter.fetch_add(1, Ordering::SeqCst);
        let x = args.first().cloned().unwrap_or(Value::number(0.0));
        this.set(PropertyKey::string("x"), x)
    });
    let p = point.construct(&[Value::number(5.0)]).unwrap();
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    let outcome = deep_clone_with(&Value::object(p.clone()), &CloneOptions::default());
    assert!(outcome.is_clean());
    let clone = outcome.value.as_object().cloned().unwrap();
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
    assert_eq!(clone.class_name().as_deref(), Some("Point"));
    // Source fields overwrite whatever the constructor set.
    assert_eq!(field(&clone, "x"), Value::number(5.0));
}

#[test]
fn test_error_values() {
    let api_error = Class::with_initializer("ApiError", |_, args| {
        if args.is_empty() {
            return Err(replica_value::ValueError::missing_argument("ApiError", "status"));
        }
        Ok(())
    });
    let err = ObjectRef::error_with_class(api_error, ErrorKind::Error, "not found");
    err.set(key("status"), Value::number(404.0)).unwrap();
    let cause = ObjectRef::error(ErrorKind::RangeError, "inner");
    err.set(key("cause"), Value::object(cause.clone())).unwrap();

    let outcome = deep_clone_with(&Value::object(err.clone()), &CloneOptions::default());
    assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
    let clone = outcome.value.as_object().cloned().unwrap();

    assert_eq!(classify(&outcome.value), Kind::ErrorValue);
    assert_eq!(clone.class_name().as_deref(), Some("ApiError"));
    assert_eq!(clone.read().as_error_kind(), Some(ErrorKind::Error));
    assert_eq!(field(&clone, "message"), Value::string("not found"));
    assert_eq!(field(&clone, "status"), Value::number(404.0));
    let stack = field(&clone, "stack");
    assert!(stack.as_str().unwrap().starts_with("ApiError: not found"));
    assert!(!clone.get_own_property(&key("message")).unwrap().is_enumerable());

    let cloned_cause = field_object(&clone, "cause");
    assert!(!cloned_cause.ptr_eq(&cause));
    assert_eq!(cloned_cause.read().as_error_kind(), Some(ErrorKind::RangeError));
}

struct Channel;

impl HostResource for Channel {
    fn type_name(&self) -> &str {
        "Channel"
    }
}

#[test]
fn test_opaque_values_pass_through() {
    let promise = ObjectRef::promise();
    let weak_map = ObjectRef::weak_map();
    let weak_set = ObjectRef::weak_set();
    let host = ObjectRef::host(HostHandle::new(Channel));
    let target = ObjectRef::ordinary();
    let weak_ref = ObjectRef::weak_ref(&target);
    let callback = JsFunction::new("callback", |_, _| Ok(Value::undefined()));

    let p = Value::object(promise.clone());
    assert!(deep_clone(&p).as_object().unwrap().ptr_eq(&promise));

    let root = object(&[
        ("promise", Value::object(promise.clone())),
        ("weakMap", Value::object(weak_map.clone())),
        ("weakSet", Value::object(weak_set.clone())),
        ("host", Value::object(host.clone())),
        ("weakRef", Value::object(weak_ref.clone())),
        ("callback", Value::from(callback.clone())),
    ]);
    let source = Value::object(root.clone());
    let clone = deep_clone(&source);
    let cloned = clone.as_object().unwrap();

    for (name, original) in [
        ("promise", &promise),
        ("weakMap", &weak_map),
        ("weakSet", &weak_set),
        ("host", &host),
        ("weakRef", &weak_ref),
    ] {
        assert!(field_object(cloned, name).ptr_eq(original), "{}", name);
    }
    assert!(field(cloned, "callback").as_function().unwrap().ptr_eq(&callback));
    assert_disjoint(&source, &clone, &[&promise, &weak_map, &weak_set, &host, &weak_ref]);
}

#[test]
fn test_opaque_state_is_untouched() {
    let promise = ObjectRef::promise();
    let payload = object(&[("ok", Value::boolean(true))]);
    let settled = promise
        .write()
        .as_promise_mut()
        .unwrap()
        .settle(Ok(Value::object(payload.clone())));
    assert!(settled);

    let weak_key = ObjectRef::ordinary();
    let weak_map = ObjectRef::weak_map();
    weak_map
        .write()
        .as_weak_map_mut()
        .unwrap()
        .set(&weak_key, Value::string("cached"));
    let weak_set = ObjectRef::weak_set();
    if let ObjectData::WeakSet(members) = &mut weak_set.write().data {
        members.add(&weak_key);
    }
    let handle = HostHandle::new(Channel);
    let host = ObjectRef::host(handle.clone());

    let root = object(&[
        ("promise", Value::object(promise)),
        ("weakMap", Value::object(weak_map)),
        ("weakSet", Value::object(weak_set)),
        ("host", Value::object(host)),
        ("key", Value::object(weak_key.clone())),
    ]);
    let clone = clone_object(&root);

    // Promise: still settled with the original (uncloned) payload.
    let cloned_promise = field_object(&clone, "promise");
    {
        let mut guard = cloned_promise.write();
        let state = guard.as_promise_mut().unwrap();
        assert!(state.is_settled());
        match &*state {
            replica_value::PromiseState::Fulfilled(value) => {
                assert!(value.as_object().unwrap().ptr_eq(&payload));
            }
            other => panic!("unexpected promise state: {:?}", other),
        }
        assert!(!state.settle(Err(Value::null())));
    }

    // Weak tables keep their entries keyed by the source object, not its clone.
    let cloned_key = field_object(&clone, "key");
    assert!(!cloned_key.ptr_eq(&weak_key));
    let cloned_map = field_object(&clone, "weakMap");
    {
        let mut guard = cloned_map.write();
        let table = guard.as_weak_map_mut().unwrap();
        assert_eq!(table.get(&weak_key), Some(Value::string("cached")));
        assert!(!table.has(&cloned_key));
        assert!(table.delete(&weak_key));
        assert!(!table.has(&weak_key));
    }
    match &field_object(&clone, "weakSet").read().data {
        ObjectData::WeakSet(members) => {
            assert!(members.has(&weak_key));
            assert!(!members.has(&cloned_key));
        }
        _ => panic!("weak set was replaced"),
    }

    let guard = field_object(&clone, "host");
    match &guard.read().data {
        ObjectData::Host(cloned_handle) => {
            assert!(cloned_handle.ptr_eq(&handle));
            assert_eq!(cloned_handle.type_name(), "Channel");
        }
        _ => panic!("host object was replaced"),
    }
}

#[test]
fn test_symbol_and_hidden_fields_are_copied_by_default() {
    let sym = Symbol::new(Some("meta"));
    let root = ObjectRef::ordinary();
    root.set(PropertyKey::symbol(&sym), Value::number(1.0)).unwrap();
    root.define_property(
        key("secret"),
        replica_value::PropertyDescriptor::data_with_attrs(
            Value::string("hidden"),
            replica_value::PropertyAttributes::hidden(),
        ),
    );

    let clone = clone_object(&root);
    assert_eq!(clone.get(&PropertyKey::symbol(&sym)).unwrap(), Value::number(1.0));
    let secret = clone.get_own_property(&key("secret")).unwrap();
    assert!(!secret.is_enumerable());
    assert_eq!(secret.value(), Some(&Value::string("hidden")));
}

#[test]
fn test_read_only_fields_keep_attributes() {
    let root = ObjectRef::ordinary();
    root.define_property(
        key("id"),
        replica_value::PropertyDescriptor::data_with_attrs(
            Value::number(7.0),
            replica_value::PropertyAttributes::frozen(),
        ),
    );

    let clone = clone_object(&root);
    assert_eq!(field(&clone, "id"), Value::number(7.0));
    assert!(clone.set(key("id"), Value::number(8.0)).is_err());
}
