//! # Replica Value
//!
//! The dynamic value graph that the Replica deep-clone engine copies.
//!
//! ## Design Principles
//!
//! - **Identity by handle**: composite values live behind `ObjectRef`, so
//!   "the same object" means "the same allocation"
//! - **Thread-safe**: objects sit in `parking_lot::RwLock`, values are `Send + Sync`
//! - **Closed internal slots**: an object's built-in shape is one `ObjectData` variant
//! - **Ordered**: own properties, Map entries and Set elements keep insertion order

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod array_buffer;
pub mod class;
pub mod data_view;
pub mod date;
pub mod error;
pub mod map_data;
pub mod native_error;
pub mod object;
pub mod opaque;
pub mod property;
pub mod regexp;
pub mod symbol;
pub mod typed_array;
pub mod value;

pub use array_buffer::ArrayBufferData;
pub use class::Class;
pub use data_view::DataViewData;
pub use date::DateData;
pub use error::{ValueError, ValueResult};
pub use map_data::{MapData, MapKey, SetData};
pub use native_error::ErrorKind;
pub use object::{JsObject, ObjectData, ObjectRef, WeakObjectRef};
pub use opaque::{HostHandle, HostResource, PromiseState, WeakMapData, WeakSetData};
pub use property::{PropertyAttributes, PropertyDescriptor, PropertyKey};
pub use regexp::RegExpData;
pub use symbol::Symbol;
pub use typed_array::{TypedArrayData, TypedArrayKind};
pub use value::{JsFunction, Value};
