//! Dynamic values
//!
//! A `Value` is either a primitive (no identity, immutable) or a handle to a
//! heap object. Cloning a `Value` never copies an object: it clones the
//! handle, so both copies observe the same object.
//!
//! ```text
//! Undefined | Null | Boolean | Number | BigInt | String | Symbol   primitives
//! Function                                                          shared callable
//! Object(ObjectRef)                                                 identity-carrying
//! ```

use crate::error::ValueResult;
use crate::object::ObjectRef;
use crate::symbol::Symbol;
use num_bigint::BigInt;
use std::sync::Arc;

/// Native callable signature: `(this, args) -> result`
pub type NativeFn = dyn Fn(&Value, &[Value]) -> ValueResult<Value> + Send + Sync;

/// A callable value. Functions are shared by reference; two handles are the
/// same function only if they point at the same allocation.
#[derive(Clone)]
pub struct JsFunction {
    name: Arc<str>,
    call: Arc<NativeFn>,
}

impl JsFunction {
    /// Wrap a native closure as a function value
    pub fn new(
        name: &str,
        call: impl Fn(&Value, &[Value]) -> ValueResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Arc::from(name),
            call: Arc::new(call),
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with `this` and arguments
    pub fn call(&self, this: &Value, args: &[Value]) -> ValueResult<Value> {
        (self.call)(this, args)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &JsFunction) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }

    /// Address of the underlying closure, used for identity hashing
    pub fn as_ptr(&self) -> usize {
        Arc::as_ptr(&self.call) as *const () as usize
    }
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

/// A dynamic value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Boolean(bool),
    /// IEEE 754 double
    Number(f64),
    /// Arbitrary-precision integer
    BigInt(Arc<BigInt>),
    /// Immutable string
    String(Arc<str>),
    /// Unique symbol
    Symbol(Symbol),
    /// Callable
    Function(JsFunction),
    /// Heap object with identity
    Object(ObjectRef),
}

impl Value {
    /// Create `undefined`
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// Create `null`
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create a boolean
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Create a number
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create a string
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Create a bigint
    pub fn bigint(b: BigInt) -> Self {
        Self::BigInt(Arc::new(b))
    }

    /// Wrap an object handle
    pub fn object(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }

    /// Check for `undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check for `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check whether this value has no heap identity
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object(_) | Self::Function(_))
    }

    /// Get boolean payload
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get number payload
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get bigint payload
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Self::BigInt(b) => Some(b),
            _ => None,
        }
    }

    /// Get symbol payload
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get function payload
    pub fn as_function(&self) -> Option<&JsFunction> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get object handle
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The `typeof` tag of this value
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
            Self::Object(_) => "object",
        }
    }

    /// Identity check: same object, same function, or equal primitives
    /// under SameValueZero.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        same_value_zero(self, other)
    }
}

/// SameValueZero: NaN equals NaN, -0 equals +0, objects and functions
/// compare by identity, everything else by content.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        same_value_zero(self, other)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::BigInt(b) => write!(f, "{}n", b),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Symbol(s) => write!(f, "{}", s),
            Self::Function(func) => write!(f, "{:?}", func),
            // Objects may be cyclic; never recurse into them here.
            Self::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<JsFunction> for Value {
    fn from(func: JsFunction) -> Self {
        Self::Function(func)
    }
}
