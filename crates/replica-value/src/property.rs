//! Property keys and descriptors

use crate::error::ValueResult;
use crate::symbol::Symbol;
use crate::value::{JsFunction, Value};
use std::sync::Arc;

/// Property key for object properties
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Arc<str>),
    /// Symbol property key
    Symbol(Symbol),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Create a symbol property key
    pub fn symbol(sym: &Symbol) -> Self {
        Self::Symbol(sym.clone())
    }

    /// Check if this key is a symbol
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl std::fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Symbol(sym) => write!(f, "[{}]", sym),
        }
    }
}

/// Property attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property is writable
    pub writable: bool,
    /// Property is enumerable
    pub enumerable: bool,
    /// Property is configurable
    pub configurable: bool,
}

impl PropertyAttributes {
    /// Default data property attributes
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable and configurable but skipped by enumeration
    pub const fn hidden() -> Self {
        Self {
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        Self::data()
    }
}

/// Initializer for a lazily materialized data property
pub type LazyInit = Arc<dyn Fn() -> ValueResult<Value> + Send + Sync>;

/// Property descriptor
#[derive(Clone)]
pub enum PropertyDescriptor {
    /// Data property
    Data {
        /// The value
        value: Value,
        /// Attributes
        attributes: PropertyAttributes,
    },
    /// Accessor property
    Accessor {
        /// Getter function
        get: Option<JsFunction>,
        /// Setter function
        set: Option<JsFunction>,
        /// Attributes (`writable` is ignored)
        attributes: PropertyAttributes,
    },
    /// Data property whose value is computed on first read.
    ///
    /// The initializer may fail; reading the property then surfaces the error.
    Lazy {
        /// Computes the value
        init: LazyInit,
        /// Attributes
        attributes: PropertyAttributes,
    },
}

impl PropertyDescriptor {
    /// Create a data property
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes
    pub fn data_with_attrs(value: Value, attributes: PropertyAttributes) -> Self {
        Self::Data { value, attributes }
    }

    /// Create an enumerable, configurable accessor property
    pub fn accessor(get: Option<JsFunction>, set: Option<JsFunction>) -> Self {
        Self::Accessor {
            get,
            set,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create an enumerable lazy data property
    pub fn lazy(init: impl Fn() -> ValueResult<Value> + Send + Sync + 'static) -> Self {
        Self::Lazy {
            init: Arc::new(init),
            attributes: PropertyAttributes::data(),
        }
    }

    /// Get the value (for materialized data properties)
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } | Self::Lazy { .. } => None,
        }
    }

    /// Property attributes
    pub fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. }
            | Self::Accessor { attributes, .. }
            | Self::Lazy { attributes, .. } => *attributes,
        }
    }

    /// Check if enumerable
    pub fn is_enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    /// Check if writable
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } | Self::Lazy { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }

    /// Check if this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data { value, attributes } => f
                .debug_struct("Data")
                .field("value", value)
                .field("attributes", attributes)
                .finish(),
            Self::Accessor {
                get,
                set,
                attributes,
            } => f
                .debug_struct("Accessor")
                .field("get", get)
                .field("set", set)
                .field("attributes", attributes)
                .finish(),
            Self::Lazy { attributes, .. } => f
                .debug_struct("Lazy")
                .field("attributes", attributes)
                .finish_non_exhaustive(),
        }
    }
}
