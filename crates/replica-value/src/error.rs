//! Value-level error types

use thiserror::Error;

/// Errors raised by value operations (constructors, setters, lazy fields).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Type error (e.g., writing a read-only field)
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Range error (e.g., a view past the end of its buffer)
    #[error("RangeError: {0}")]
    RangeError(String),

    /// A constructor was invoked without an argument it requires
    #[error("TypeError: {type_name} requires argument '{argument}'")]
    MissingArgument {
        /// Name of the constructing type
        type_name: String,
        /// Name of the missing parameter
        argument: String,
    },

    /// An operation on a detached ArrayBuffer
    #[error("TypeError: ArrayBuffer is detached")]
    Detached,

    /// Error raised by host code (initializers, accessors, lazy fields)
    #[error("{0}")]
    Thrown(String),
}

impl ValueError {
    /// Create a type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a range error
    pub fn range_error(msg: impl Into<String>) -> Self {
        Self::RangeError(msg.into())
    }

    /// Create a missing-argument error for `type_name`
    pub fn missing_argument(type_name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            type_name: type_name.into(),
            argument: argument.into(),
        }
    }

    /// Create an error carrying a host-provided message
    pub fn thrown(msg: impl Into<String>) -> Self {
        Self::Thrown(msg.into())
    }
}

/// Result type for value operations
pub type ValueResult<T> = std::result::Result<T, ValueError>;
