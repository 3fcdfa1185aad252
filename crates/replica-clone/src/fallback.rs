//! Fallback policy for objects whose constructing type cannot be rebuilt.
//!
//! A failed constructor never aborts the clone. The object is rebuilt as a
//! degraded shell instead, registered under the same source identity, and
//! populated with the same own fields.

use replica_value::{Class, ObjectRef};
use serde::Deserialize;
use std::sync::Arc;

/// Which degraded shell replaces an instance whose constructor failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// A plain object with no constructing type
    #[default]
    PlainObject,
    /// An instance of the same class whose initializer is skipped
    KeepClass,
}

impl FallbackMode {
    /// Build the degraded shell for an instance of `class`
    pub fn shell_for(&self, class: &Arc<Class>) -> ObjectRef {
        match self {
            FallbackMode::PlainObject => ObjectRef::ordinary(),
            FallbackMode::KeepClass => class.instantiate_uninitialized(),
        }
    }
}

impl std::fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackMode::PlainObject => f.write_str("plain object"),
            FallbackMode::KeepClass => f.write_str("uninitialized instance"),
        }
    }
}
