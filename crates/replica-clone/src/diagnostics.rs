//! Non-fatal clone diagnostics

use crate::fallback::FallbackMode;
use replica_value::{PropertyKey, ValueError};
use thiserror::Error;

/// Something the clone had to work around. Diagnostics never abort a clone.
#[derive(Debug, Clone, Error)]
pub enum CloneDiagnostic {
    /// A constructing type could not be instantiated without arguments
    #[error("cannot clone instance of {type_name}, falling back to {fallback}: {reason}")]
    ConstructionFailed {
        /// The abandoned type
        type_name: String,
        /// The shell used instead
        fallback: FallbackMode,
        /// Why construction failed
        reason: ValueError,
    },

    /// An own field could not be read and was left out of the clone
    #[error("skipped field '{key}' of {owner}: {reason}")]
    FieldSkipped {
        /// Type name of the object owning the field
        owner: String,
        /// The field
        key: PropertyKey,
        /// Why reading it failed
        reason: ValueError,
    },
}

impl CloneDiagnostic {
    /// Emit this diagnostic as a `tracing` warning
    pub fn log(&self) {
        match self {
            CloneDiagnostic::ConstructionFailed { type_name, .. } => {
                tracing::warn!(type_name = %type_name, "{}", self);
            }
            CloneDiagnostic::FieldSkipped { owner, key, .. } => {
                tracing::warn!(owner = %owner, key = %key, "{}", self);
            }
        }
    }
}
