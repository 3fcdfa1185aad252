//! TOML configuration for clone calls

use crate::fallback::FallbackMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file looked up by `CloneOptions::load_or_default`
pub const DEFAULT_CONFIG_FILE: &str = "replica.toml";

/// Errors loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for `CloneOptions`
    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

/// Options for one clone call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CloneOptions {
    /// Copy non-enumerable own fields of ordinary objects. Error objects
    /// always keep theirs (`message`, `stack`).
    pub include_non_enumerable: bool,

    /// Copy symbol-keyed own fields
    pub include_symbol_keys: bool,

    /// Shell used when a constructing type cannot be instantiated
    pub fallback: FallbackMode,

    /// Emit each diagnostic as a `tracing` warning
    pub log_diagnostics: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            include_non_enumerable: true,
            include_symbol_keys: true,
            fallback: FallbackMode::PlainObject,
            log_diagnostics: true,
        }
    }
}

impl CloneOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or from `replica.toml` in the working directory if
    /// no path is given. Falls back to defaults (with a warning) when the
    /// file is missing or broken.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        let path = match path {
            Some(path) => path,
            None if default_path.exists() => default_path,
            None => return Self::default(),
        };
        match Self::load(path) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "using default clone options");
                Self::default()
            }
        }
    }
}
